//! Monotonic time sources.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// A monotonic clock measured from an arbitrary origin.
///
/// [`FrameClock`](super::FrameClock) only ever compares readings from the
/// same source, so the origin does not matter.
pub trait TimeSource: Send + Sync + fmt::Debug {
    /// Current time since the source's origin.
    fn now(&self) -> Duration;
}

/// Wall-clock time backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    /// Create a source whose origin is the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[derive(Debug, Default)]
struct ManualState {
    now: Duration,
    auto_advance: Duration,
}

/// Manually driven time for deterministic tests.
///
/// Clones share the same underlying time, so a test can keep one handle and
/// give another to the clock under test. With a non-zero auto-advance every
/// [`now`](TimeSource::now) query moves time forward afterwards, which lets
/// spinning wait strategies make progress without a real clock.
///
/// ```
/// use std::time::Duration;
/// use cadence_core::{ManualTimeSource, TimeSource};
///
/// let time = ManualTimeSource::new();
/// let handle = time.clone();
/// handle.advance(Duration::from_millis(5));
/// assert_eq!(time.now(), Duration::from_millis(5));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    state: Arc<Mutex<ManualState>>,
}

impl ManualTimeSource {
    /// Create a manual source starting at zero with no auto-advance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manual source that moves forward by `step` after every query.
    pub fn with_auto_advance(step: Duration) -> Self {
        let source = Self::new();
        source.set_auto_advance(step);
        source
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.state.lock().now += by;
    }

    /// Jump to an absolute time. Going backwards is ignored to keep the
    /// source monotonic.
    pub fn set(&self, now: Duration) {
        let mut state = self.state.lock();
        state.now = state.now.max(now);
    }

    /// Change the amount time moves after each query.
    pub fn set_auto_advance(&self, step: Duration) {
        self.state.lock().auto_advance = step;
    }

    /// Read the current time without triggering auto-advance.
    pub fn peek(&self) -> Duration {
        self.state.lock().now
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Duration {
        let mut state = self.state.lock();
        let now = state.now;
        let step = state.auto_advance;
        state.now += step;
        now
    }
}
