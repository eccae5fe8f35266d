//! Frame pacing wait strategies.
//!
//! A wait strategy holds the current frame open until a deadline measured on
//! a [`TimeSource`]. Every strategy returns the first reading taken at or
//! after the deadline, so the caller can re-measure the frame delta from a
//! timestamp that was observed *after* the wait.

use std::fmt;
use std::time::Duration;

use super::source::TimeSource;

/// How [`FrameClock`](super::FrameClock) waits for the target frame interval.
pub trait WaitStrategy: Send + Sync + fmt::Debug {
    /// Block until `source.now() >= deadline`.
    ///
    /// Returns the reading that satisfied the condition.
    fn wait_until(&self, source: &dyn TimeSource, deadline: Duration) -> Duration;
}

/// Busy-wait, yielding the thread between measurements.
///
/// Trades CPU time for the lowest scheduling jitter. This is the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinYield;

impl WaitStrategy for SpinYield {
    fn wait_until(&self, source: &dyn TimeSource, deadline: Duration) -> Duration {
        loop {
            let now = source.now();
            if now >= deadline {
                return now;
            }
            std::thread::yield_now();
        }
    }
}

/// Sleep for most of the remaining time, then spin the last stretch.
///
/// OS sleeps routinely overshoot by a millisecond or more, so only the part
/// of the wait longer than `spin_threshold` is slept.
#[derive(Debug, Clone, Copy)]
pub struct Sleep {
    /// Remaining time below which the strategy stops sleeping and spins.
    pub spin_threshold: Duration,
}

impl Sleep {
    /// Create a sleep strategy with the given spin threshold.
    pub fn new(spin_threshold: Duration) -> Self {
        Self { spin_threshold }
    }
}

impl Default for Sleep {
    fn default() -> Self {
        Self::new(Duration::from_millis(2))
    }
}

impl WaitStrategy for Sleep {
    fn wait_until(&self, source: &dyn TimeSource, deadline: Duration) -> Duration {
        loop {
            let now = source.now();
            if now >= deadline {
                return now;
            }

            let remaining = deadline - now;
            if remaining > self.spin_threshold {
                std::thread::sleep(remaining - self.spin_threshold);
            } else {
                std::thread::yield_now();
            }
        }
    }
}
