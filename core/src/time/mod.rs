//! Frame timing.
//!
//! [`FrameClock`] produces one [`FrameTime`] per frame:
//!
//! - The first frame reports a fixed default delta, since there is no
//!   previous frame to measure against.
//! - Later frames report the time since the previous frame boundary, clamped
//!   to [`FrameClockConfig::max_delta`] so a debugger pause or a long stall
//!   cannot trigger a burst of catch-up work.
//! - When a frame finishes faster than the target interval, the clock holds
//!   it open through a [`WaitStrategy`] and measures again afterwards. The
//!   frame boundary is stamped *after* that wait.
//!
//! [`FixedStepAccumulator`] turns the variable frame delta into whole
//! simulation steps of a constant size.

mod fixed_step;
mod source;
mod wait;

pub use fixed_step::{FixedStepAccumulator, InvalidStepSize};
pub use source::{ManualTimeSource, SystemTimeSource, TimeSource};
pub use wait::{Sleep, SpinYield, WaitStrategy};

use std::time::Duration;

/// Timing parameters for a [`FrameClock`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClockConfig {
    /// Minimum time between frame boundaries. Zero disables the frame cap.
    pub target_frame_interval: Duration,
    /// Upper bound for a reported delta time.
    pub max_delta: Duration,
    /// Delta reported for the very first frame.
    pub default_delta: Duration,
}

impl FrameClockConfig {
    /// Upper bound applied to every measured delta.
    pub const DEFAULT_MAX_DELTA: Duration = Duration::from_millis(300);

    /// Delta reported for frame zero.
    pub const DEFAULT_DELTA: Duration = Duration::from_millis(16);

    /// Config capped at `fps` frames per second.
    pub fn with_target_fps(fps: f32) -> Self {
        let target_frame_interval = if fps > 0.0 {
            Duration::from_secs_f32(1.0 / fps)
        } else {
            Duration::ZERO
        };
        Self {
            target_frame_interval,
            ..Self::default()
        }
    }
}

impl Default for FrameClockConfig {
    fn default() -> Self {
        Self {
            target_frame_interval: Duration::ZERO,
            max_delta: Self::DEFAULT_MAX_DELTA,
            default_delta: Self::DEFAULT_DELTA,
        }
    }
}

/// Timing for a single frame, as handed to the rest of the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Index of the frame this timing belongs to (zero-based).
    pub frame: u64,
    /// Delta time in seconds, never above the configured maximum.
    pub delta_time: f32,
    /// Sum of all reported deltas so far, including this one.
    pub total_time: f64,
}

/// Per-frame delta time with stall clamping and frame-rate capping.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use cadence_core::{FrameClock, FrameClockConfig, ManualTimeSource};
///
/// let time = ManualTimeSource::new();
/// let mut clock = FrameClock::new(FrameClockConfig::default())
///     .with_time_source(time.clone());
///
/// let first = clock.tick();
/// assert_eq!(first.frame, 0);
/// assert!((first.delta_time - 0.016).abs() < 1e-6);
///
/// // A two-second stall is clamped.
/// time.advance(Duration::from_secs(2));
/// let second = clock.tick();
/// assert!((second.delta_time - 0.3).abs() < 1e-6);
/// ```
#[derive(Debug)]
pub struct FrameClock {
    config: FrameClockConfig,
    source: Box<dyn TimeSource>,
    wait: Box<dyn WaitStrategy>,
    frame_count: u64,
    delta_time: f32,
    total_time: f64,
    last_update: Duration,
}

impl FrameClock {
    /// Create a clock on the system time source, pacing with [`SpinYield`].
    pub fn new(config: FrameClockConfig) -> Self {
        Self {
            config,
            source: Box::new(SystemTimeSource::new()),
            wait: Box::new(SpinYield),
            frame_count: 0,
            delta_time: config.default_delta.as_secs_f32(),
            total_time: 0.0,
            last_update: Duration::ZERO,
        }
    }

    /// Replace the time source.
    pub fn with_time_source(mut self, source: impl TimeSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Replace the wait strategy.
    pub fn with_wait_strategy(mut self, wait: impl WaitStrategy + 'static) -> Self {
        self.wait = Box::new(wait);
        self
    }

    /// Replace the wait strategy with an already boxed one.
    pub fn set_wait_strategy(&mut self, wait: Box<dyn WaitStrategy>) {
        self.wait = wait;
    }

    /// Change the minimum time between frames. Zero disables the cap.
    pub fn set_target_frame_interval(&mut self, interval: Duration) {
        self.config.target_frame_interval = interval;
    }

    /// Advance to the next frame and return its timing.
    ///
    /// May block (through the wait strategy) to honour the target interval.
    pub fn tick(&mut self) -> FrameTime {
        if self.frame_count > 0 {
            let max_delta = self.config.max_delta;
            let target = self.config.target_frame_interval;

            let mut elapsed = self.source.now().saturating_sub(self.last_update);
            if elapsed.min(max_delta) < target {
                let after = self
                    .wait
                    .wait_until(self.source.as_ref(), self.last_update + target);
                elapsed = after.saturating_sub(self.last_update);
            }
            self.delta_time = elapsed.min(max_delta).as_secs_f32();
        }

        self.total_time += f64::from(self.delta_time);
        self.last_update = self.source.now();

        let time = FrameTime {
            frame: self.frame_count,
            delta_time: self.delta_time,
            total_time: self.total_time,
        };

        self.frame_count += 1;
        time
    }

    /// Return to the construct-time state; the next tick is frame zero again.
    pub fn reset(&mut self) {
        self.frame_count = 0;
        self.delta_time = self.config.default_delta.as_secs_f32();
        self.total_time = 0.0;
        self.last_update = Duration::ZERO;
    }

    /// Number of completed ticks.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Delta time reported by the most recent tick, in seconds.
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Sum of all reported deltas, in seconds.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Frame boundary recorded by the most recent tick.
    pub fn last_update(&self) -> Duration {
        self.last_update
    }

    /// The clock's timing parameters.
    pub fn config(&self) -> &FrameClockConfig {
        &self.config
    }
}
