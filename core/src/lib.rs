//! # Cadence Core
//!
//! Frame timing building blocks shared by the Cadence engine crates:
//!
//! - [`FrameClock`] - per-frame delta time with stall clamping and frame-rate capping
//! - [`FixedStepAccumulator`] - converts variable frame time into fixed simulation steps
//! - [`WaitStrategy`] - how the clock holds a frame open until the target interval
//! - [`TimeSource`] - monotonic time, swappable for deterministic tests
//! - [`profiling`] - optional Tracy instrumentation

pub mod profiling;
pub mod time;

pub use time::{
    FixedStepAccumulator, FrameClock, FrameClockConfig, FrameTime, InvalidStepSize,
    ManualTimeSource, Sleep, SpinYield, SystemTimeSource, TimeSource, WaitStrategy,
};

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the core subsystem.
pub fn init() {
    log::info!("Cadence Core v{} initialized", VERSION);
}
