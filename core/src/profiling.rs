//! Optional frame profiling via Tracy.
//!
//! Instrumentation is enabled with the `profiling` Cargo feature. Without it
//! every macro in this module expands to nothing, so the frame loop can be
//! instrumented unconditionally.
//!
//! ```ignore
//! use cadence_core::{frame_mark, profile_scope};
//!
//! fn run_frame() {
//!     {
//!         profile_scope!("non_render_tasks");
//!         // input, game state, physics ...
//!     }
//!     {
//!         profile_scope!("render_tasks");
//!         // render graph ...
//!     }
//!     frame_mark!();
//! }
//! ```

#[cfg(feature = "profiling")]
pub use tracy_client::{self, Client, frame_mark as tracy_frame_mark, plot as tracy_plot, span};

/// Mark the end of a frame for Tracy's frame-time view.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! frame_mark {
    () => {
        $crate::profiling::tracy_frame_mark()
    };
}

/// Mark the end of a frame (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! frame_mark {
    () => {};
}

/// Open a named span that lasts until the end of the enclosing scope.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_span = $crate::profiling::span!($name);
    };
}

/// Open a named span (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_scope {
    ($name:expr) => {};
}

/// Open a span named after the enclosing function.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_function {
    () => {
        let _profile_span = $crate::profiling::span!();
    };
}

/// Open a function span (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_function {
    () => {};
}

/// Plot a value over time, e.g. the frame delta or the number of physics
/// steps taken this frame.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_plot {
    ($name:expr, $value:expr) => {
        $crate::profiling::tracy_plot!($name, $value as f64)
    };
}

/// Plot a value (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_plot {
    ($name:expr, $value:expr) => {
        let _ = $value;
    };
}

pub use frame_mark;
pub use profile_function;
pub use profile_plot;
pub use profile_scope;
