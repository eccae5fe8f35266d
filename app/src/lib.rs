//! # Cadence App
//!
//! The frame loop of the Cadence engine.
//!
//! This crate ties the frame clock and fixed-step physics from
//! `cadence-core` to the render process from `cadence-graphics`, and drives
//! game code through a [`FrameHandler`].
//!
//! ## Overview
//!
//! - [`FrameHandler`] - Trait for game-side per-frame hooks
//! - [`FrameOrchestrator`] - Runs one frame in a fixed order
//! - [`App`] - Builds the orchestrator from [`Settings`] and runs frames
//! - [`AppArgs`] - Trait for parsing command line arguments
//! - [`headless`] - In-memory collaborators for running without a GPU
//!
//! ## Example
//!
//! ```no_run
//! use cadence_app::{
//!     App, AppArgs, DefaultAppArgs, HeadlessHandler, HeadlessServices, Settings,
//!     headless_registry,
//! };
//! use cadence_graphics::render_graph::DescribedFullscreenPass;
//!
//! let args = DefaultAppArgs::parse();
//! let mut settings = Settings::load_or_default(args.settings_path()).unwrap();
//! args.apply_to(&mut settings);
//!
//! let mut app = App::new(
//!     settings,
//!     headless_registry().unwrap(),
//!     DescribedFullscreenPass::factory(),
//! )
//! .unwrap();
//!
//! let mut services = HeadlessServices::new();
//! app.run(&mut HeadlessHandler::default(), &mut services.services(), args.max_frames())
//!     .unwrap();
//! ```

mod app;
mod args;
pub mod error;
mod handler;
pub mod headless;
mod orchestrator;
pub mod settings;

pub use app::App;
pub use args::{AppArgs, DEFAULT_SETTINGS_PATH, DefaultAppArgs};
pub use error::{AppError, AppResult, FrameError, SettingsError};
pub use handler::FrameHandler;
pub use headless::{
    HeadlessHandler, HeadlessServices, PassCounts, headless_registry,
    headless_registry_with_counts,
};
pub use orchestrator::{FrameOrchestrator, FrameReport};
pub use settings::{Settings, WaitStrategyKind};

/// App library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the app subsystem.
pub fn init() {
    log::info!("Cadence App v{} initialized", VERSION);
}
