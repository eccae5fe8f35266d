//! Application error types.

use std::path::PathBuf;

use cadence_graphics::RenderGraphError;
use thiserror::Error;

/// Errors loading or validating engine settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid setting '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors raised while running a frame.
#[derive(Error, Debug)]
pub enum FrameError {
    /// The render graph failed to execute. The clock already advanced.
    #[error("Render failed: {0}")]
    Render(#[from] RenderGraphError),
}

/// Errors raised while setting up or running the application.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Failed to load renderer: {0}")]
    Renderer(#[from] RenderGraphError),
    #[error(transparent)]
    Frame(#[from] FrameError),
}

pub type AppResult<T> = Result<T, AppError>;
