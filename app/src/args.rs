//! Command line arguments trait and default implementation.
//!
//! Command line values override the settings file.

use std::path::{Path, PathBuf};

use crate::settings::{Settings, WaitStrategyKind};

/// Settings file read when `--settings` is not given.
pub const DEFAULT_SETTINGS_PATH: &str = "config/settings.json";

/// Trait for parsing command line arguments.
///
/// Every accessor defaults to "not given", so a custom implementation only
/// overrides the options it supports.
///
/// # Example
///
/// ```ignore
/// use cadence_app::AppArgs;
///
/// struct BenchArgs;
///
/// impl AppArgs for BenchArgs {
///     fn parse() -> Self {
///         BenchArgs
///     }
///
///     fn max_frames(&self) -> Option<u64> {
///         Some(1000)
///     }
/// }
/// ```
pub trait AppArgs: Sized {
    /// Parse command line arguments.
    fn parse() -> Self;

    /// Engine settings file.
    ///
    /// Default: [`DEFAULT_SETTINGS_PATH`]
    fn settings_path(&self) -> &Path {
        Path::new(DEFAULT_SETTINGS_PATH)
    }

    /// Renderer config overriding the one named in the settings.
    fn renderer_config(&self) -> Option<&Path> {
        None
    }

    /// Frame rate cap overriding the settings.
    fn target_fps(&self) -> Option<f32> {
        None
    }

    /// Get the maximum number of frames to process before auto-exit.
    ///
    /// Default: `None` (run until the handler stops)
    fn max_frames(&self) -> Option<u64> {
        None
    }

    /// Wait strategy overriding the settings.
    fn wait_strategy(&self) -> Option<WaitStrategyKind> {
        None
    }

    /// Apply the command line overrides to loaded settings.
    fn apply_to(&self, settings: &mut Settings) {
        if let Some(path) = self.renderer_config() {
            settings.renderer_config = path.to_path_buf();
        }
        if let Some(fps) = self.target_fps() {
            settings.set_target_fps(fps);
        }
        if let Some(wait) = self.wait_strategy() {
            settings.wait_strategy = wait;
        }
    }
}

/// Default command line arguments implementation.
///
/// # Examples
///
/// ```bash
/// # Show help
/// ./cadence-headless --help
///
/// # Run 600 frames capped at 60 fps, sleeping between frames
/// ./cadence-headless --target-fps 60 --wait-strategy sleep --max-frames 600
///
/// # Use a different render pipeline
/// ./cadence-headless --renderer-config config/renderer_forward.json
/// ```
#[derive(Debug, Clone)]
pub struct DefaultAppArgs {
    settings_path: PathBuf,
    renderer_config: Option<PathBuf>,
    target_fps: Option<f32>,
    max_frames: Option<u64>,
    wait_strategy: Option<WaitStrategyKind>,
}

impl Default for DefaultAppArgs {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
            renderer_config: None,
            target_fps: None,
            max_frames: None,
            wait_strategy: None,
        }
    }
}

impl DefaultAppArgs {
    /// Set the settings file.
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = path.into();
        self
    }

    /// Set the renderer config override.
    pub fn with_renderer_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.renderer_config = Some(path.into());
        self
    }

    /// Set the maximum number of frames.
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    /// Set the frame rate cap.
    pub fn with_target_fps(mut self, fps: f32) -> Self {
        self.target_fps = Some(fps);
        self
    }
}

// ============================================================================
// Native implementation using clap
// ============================================================================

mod native {
    use super::*;
    use clap::Parser;

    /// Cadence engine application arguments.
    #[derive(Parser, Debug)]
    #[command(
        name = "cadence",
        about = "Cadence engine frame loop",
        long_about = "Runs the Cadence frame loop: frame pacing, fixed-step physics and the \
            render graph compiled from the renderer config.\n\n\
            EXAMPLES:\n\
              # Run ten frames and exit\n\
              ./cadence-headless --max-frames 10\n\
            \n\
              # Cap at 30 fps using sleeps instead of spinning\n\
              ./cadence-headless --target-fps 30 --wait-strategy sleep",
        version
    )]
    pub(super) struct ClapArgs {
        /// Engine settings file (JSON).
        #[arg(long, default_value = DEFAULT_SETTINGS_PATH)]
        pub settings: PathBuf,

        /// Renderer config (JSON), overriding the settings file.
        #[arg(long)]
        pub renderer_config: Option<PathBuf>,

        /// Cap the frame rate. 0 disables the cap.
        #[arg(long)]
        pub target_fps: Option<f32>,

        /// Exit after N frames (useful for testing).
        #[arg(long)]
        pub max_frames: Option<u64>,

        /// How to wait for the frame rate cap.
        #[arg(long, value_enum)]
        pub wait_strategy: Option<WaitStrategyKind>,
    }

    impl From<ClapArgs> for DefaultAppArgs {
        fn from(args: ClapArgs) -> Self {
            if args.wait_strategy.is_some() && args.target_fps.is_none() {
                log::debug!(
                    "--wait-strategy only applies when a frame rate cap is set \
                    (--target-fps or targetFrameRate in the settings file)"
                );
            }

            Self {
                settings_path: args.settings,
                renderer_config: args.renderer_config,
                target_fps: args.target_fps,
                max_frames: args.max_frames,
                wait_strategy: args.wait_strategy,
            }
        }
    }

}

impl AppArgs for DefaultAppArgs {
    fn parse() -> Self {
        use clap::Parser;
        native::ClapArgs::parse().into()
    }

    fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    fn renderer_config(&self) -> Option<&Path> {
        self.renderer_config.as_deref()
    }

    fn target_fps(&self) -> Option<f32> {
        self.target_fps
    }

    fn max_frames(&self) -> Option<u64> {
        self.max_frames
    }

    fn wait_strategy(&self) -> Option<WaitStrategyKind> {
        self.wait_strategy
    }
}
