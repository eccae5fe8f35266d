//! Engine settings file.
//!
//! ```json
//! {
//!   "rendererConfig": "config/renderer_default.json",
//!   "targetFrameRate": 0.0166,
//!   "physicsStepSize": 0.016,
//!   "waitStrategy": "sleep"
//! }
//! ```
//!
//! Every field is optional. `targetFrameRate` is the minimum time between
//! frames in seconds; `0` leaves the frame rate uncapped.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use cadence_core::{FixedStepAccumulator, FrameClockConfig, Sleep, SpinYield, WaitStrategy};
use cadence_graphics::ReloadPolicy;

use crate::error::SettingsError;

/// Upper bound on `maxDeltaTime / physicsStepSize`, the most fixed steps a
/// single clamped frame can run.
pub const MAX_STEPS_PER_FRAME: f32 = 10_000.0;

/// Renderer config used when no other path is given.
pub const DEFAULT_RENDERER_CONFIG: &str = "config/renderer_default.json";

/// How the frame clock waits for the target frame interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum WaitStrategyKind {
    /// Busy-wait with cooperative yields.
    #[default]
    SpinYield,
    /// Sleep most of the interval, spin the rest.
    Sleep,
}

impl WaitStrategyKind {
    pub fn build(self) -> Box<dyn WaitStrategy> {
        match self {
            Self::SpinYield => Box::new(SpinYield),
            Self::Sleep => Box::new(Sleep::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub renderer_config: PathBuf,
    pub target_frame_rate: f32,
    pub max_delta_time: f32,
    pub default_delta_time: f32,
    pub physics_step_size: f32,
    pub wait_strategy: WaitStrategyKind,
    pub reload_policy: ReloadPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            renderer_config: PathBuf::from(DEFAULT_RENDERER_CONFIG),
            target_frame_rate: 0.0,
            max_delta_time: 0.3,
            default_delta_time: 0.016,
            physics_step_size: 0.016,
            wait_strategy: WaitStrategyKind::default(),
            reload_policy: ReloadPolicy::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&text)?;
        log::info!("Loaded settings from '{}'", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file does not exist.
    ///
    /// Parse and validation errors are still returned.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        match Self::load(path) {
            Err(SettingsError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                log::warn!(
                    "Settings file '{}' not found, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Parse and validate settings from JSON text.
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the frame loop cannot run with.
    ///
    /// Besides signs, this bounds every duration to what [`Duration`] can
    /// hold and limits how many physics steps one clamped frame can trigger.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.fixed_step()?;
        if !(self.max_delta_time.is_finite() && self.max_delta_time > 0.0) {
            return Err(invalid("maxDeltaTime", "must be a positive number"));
        }
        if !(self.default_delta_time.is_finite() && self.default_delta_time > 0.0) {
            return Err(invalid("defaultDeltaTime", "must be a positive number"));
        }
        if !(self.target_frame_rate.is_finite() && self.target_frame_rate >= 0.0) {
            return Err(invalid("targetFrameRate", "must not be negative"));
        }
        self.frame_clock_config()?;

        if self.max_delta_time < self.physics_step_size {
            return Err(invalid(
                "maxDeltaTime",
                "must not be smaller than physicsStepSize",
            ));
        }
        if self.default_delta_time > self.max_delta_time {
            return Err(invalid("defaultDeltaTime", "must not exceed maxDeltaTime"));
        }
        if self.max_delta_time / self.physics_step_size > MAX_STEPS_PER_FRAME {
            return Err(invalid(
                "physicsStepSize",
                &format!(
                    "too small for maxDeltaTime: a frame could run more than {MAX_STEPS_PER_FRAME} steps"
                ),
            ));
        }
        Ok(())
    }

    /// Frame clock parameters described by these settings.
    pub fn frame_clock_config(&self) -> Result<FrameClockConfig, SettingsError> {
        Ok(FrameClockConfig {
            target_frame_interval: seconds("targetFrameRate", self.target_frame_rate)?,
            max_delta: seconds("maxDeltaTime", self.max_delta_time)?,
            default_delta: seconds("defaultDeltaTime", self.default_delta_time)?,
        })
    }

    /// Physics accumulator described by these settings.
    pub fn fixed_step(&self) -> Result<FixedStepAccumulator, SettingsError> {
        FixedStepAccumulator::try_new(self.physics_step_size)
            .map_err(|e| invalid("physicsStepSize", &e.to_string()))
    }

    /// Cap the frame rate at `fps`. Zero or less removes the cap.
    pub fn set_target_fps(&mut self, fps: f32) {
        self.target_frame_rate = if fps > 0.0 { 1.0 / fps } else { 0.0 };
    }
}

fn seconds(field: &'static str, value: f32) -> Result<Duration, SettingsError> {
    Duration::try_from_secs_f32(value).map_err(|e| invalid(field, &e.to_string()))
}

fn invalid(field: &'static str, reason: &str) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
