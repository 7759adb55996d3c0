#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Simulator Settings
//!
//! Explicit, immutable configuration values for the navigation drivers.
//!
//! -   [`SimSettings`] is the user-facing knob set (resolution, sensor
//!     height, enabled sensors, action amounts, physics toggle). Every field
//!     has a default, so a settings file only lists what it overrides.
//! -   [`make_cfg`] and [`make_simple_cfg`] turn settings into a
//!     [`SimulatorConfig`] describing the simulator backend and the agent's
//!     sensors and action space. They are pure functions.
//! -   [`TaskConfig`] holds the dataset/task overrides for evaluation runs.

pub mod builder;
pub mod task;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use builder::{
    make_cfg, make_simple_cfg, ActionSpec, AgentConfig, BackendConfig, SensorSpec, SensorSubType,
    SensorType, SimulatorConfig,
};
pub use task::TaskConfig;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Displacement and turn amounts of the discrete action space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionSpaceSettings {
    /// Metres moved by `move_forward`.
    pub forward: f32,
    /// Degrees turned by `turn_left`.
    pub left: f32,
    /// Degrees turned by `turn_right`.
    pub right: f32,
}

impl Default for ActionSpaceSettings {
    fn default() -> Self {
        Self { forward: 0.25, left: 30.0, right: 30.0 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    pub width: u32,
    pub height: u32,
    /// Scene asset path.
    pub scene: String,
    pub default_agent: usize,
    /// Height of every sensor above the agent's base, in metres.
    pub sensor_height: f32,
    pub color_sensor: bool,
    pub depth_sensor: bool,
    pub semantic_sensor: bool,
    /// Seed for random navigation.
    pub seed: u64,
    /// Kinematics only when `false`.
    pub enable_physics: bool,
    pub gpu_device_id: i32,
    pub action_space: ActionSpaceSettings,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            scene: String::new(),
            default_agent: 0,
            sensor_height: 1.5,
            color_sensor: true,
            depth_sensor: true,
            semantic_sensor: false,
            seed: 2,
            enable_physics: false,
            gpu_device_id: 0,
            action_space: ActionSpaceSettings::default(),
        }
    }
}

impl SimSettings {
    /// Default settings pointed at `scene`.
    #[must_use]
    pub fn for_scene(scene: impl Into<String>) -> Self {
        Self { scene: scene.into(), ..Self::default() }
    }

    /// Parse settings from JSON; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Parse`] for malformed JSON and
    /// [`SettingsError::Invalid`] when a value fails [`validate`](Self::validate).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse a JSON settings file.
    ///
    /// # Errors
    ///
    /// I/O, parse and validation failures.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|source| SettingsError::Io { path: path.to_path_buf(), source })?;
        Self::from_str(&json)
    }

    /// Reject values no simulator could honour.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.width == 0 || self.height == 0 {
            return Err(SettingsError::Invalid(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.sensor_height.is_nan() || self.sensor_height <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "sensor_height must be positive, got {}",
                self.sensor_height
            )));
        }
        let amounts = [
            ("forward", self.action_space.forward),
            ("left", self.action_space.left),
            ("right", self.action_space.right),
        ];
        for (name, amount) in amounts {
            if amount.is_nan() || amount <= 0.0 {
                return Err(SettingsError::Invalid(format!(
                    "action_space.{name} must be positive, got {amount}"
                )));
            }
        }
        Ok(())
    }
}
