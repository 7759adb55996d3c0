//! # Episode Data Model
//!
//! Plain values exchanged between the runner, the policies and the
//! environment. None of them carry behaviour beyond lookups and shape checks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::env::EpisodeError;

/// Conventional sensor names used by the drivers.
pub const COLOR_SENSOR: &str = "color_sensor";
pub const DEPTH_SENSOR: &str = "depth_sensor";
pub const SEMANTIC_SENSOR: &str = "semantic_sensor";
pub const OBJECT_GOAL: &str = "objectgoal";

/// Row-major `height x width x channels` buffer produced by one sensor.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorArray<T> {
    height: usize,
    width: usize,
    channels: usize,
    data: Vec<T>,
}

impl<T> SensorArray<T> {
    /// Wraps `data` after checking it matches the declared shape.
    ///
    /// # Errors
    ///
    /// Returns [`EpisodeError::ShapeMismatch`] when `data.len()` differs from
    /// `height * width * channels`.
    pub fn new(height: usize, width: usize, channels: usize, data: Vec<T>) -> Result<Self, EpisodeError> {
        let expected = height * width * channels;
        if data.len() != expected {
            return Err(EpisodeError::ShapeMismatch { expected, actual: data.len() });
        }
        Ok(Self { height, width, channels, data })
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Element at `(row, col, channel)`, or `None` outside the buffer.
    #[must_use]
    pub fn get(&self, row: usize, col: usize, channel: usize) -> Option<&T> {
        if row >= self.height || col >= self.width || channel >= self.channels {
            return None;
        }
        self.data.get((row * self.width + col) * self.channels + channel)
    }

    /// Buffer built pixel by pixel; `f(row, col)` yields the channels of one
    /// pixel.
    #[must_use]
    pub fn from_fn<const C: usize>(height: usize, width: usize, mut f: impl FnMut(usize, usize) -> [T; C]) -> Self {
        let mut data = Vec::with_capacity(height * width * C);
        for row in 0..height {
            for col in 0..width {
                data.extend(f(row, col));
            }
        }
        Self { height, width, channels: C, data }
    }
}

impl<T: Clone> SensorArray<T> {
    /// Buffer of the given shape filled with `value`.
    #[must_use]
    pub fn filled(height: usize, width: usize, channels: usize, value: T) -> Self {
        Self { height, width, channels, data: vec![value; height * width * channels] }
    }
}

/// Value reported by a single sensor channel.
#[derive(Clone, Debug, PartialEq)]
pub enum SensorValue {
    /// 8-bit colour image, 3 (RGB) or 4 (RGBA) channels.
    Color(SensorArray<u8>),
    /// Floating point colour image, nominally in `[0, 1]`.
    ColorF32(SensorArray<f32>),
    /// Single-channel depth in metres.
    Depth(SensorArray<f32>),
    /// Single-channel instance/semantic labels.
    Semantic(SensorArray<u32>),
    /// Small integer vector such as the goal category index.
    Indices(Vec<i64>),
}

/// Sensor readings captured after one reset or step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Observation {
    sensors: BTreeMap<String, SensorValue>,
}

impl Observation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: SensorValue) {
        self.sensors.insert(name.into(), value);
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: SensorValue) -> Self {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SensorValue> {
        self.sensors.get(name)
    }

    #[must_use]
    pub fn color(&self) -> Option<&SensorArray<u8>> {
        match self.sensors.get(COLOR_SENSOR) {
            Some(SensorValue::Color(array)) => Some(array),
            _ => None,
        }
    }

    #[must_use]
    pub fn depth(&self) -> Option<&SensorArray<f32>> {
        match self.sensors.get(DEPTH_SENSOR) {
            Some(SensorValue::Depth(array)) => Some(array),
            _ => None,
        }
    }

    #[must_use]
    pub fn semantic(&self) -> Option<&SensorArray<u32>> {
        match self.sensors.get(SEMANTIC_SENSOR) {
            Some(SensorValue::Semantic(array)) => Some(array),
            _ => None,
        }
    }

    #[must_use]
    pub fn object_goal(&self) -> Option<&[i64]> {
        match self.sensors.get(OBJECT_GOAL) {
            Some(SensorValue::Indices(values)) => Some(values),
            _ => None,
        }
    }

    pub fn sensor_names(&self) -> impl Iterator<Item = &str> {
        self.sensors.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }
}

/// Command consumed by [`crate::Environment::step`].
///
/// Serialises as `{"action": "...", "action_args": {...}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub action: String,
    #[serde(default)]
    pub action_args: BTreeMap<String, f32>,
}

impl Action {
    pub const VELOCITY_CONTROL: &'static str = "velocity_control";
    pub const LINEAR_VELOCITY: &'static str = "linear_velocity";
    pub const ANGULAR_VELOCITY: &'static str = "angular_velocity";

    /// Parameterless action such as `move_forward`.
    #[must_use]
    pub fn discrete(name: impl Into<String>) -> Self {
        Self { action: name.into(), action_args: BTreeMap::new() }
    }

    #[must_use]
    pub fn velocity_control(linear_velocity: f32, angular_velocity: f32) -> Self {
        let mut action_args = BTreeMap::new();
        action_args.insert(Self::LINEAR_VELOCITY.to_string(), linear_velocity);
        action_args.insert(Self::ANGULAR_VELOCITY.to_string(), angular_velocity);
        Self { action: Self::VELOCITY_CONTROL.to_string(), action_args }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.action
    }

    #[must_use]
    pub fn arg(&self, name: &str) -> Option<f32> {
        self.action_args.get(name).copied()
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.action)?;
        if !self.action_args.is_empty() {
            let args: Vec<String> =
                self.action_args.iter().map(|(k, v)| format!("{k}={v}")).collect();
            write!(f, "({})", args.join(", "))?;
        }
        Ok(())
    }
}

/// Scalar indicators reported by the environment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metrics {
    values: BTreeMap<String, f64>,
}

impl Metrics {
    pub const SUCCESS: &'static str = "success";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn set_flag(&mut self, name: impl Into<String>, flag: bool) {
        self.insert(name, if flag { 1.0 } else { 0.0 });
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// `true` only when a non-zero `success` metric is present.
    #[must_use]
    pub fn success(&self) -> bool {
        self.get(Self::SUCCESS).is_some_and(|v| v != 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Identity of one episode as issued by the environment's dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeDescriptor {
    pub episode_id: String,
    pub scene_id: String,
    #[serde(default)]
    pub object_category: String,
    #[serde(default)]
    pub start_position: [f32; 3],
    #[serde(default = "identity_rotation")]
    pub start_rotation: [f32; 4],
    #[serde(default)]
    pub start_room: Option<String>,
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

impl EpisodeDescriptor {
    #[must_use]
    pub fn new(episode_id: impl Into<String>, scene_id: impl Into<String>) -> Self {
        Self {
            episode_id: episode_id.into(),
            scene_id: scene_id.into(),
            object_category: String::new(),
            start_position: [0.0; 3],
            start_rotation: identity_rotation(),
            start_room: None,
        }
    }

    /// Scene folder name, e.g. `00800-TEEsavR23oF` for
    /// `hm3d/val/00800-TEEsavR23oF/TEEsavR23oF.basis.glb`.
    #[must_use]
    pub fn scene_name(&self) -> &str {
        let mut parts = self.scene_id.rsplit('/');
        match (parts.next(), parts.next()) {
            (Some(_), Some(folder)) => folder,
            _ => &self.scene_id,
        }
    }
}
