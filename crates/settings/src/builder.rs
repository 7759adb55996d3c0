//! # Configuration Builder
//!
//! Turns [`SimSettings`] into the immutable description of a simulator and
//! its agent. All sensors share the settings' resolution and are mounted at
//! `sensor_height` above the agent base.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::SimSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SensorType {
    Color,
    Depth,
    Semantic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SensorSubType {
    Pinhole,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SensorSpec {
    pub uuid: String,
    pub sensor_type: SensorType,
    pub sensor_subtype: SensorSubType,
    /// `[height, width]` in pixels.
    pub resolution: [u32; 2],
    /// Offset from the agent base in metres.
    pub position: [f32; 3],
}

impl SensorSpec {
    fn pinhole(uuid: &str, sensor_type: SensorType, settings: &SimSettings) -> Self {
        Self {
            uuid: uuid.to_string(),
            sensor_type,
            sensor_subtype: SensorSubType::Pinhole,
            resolution: [settings.height, settings.width],
            position: [0.0, settings.sensor_height, 0.0],
        }
    }
}

/// Named discrete action and its actuation amount.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionSpec {
    pub name: String,
    pub amount: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BackendConfig {
    pub scene_id: String,
    pub gpu_device_id: i32,
    pub enable_physics: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AgentConfig {
    pub sensor_specifications: Vec<SensorSpec>,
    pub action_space: BTreeMap<String, ActionSpec>,
}

impl AgentConfig {
    /// Action names in a stable order.
    #[must_use]
    pub fn action_names(&self) -> Vec<String> {
        self.action_space.keys().cloned().collect()
    }

    #[must_use]
    pub fn sensor(&self, uuid: &str) -> Option<&SensorSpec> {
        self.sensor_specifications.iter().find(|s| s.uuid == uuid)
    }
}

/// Complete simulator description: backend plus one config per agent.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulatorConfig {
    pub sim: BackendConfig,
    pub agents: Vec<AgentConfig>,
    /// Index into `agents` of the agent the simulator drives.
    pub default_agent: usize,
}

impl SimulatorConfig {
    #[must_use]
    pub fn agent(&self, index: usize) -> Option<&AgentConfig> {
        self.agents.get(index)
    }

    #[must_use]
    pub fn default_agent(&self) -> Option<&AgentConfig> {
        self.agent(self.default_agent)
    }
}

/// Discrete navigation actions derived from the settings' amounts.
#[must_use]
pub fn action_space(settings: &SimSettings) -> BTreeMap<String, ActionSpec> {
    let amounts = settings.action_space;
    [
        ("move_forward", amounts.forward),
        ("turn_left", amounts.left),
        ("turn_right", amounts.right),
    ]
    .into_iter()
    .map(|(name, amount)| (name.to_string(), ActionSpec { name: name.to_string(), amount }))
    .collect()
}

/// Full configuration: every enabled pinhole sensor plus the discrete action
/// space.
#[must_use]
pub fn make_cfg(settings: &SimSettings) -> SimulatorConfig {
    let mut sensor_specifications = Vec::new();
    if settings.color_sensor {
        sensor_specifications.push(SensorSpec::pinhole("color_sensor", SensorType::Color, settings));
    }
    if settings.depth_sensor {
        sensor_specifications.push(SensorSpec::pinhole("depth_sensor", SensorType::Depth, settings));
    }
    if settings.semantic_sensor {
        sensor_specifications.push(SensorSpec::pinhole(
            "semantic_sensor",
            SensorType::Semantic,
            settings,
        ));
    }

    SimulatorConfig {
        sim: BackendConfig {
            scene_id: settings.scene.clone(),
            gpu_device_id: settings.gpu_device_id,
            enable_physics: settings.enable_physics,
        },
        agents: vec![AgentConfig { sensor_specifications, action_space: action_space(settings) }],
        default_agent: settings.default_agent,
    }
}

/// Minimal configuration: a single colour sensor and no action space
/// overrides beyond the defaults.
#[must_use]
pub fn make_simple_cfg(settings: &SimSettings) -> SimulatorConfig {
    SimulatorConfig {
        sim: BackendConfig {
            scene_id: settings.scene.clone(),
            gpu_device_id: settings.gpu_device_id,
            enable_physics: settings.enable_physics,
        },
        agents: vec![AgentConfig {
            sensor_specifications: vec![SensorSpec::pinhole("color_sensor", SensorType::Color, settings)],
            action_space: action_space(&SimSettings::default()),
        }],
        default_agent: settings.default_agent,
    }
}
