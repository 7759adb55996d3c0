use episode::{Action, EpisodeError, Observation, SensorArray};
use scene::{NavMesh, SceneError};
use settings::{AgentConfig, SimulatorConfig};
use std::path::Path;
use tracing::{debug, info};

use crate::area::NavigableArea;
use crate::pose::{Pose, Vec3};
use crate::render::{render, Goal};
use crate::KinematicError;

pub const MOVE_FORWARD: &str = "move_forward";
pub const TURN_LEFT: &str = "turn_left";
pub const TURN_RIGHT: &str = "turn_right";
pub const STOP: &str = "stop";

/// What an applied action asked of the episode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Actuation {
    Moved,
    Stop,
}

/// Kinematic agent simulator: one agent, one pose, synthetic sensors.
///
/// Movement is exact. Translations that would leave the navigable area end
/// on its edge instead.
pub struct KinematicSim {
    config: SimulatorConfig,
    agent: AgentConfig,
    area: NavigableArea,
    navmesh: Option<NavMesh>,
    pose: Pose,
    /// Integration step of `velocity_control`, in seconds.
    control_dt: f32,
    closed: bool,
}

impl KinematicSim {
    pub const DEFAULT_CONTROL_DT: f32 = 1.0;

    /// # Errors
    ///
    /// [`KinematicError::NoAgent`] when `config` has no agent at its
    /// `default_agent` index.
    pub fn new(config: SimulatorConfig, area: NavigableArea) -> Result<Self, KinematicError> {
        let agent = config.default_agent().cloned().ok_or(KinematicError::NoAgent(config.default_agent))?;
        info!(
            "Simulator ready: scene '{}', {} sensors, actions {:?}",
            config.sim.scene_id,
            agent.sensor_specifications.len(),
            agent.action_names()
        );
        Ok(Self {
            config,
            agent,
            area,
            navmesh: None,
            pose: Pose::new(area.clamp(Pose::default().position), 0.0),
            control_dt: Self::DEFAULT_CONTROL_DT,
            closed: false,
        })
    }

    #[must_use]
    pub fn with_control_dt(mut self, control_dt: f32) -> Self {
        self.control_dt = control_dt;
        self
    }

    /// Load the scene's navigation mesh.
    ///
    /// # Errors
    ///
    /// [`SceneError::AssetLoadFailure`] when the mesh cannot be loaded; the
    /// caller is expected to abort the scene.
    pub fn load_navmesh(&mut self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        self.navmesh = Some(NavMesh::load(path)?);
        Ok(())
    }

    #[must_use]
    pub fn navmesh(&self) -> Option<&NavMesh> {
        self.navmesh.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// The agent this simulator drives.
    #[must_use]
    pub fn agent(&self) -> &AgentConfig {
        &self.agent
    }

    #[must_use]
    pub fn area(&self) -> &NavigableArea {
        &self.area
    }

    #[must_use]
    pub fn agent_state(&self) -> Pose {
        self.pose
    }

    /// Place the agent; the position is snapped onto the navigable floor.
    pub fn set_agent_state(&mut self, pose: Pose) {
        self.pose = Pose::new(self.area.clamp(pose.position), pose.yaw);
    }

    pub fn random_navigable_point(&self, rng: &mut fastrand::Rng) -> Vec3 {
        self.area.random_navigable_point(rng)
    }

    #[must_use]
    pub fn topdown_map(&self, cells: usize) -> SensorArray<u8> {
        self.area.topdown_map(cells)
    }

    fn amount(&self, name: &str) -> Result<f32, EpisodeError> {
        self.agent
            .action_space
            .get(name)
            .map(|spec| spec.amount)
            .ok_or_else(|| EpisodeError::UnsupportedAction(name.to_string()))
    }

    fn translate(&mut self, distance: f32) -> f32 {
        let before = self.pose.position;
        let target = before + self.pose.forward() * distance;
        self.pose.position = self.area.clamp(target);
        before.planar_distance(self.pose.position)
    }

    /// Apply `action` to the agent pose.
    ///
    /// Returns the actuation and the distance travelled.
    ///
    /// # Errors
    ///
    /// [`EpisodeError::Closed`] after [`close`](Self::close),
    /// [`EpisodeError::UnsupportedAction`] for actions outside the agent's
    /// action space and [`EpisodeError::MissingArgument`] for a velocity
    /// command without both velocities.
    pub fn act(&mut self, action: &Action) -> Result<(Actuation, f32), EpisodeError> {
        if self.closed {
            return Err(EpisodeError::Closed);
        }
        let travelled = match action.name() {
            STOP => return Ok((Actuation::Stop, 0.0)),
            MOVE_FORWARD => {
                let amount = self.amount(MOVE_FORWARD)?;
                self.translate(amount)
            }
            TURN_LEFT => {
                let degrees = self.amount(TURN_LEFT)?;
                self.pose.turn(degrees);
                0.0
            }
            TURN_RIGHT => {
                let degrees = self.amount(TURN_RIGHT)?;
                self.pose.turn(-degrees);
                0.0
            }
            Action::VELOCITY_CONTROL => {
                let linear = action
                    .arg(Action::LINEAR_VELOCITY)
                    .ok_or_else(|| EpisodeError::MissingArgument(Action::LINEAR_VELOCITY.to_string()))?;
                let angular = action
                    .arg(Action::ANGULAR_VELOCITY)
                    .ok_or_else(|| EpisodeError::MissingArgument(Action::ANGULAR_VELOCITY.to_string()))?;
                // Angular velocity is in degrees per second.
                self.pose.turn(angular * self.control_dt);
                self.translate(linear * self.control_dt)
            }
            other => return Err(EpisodeError::UnsupportedAction(other.to_string())),
        };
        debug!("{action} -> {:?}", self.pose);
        Ok((Actuation::Moved, travelled))
    }

    /// Render every configured sensor from the current pose.
    #[must_use]
    pub fn observe(&self, goal: Option<&Goal>) -> Observation {
        render(&self.agent, &self.pose, &self.area, goal)
    }

    /// [`act`](Self::act) followed by [`observe`](Self::observe) without a goal.
    ///
    /// # Errors
    ///
    /// As [`act`](Self::act).
    pub fn step(&mut self, action: &Action) -> Result<Observation, EpisodeError> {
        self.act(action)?;
        Ok(self.observe(None))
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.navmesh = None;
            debug!("Simulator for '{}' closed", self.config.sim.scene_id);
        }
    }
}

impl Drop for KinematicSim {
    fn drop(&mut self) {
        self.close();
    }
}
