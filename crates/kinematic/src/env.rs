use episode::{Action, Environment, EpisodeDescriptor, EpisodeError, Metrics, Observation};
use settings::{make_cfg, SimSettings, TaskConfig};
use tracing::{debug, info};

use crate::area::NavigableArea;
use crate::dataset::{category_index, Dataset, NavEpisode};
use crate::render::Goal;
use crate::sim::{Actuation, KinematicSim};
use crate::KinematicError;

pub const DISTANCE_TO_GOAL: &str = "distance_to_goal";
pub const SPL: &str = "spl";

/// Object-goal navigation task on top of [`KinematicSim`].
///
/// Episodes are visited in dataset order, or in a seeded permutation when
/// the task asks for shuffling, and wrap around after the last one. An
/// episode ends when the agent calls `stop` or after the task's step limit.
pub struct KinematicEnv {
    sim: KinematicSim,
    episodes: Vec<NavEpisode>,
    descriptors: Vec<EpisodeDescriptor>,
    order: Vec<usize>,
    cursor: usize,
    current: Option<usize>,
    max_episode_steps: usize,
    success_distance: f32,
    steps: usize,
    stop_called: bool,
    over: bool,
    start_distance: f32,
    path_length: f32,
}

impl KinematicEnv {
    /// Environment over `dataset` with sensors and actions from `settings`
    /// and a navigable area of [`NavigableArea::default`] size.
    ///
    /// # Errors
    ///
    /// [`KinematicError::Settings`] when either configuration is invalid and
    /// [`KinematicError::NoAgent`] when `settings.default_agent` names no
    /// configured agent.
    pub fn new(settings: &SimSettings, task: &TaskConfig, dataset: Dataset) -> Result<Self, KinematicError> {
        settings.validate()?;
        let sim = KinematicSim::new(make_cfg(settings), NavigableArea::default())?;
        Self::with_sim(sim, task, dataset, settings.seed)
    }

    /// # Errors
    ///
    /// [`KinematicError::Settings`] when `task` is invalid.
    pub fn with_sim(
        sim: KinematicSim,
        task: &TaskConfig,
        dataset: Dataset,
        seed: u64,
    ) -> Result<Self, KinematicError> {
        task.validate()?;
        let episodes = dataset.episodes;
        let descriptors = episodes.iter().map(|e| e.descriptor.clone()).collect();
        let mut order: Vec<usize> = (0..episodes.len()).collect();
        if task.shuffle {
            fastrand::Rng::with_seed(seed).shuffle(&mut order);
        }
        info!("Initializing environment with {} episodes", episodes.len());
        Ok(Self {
            sim,
            episodes,
            descriptors,
            order,
            cursor: 0,
            current: None,
            max_episode_steps: task.max_episode_steps,
            success_distance: task.success_distance,
            steps: 0,
            stop_called: false,
            over: false,
            start_distance: 0.0,
            path_length: 0.0,
        })
    }

    #[must_use]
    pub fn sim(&self) -> &KinematicSim {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut KinematicSim {
        &mut self.sim
    }

    /// Goal of the current episode.
    #[must_use]
    pub fn goal(&self) -> Option<Goal> {
        let episode = self.episodes.get(self.current?)?;
        Some(Goal {
            position: episode.goal(),
            category: category_index(&episode.descriptor.object_category).unwrap_or(0),
        })
    }

    /// Steps taken in the current episode.
    #[must_use]
    pub fn elapsed_steps(&self) -> usize {
        self.steps
    }

    fn distance_to_goal(&self) -> Option<f32> {
        self.goal().map(|g| self.sim.agent_state().position.planar_distance(g.position))
    }

    fn observe(&self) -> Observation {
        self.sim.observe(self.goal().as_ref())
    }
}

impl Environment for KinematicEnv {
    fn reset(&mut self) -> Result<Observation, EpisodeError> {
        if self.sim.is_closed() {
            return Err(EpisodeError::Closed);
        }
        if self.order.is_empty() {
            return Err(EpisodeError::NoEpisodes);
        }
        let index = self.order[self.cursor % self.order.len()];
        self.cursor += 1;
        let episode = &self.episodes[index];
        self.sim.set_agent_state(episode.start_pose());
        self.current = Some(index);
        self.steps = 0;
        self.stop_called = false;
        self.over = false;
        self.path_length = 0.0;
        self.start_distance = self.distance_to_goal().unwrap_or(0.0);
        debug!(
            "Episode {} reset, goal '{}' at {:.2} m",
            self.descriptors[index].episode_id, self.descriptors[index].object_category, self.start_distance
        );
        Ok(self.observe())
    }

    fn step(&mut self, action: &Action) -> Result<Observation, EpisodeError> {
        if self.sim.is_closed() {
            return Err(EpisodeError::Closed);
        }
        if self.current.is_none() {
            return Err(EpisodeError::Environment("reset must be called before step".into()));
        }
        if self.over {
            return Err(EpisodeError::Environment("episode is over, call reset before step".into()));
        }
        let (actuation, travelled) = self.sim.act(action)?;
        self.path_length += travelled;
        self.steps += 1;
        self.stop_called = actuation == Actuation::Stop;
        self.over = self.stop_called || self.steps >= self.max_episode_steps;
        Ok(self.observe())
    }

    fn episode_over(&self) -> bool {
        self.over
    }

    fn metrics(&self) -> Metrics {
        let Some(distance) = self.distance_to_goal() else {
            return Metrics::new();
        };
        let success = self.stop_called && distance <= self.success_distance;
        let spl = if !success {
            0.0
        } else if self.start_distance.max(self.path_length) <= 0.0 {
            1.0
        } else {
            self.start_distance / self.start_distance.max(self.path_length)
        };
        let mut metrics = Metrics::new().with(DISTANCE_TO_GOAL, f64::from(distance)).with(SPL, f64::from(spl));
        metrics.set_flag(Metrics::SUCCESS, success);
        metrics
    }

    fn episodes(&self) -> &[EpisodeDescriptor] {
        &self.descriptors
    }

    fn current_episode(&self) -> Option<&EpisodeDescriptor> {
        self.descriptors.get(self.current?)
    }

    fn close(&mut self) {
        self.sim.close();
    }
}
