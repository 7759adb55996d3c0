//! # Action and Reward Policies
//!
//! Both policies are single-method traits injected into the runner. Closures
//! implement them directly, so a scripted or learned policy is a one-liner:
//!
//! ```rust,ignore
//! let runner = EpisodeRunner::new(50)
//!     .with_action_policy(|_: &Observation| Action::discrete("move_forward"))
//!     .with_reward_policy(|m: &Metrics, _done: bool, _obs: &Observation| {
//!         -m.get("distance_to_goal").unwrap_or(0.0)
//!     });
//! ```

use crate::types::{Action, Metrics, Observation};

/// Discrete action names of the default navigation action space.
pub const DEFAULT_ACTION_NAMES: [&str; 3] = ["move_forward", "turn_left", "turn_right"];

/// Chooses the next action from the current observation.
///
/// Implementations may keep private state (an RNG, a recurrent hidden
/// state) but never reach into the environment or the runner.
pub trait ActionPolicy {
    fn select(&mut self, observation: &Observation) -> Action;
}

impl<F> ActionPolicy for F
where
    F: FnMut(&Observation) -> Action,
{
    fn select(&mut self, observation: &Observation) -> Action {
        self(observation)
    }
}

/// Always commands the same velocities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantVelocity {
    pub linear_velocity: f32,
    pub angular_velocity: f32,
}

impl Default for ConstantVelocity {
    fn default() -> Self {
        Self { linear_velocity: 0.5, angular_velocity: 0.5 }
    }
}

impl ActionPolicy for ConstantVelocity {
    fn select(&mut self, _observation: &Observation) -> Action {
        Action::velocity_control(self.linear_velocity, self.angular_velocity)
    }
}

/// Uniformly samples one of a fixed set of discrete action names.
#[derive(Clone, Debug)]
pub struct UniformRandom {
    actions: Vec<String>,
    rng: fastrand::Rng,
}

impl UniformRandom {
    /// Samples over `actions` with a deterministic seed.
    ///
    /// # Panics
    ///
    /// Panics if `actions` is empty.
    #[must_use]
    pub fn new<S: Into<String>>(actions: impl IntoIterator<Item = S>, seed: u64) -> Self {
        let actions: Vec<String> = actions.into_iter().map(Into::into).collect();
        assert!(!actions.is_empty(), "random policy needs at least one action");
        Self { actions, rng: fastrand::Rng::with_seed(seed) }
    }

    /// Samples over [`DEFAULT_ACTION_NAMES`].
    #[must_use]
    pub fn navigation(seed: u64) -> Self {
        Self::new(DEFAULT_ACTION_NAMES, seed)
    }

    #[must_use]
    pub fn actions(&self) -> &[String] {
        &self.actions
    }
}

impl ActionPolicy for UniformRandom {
    fn select(&mut self, _observation: &Observation) -> Action {
        let index = self.rng.usize(..self.actions.len());
        Action::discrete(self.actions[index].clone())
    }
}

/// Scores one step from the post-action metrics, completion flag and
/// observation.
pub trait RewardPolicy {
    fn reward(&self, metrics: &Metrics, done: bool, observation: &Observation) -> f64;
}

impl<F> RewardPolicy for F
where
    F: Fn(&Metrics, bool, &Observation) -> f64,
{
    fn reward(&self, metrics: &Metrics, done: bool, observation: &Observation) -> f64 {
        self(metrics, done, observation)
    }
}

/// Flat three-case reward: a bonus for finishing successfully, a penalty for
/// finishing unsuccessfully and a small cost for every other step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SparseSuccessReward {
    pub success_bonus: f64,
    pub failure_penalty: f64,
    pub step_penalty: f64,
}

impl SparseSuccessReward {
    pub const SUCCESS_BONUS: f64 = 10.0;
    pub const FAILURE_PENALTY: f64 = -1.0;
    pub const STEP_PENALTY: f64 = -0.01;
}

impl Default for SparseSuccessReward {
    fn default() -> Self {
        Self {
            success_bonus: Self::SUCCESS_BONUS,
            failure_penalty: Self::FAILURE_PENALTY,
            step_penalty: Self::STEP_PENALTY,
        }
    }
}

impl RewardPolicy for SparseSuccessReward {
    fn reward(&self, metrics: &Metrics, done: bool, _observation: &Observation) -> f64 {
        match (done, metrics.success()) {
            (true, true) => self.success_bonus,
            (true, false) => self.failure_penalty,
            (false, _) => self.step_penalty,
        }
    }
}
