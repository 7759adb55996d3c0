//! # Episode Runner
//!
//! Drives one episode from reset to termination or step cap:
//!
//! 1. reset the environment and keep the initial observation;
//! 2. while the environment is not done and fewer than `max_steps` steps were
//!    taken, select an action, step, read the post-action completion flag and
//!    metrics, score the step and add it to the running total;
//! 3. read the final metrics and return them with the total.
//!
//! Environment errors abort the episode and propagate to the caller; the
//! partial reward is dropped with them.

use tracing::{debug, info};

use crate::env::{EnvironmentGuard, Environment, EpisodeError};
use crate::policy::{ActionPolicy, ConstantVelocity, RewardPolicy, SparseSuccessReward};
use crate::types::{Action, EpisodeDescriptor, Metrics, Observation};

/// Step cap used by the evaluation driver.
pub const DEFAULT_MAX_STEPS: usize = 100;

/// Result of one episode.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeOutcome {
    pub episode_id: String,
    pub total_reward: f64,
    pub steps: usize,
    pub metrics: Metrics,
}

/// Everything known about a step right after it was scored.
#[derive(Debug)]
pub struct StepRecord<'a> {
    pub step: usize,
    pub action: &'a Action,
    pub reward: f64,
    pub observation: &'a Observation,
    pub done: bool,
    pub metrics: &'a Metrics,
}

/// Read-only hooks into the episode loop, e.g. for progress output.
///
/// Only `on_step` is required; closures over a [`StepRecord`] observe steps
/// alone.
pub trait StepObserver {
    /// Called once the environment has reset, with the episode it chose.
    fn on_reset(&mut self, _episode: &EpisodeDescriptor, _observation: &Observation) {}

    fn on_step(&mut self, record: &StepRecord<'_>);

    /// Called by [`run_all`] after each finished episode.
    fn on_episode_end(&mut self, _outcome: &EpisodeOutcome) {}
}

impl<F> StepObserver for F
where
    F: FnMut(&StepRecord<'_>),
{
    fn on_step(&mut self, record: &StepRecord<'_>) {
        self(record);
    }
}

struct Silent;

impl StepObserver for Silent {
    fn on_step(&mut self, _record: &StepRecord<'_>) {}
}

/// Episode loop parameterised by its action and reward policies.
#[derive(Clone, Debug)]
pub struct EpisodeRunner<A = ConstantVelocity, R = SparseSuccessReward> {
    action_policy: A,
    reward_policy: R,
    max_steps: usize,
}

impl EpisodeRunner {
    /// Runner with the constant-velocity action policy and the sparse
    /// success reward.
    #[must_use]
    pub fn new(max_steps: usize) -> Self {
        Self {
            action_policy: ConstantVelocity::default(),
            reward_policy: SparseSuccessReward::default(),
            max_steps,
        }
    }
}

impl<A: ActionPolicy, R: RewardPolicy> EpisodeRunner<A, R> {
    #[must_use]
    pub fn with_action_policy<B: ActionPolicy>(self, action_policy: B) -> EpisodeRunner<B, R> {
        EpisodeRunner { action_policy, reward_policy: self.reward_policy, max_steps: self.max_steps }
    }

    #[must_use]
    pub fn with_reward_policy<S: RewardPolicy>(self, reward_policy: S) -> EpisodeRunner<A, S> {
        EpisodeRunner { action_policy: self.action_policy, reward_policy, max_steps: self.max_steps }
    }

    #[must_use]
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Run `episode` to completion or to the step cap.
    ///
    /// # Errors
    ///
    /// Propagates the first error raised by `reset` or `step`.
    pub fn run<E>(&mut self, env: &mut E, episode: &EpisodeDescriptor) -> Result<EpisodeOutcome, EpisodeError>
    where
        E: Environment + ?Sized,
    {
        self.run_observed(env, episode, &mut Silent)
    }

    /// Like [`run`](Self::run), reporting every scored step to `observer`.
    ///
    /// # Errors
    ///
    /// Propagates the first error raised by `reset` or `step`.
    pub fn run_observed<E, O>(
        &mut self,
        env: &mut E,
        episode: &EpisodeDescriptor,
        observer: &mut O,
    ) -> Result<EpisodeOutcome, EpisodeError>
    where
        E: Environment + ?Sized,
        O: StepObserver + ?Sized,
    {
        let mut observation = env.reset()?;
        // The environment's own iterator decides which episode actually runs.
        let current = env.current_episode().unwrap_or(episode);
        let episode_id = current.episode_id.clone();
        debug!(episode_id = %episode_id, "episode reset");
        observer.on_reset(current, &observation);

        let mut total_reward = 0.0;
        let mut steps = 0;
        while !env.episode_over() && steps < self.max_steps {
            let action = self.action_policy.select(&observation);
            observation = env.step(&action)?;

            let done = env.episode_over();
            let metrics = env.metrics();
            let reward = self.reward_policy.reward(&metrics, done, &observation);
            total_reward += reward;

            observer.on_step(&StepRecord {
                step: steps,
                action: &action,
                reward,
                observation: &observation,
                done,
                metrics: &metrics,
            });
            steps += 1;
        }

        let metrics = env.metrics();
        Ok(EpisodeOutcome { episode_id, total_reward, steps, metrics })
    }
}

/// Convenience wrapper running `episode` with the default policies.
///
/// # Errors
///
/// Propagates the first error raised by `reset` or `step`.
pub fn run_episode<E>(env: &mut E, episode: &EpisodeDescriptor, max_steps: usize) -> Result<EpisodeOutcome, EpisodeError>
where
    E: Environment + ?Sized,
{
    EpisodeRunner::new(max_steps).run(env, episode)
}

/// Run every episode `env` enumerates, in order, then close it.
///
/// `observer` sees every reset and step and each finished episode. The
/// environment is closed even when an episode fails; the first error
/// aborts the remaining episodes.
///
/// # Errors
///
/// Propagates the first environment error.
pub fn run_all<E, A, R, O>(
    env: &mut E,
    runner: &mut EpisodeRunner<A, R>,
    observer: &mut O,
) -> Result<Vec<EpisodeOutcome>, EpisodeError>
where
    E: Environment + ?Sized,
    A: ActionPolicy,
    R: RewardPolicy,
    O: StepObserver + ?Sized,
{
    let mut guard = EnvironmentGuard::new(env);
    let episodes = guard.episodes().to_vec();
    info!("Total episodes in dataset: {}", episodes.len());

    let mut outcomes = Vec::with_capacity(episodes.len());
    for (index, episode) in episodes.iter().enumerate() {
        info!("Episode {index} started");
        let outcome = runner.run_observed(&mut *guard, episode, observer)?;
        observer.on_episode_end(&outcome);
        outcomes.push(outcome);
    }

    guard.close();
    Ok(outcomes)
}

/// Aggregate over a batch of episodes.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub mean_reward: f64,
    pub min_reward: f64,
    pub max_reward: f64,
    pub successes: usize,
    pub total_steps: usize,
}

impl TrainingSummary {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_outcomes(outcomes: &[EpisodeOutcome]) -> Self {
        if outcomes.is_empty() {
            return Self {
                episodes: 0,
                mean_reward: 0.0,
                min_reward: 0.0,
                max_reward: 0.0,
                successes: 0,
                total_steps: 0,
            };
        }
        let total: f64 = outcomes.iter().map(|o| o.total_reward).sum();
        let min_reward = outcomes.iter().map(|o| o.total_reward).fold(f64::INFINITY, f64::min);
        let max_reward = outcomes.iter().map(|o| o.total_reward).fold(f64::NEG_INFINITY, f64::max);
        Self {
            episodes: outcomes.len(),
            mean_reward: total / outcomes.len() as f64,
            min_reward,
            max_reward,
            successes: outcomes.iter().filter(|o| o.metrics.success()).count(),
            total_steps: outcomes.iter().map(|o| o.steps).sum(),
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.successes as f64 / self.episodes as f64
        }
    }
}
