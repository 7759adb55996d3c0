#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Episode Execution
//!
//! The reusable core of the navigation drivers: a bounded episode loop that
//! pulls observations from an [`Environment`], asks an [`ActionPolicy`] for
//! the next action and scores every step with a [`RewardPolicy`].
//!
//! ## Key Components
//!
//! -   **Data model:** [`Observation`], [`Action`], [`Metrics`] and
//!     [`EpisodeDescriptor`] live in the [`types`] module.
//! -   **Environment:** the [`Environment`] trait in [`env`] is the only seam
//!     to the simulator. Anything that can reset, step and report metrics can
//!     be driven.
//! -   **Policies:** [`ConstantVelocity`] and [`UniformRandom`] choose
//!     actions, [`SparseSuccessReward`] scores steps. Closures implement both
//!     policy traits, so scripted or learned policies plug in without
//!     touching the runner.
//! -   **Runner:** [`EpisodeRunner`] drives one episode to completion or to
//!     its step cap; [`run_all`] drives every episode of an environment while
//!     holding it under an [`EnvironmentGuard`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use episode::{run_episode, Environment};
//!
//! let episode = env.episodes()[0].clone();
//! let outcome = run_episode(&mut env, &episode, 100)?;
//! println!("reward {} after {} steps", outcome.total_reward, outcome.steps);
//! ```

pub mod env;
pub mod policy;
pub mod runner;
pub mod types;

pub use env::{EnvironmentGuard, Environment, EpisodeError};
pub use policy::{
    ActionPolicy, ConstantVelocity, RewardPolicy, SparseSuccessReward, UniformRandom,
    DEFAULT_ACTION_NAMES,
};
pub use runner::{
    run_all, run_episode, EpisodeOutcome, EpisodeRunner, StepObserver, StepRecord,
    TrainingSummary, DEFAULT_MAX_STEPS,
};
pub use types::{
    Action, EpisodeDescriptor, Metrics, Observation, SensorArray, SensorValue, COLOR_SENSOR,
    DEPTH_SENSOR, OBJECT_GOAL, SEMANTIC_SENSOR,
};
