use std::ops::{Deref, DerefMut};
use thiserror::Error;

use crate::types::{Action, EpisodeDescriptor, Metrics, Observation};

#[derive(Error, Debug)]
pub enum EpisodeError {
    #[error("sensor buffer shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("unsupported action `{0}`")]
    UnsupportedAction(String),
    #[error("missing action argument `{0}`")]
    MissingArgument(String),
    #[error("environment has no episodes")]
    NoEpisodes,
    #[error("environment is closed")]
    Closed,
    #[error("environment failure: {0}")]
    Environment(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Simulation environment driven by the episode runner.
///
/// Modelled on the usual reset/step contract: [`reset`] starts the next
/// episode and returns its first observation, [`step`] applies one action
/// and returns the resulting observation. [`episode_over`] and [`metrics`]
/// must always describe the state left by the most recent `reset` or `step`.
///
/// [`reset`]: Environment::reset
/// [`step`]: Environment::step
/// [`episode_over`]: Environment::episode_over
/// [`metrics`]: Environment::metrics
pub trait Environment {
    /// Start the next episode and return its initial observation.
    ///
    /// # Errors
    ///
    /// Any simulator failure; the runner propagates it untouched.
    fn reset(&mut self) -> Result<Observation, EpisodeError>;

    /// Apply `action` and return the observation that follows it.
    ///
    /// # Errors
    ///
    /// Any simulator failure, including actions the simulator does not know.
    fn step(&mut self, action: &Action) -> Result<Observation, EpisodeError>;

    /// Whether the current episode has terminated.
    fn episode_over(&self) -> bool;

    /// Metrics snapshot for the current episode.
    fn metrics(&self) -> Metrics;

    /// Every episode the environment will iterate over.
    fn episodes(&self) -> &[EpisodeDescriptor];

    /// Episode selected by the most recent `reset`.
    fn current_episode(&self) -> Option<&EpisodeDescriptor>;

    /// Release simulator resources. Must tolerate being called twice.
    fn close(&mut self);
}

/// Scoped ownership of an environment handle.
///
/// The wrapped environment is closed exactly once: by [`close`] or, if that
/// never happens, when the guard is dropped (including during unwinding or
/// an early `?` return).
///
/// [`close`]: EnvironmentGuard::close
pub struct EnvironmentGuard<'a, E: Environment + ?Sized> {
    env: &'a mut E,
    closed: bool,
}

impl<'a, E: Environment + ?Sized> EnvironmentGuard<'a, E> {
    #[must_use]
    pub fn new(env: &'a mut E) -> Self {
        Self { env, closed: false }
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.closed {
            self.closed = true;
            self.env.close();
            tracing::info!("Environment closed!");
        }
    }
}

impl<E: Environment + ?Sized> Deref for EnvironmentGuard<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        &*self.env
    }
}

impl<E: Environment + ?Sized> DerefMut for EnvironmentGuard<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        &mut *self.env
    }
}

impl<E: Environment + ?Sized> Drop for EnvironmentGuard<'_, E> {
    fn drop(&mut self) {
        self.release();
    }
}
