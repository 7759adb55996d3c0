//! # Episode Evaluation
//!
//! Builds the kinematic environment for a split and hands it to
//! [`episode::run_all`], which runs every episode and closes the environment
//! on every exit. [`EvaluationReport`] prints what the runner observes.

use anyhow::{Context, Result};
use episode::{
    run_all, ActionPolicy, ConstantVelocity, EpisodeDescriptor, EpisodeOutcome, EpisodeRunner,
    Observation, RewardPolicy, StepObserver, StepRecord, TrainingSummary, UniformRandom,
};
use kinematic::{Dataset, KinematicEnv, NavigableArea};
use settings::{SimSettings, TaskConfig};
use tracing::{info, warn};

use crate::cli::{EvaluateArgs, PolicyKind};
use crate::report::{
    print_episode_info, print_episode_summary, print_initial_goal, print_scene_path, print_step_info,
    print_training_summary,
};

/// Scene id given to generated episodes.
pub const SYNTHETIC_SCENE: &str = "synthetic/00000-kinematic/kinematic.basis.glb";

pub(crate) fn load_settings(path: Option<&std::path::Path>) -> Result<SimSettings> {
    match path {
        Some(path) => SimSettings::from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(SimSettings::default()),
    }
}

/// Task overrides for the split named in `args`.
#[must_use]
pub fn task_config(args: &EvaluateArgs) -> TaskConfig {
    TaskConfig::new(&args.split)
        .with_datasets_dir(&args.datasets_dir)
        .with_scenes_dir(&args.scenes_dir)
        .with_max_episode_steps(args.max_episode_steps)
        .with_shuffle(!args.no_shuffle)
}

/// `--dataset` wins over the split's file. A split without a file on disk
/// falls back to generated episodes.
fn load_dataset(args: &EvaluateArgs, task: &TaskConfig, seed: u64) -> Result<Dataset> {
    let path = match (&args.dataset, task.existing_dataset()) {
        (Some(path), _) => path.clone(),
        (None, Some(path)) => path,
        (None, None) => {
            warn!(
                "No dataset for split '{}' at {}, generating {} synthetic episodes",
                task.split,
                task.data_path.display(),
                args.episodes
            );
            return Ok(Dataset::generate(SYNTHETIC_SCENE, args.episodes, &NavigableArea::default(), seed));
        }
    };
    Dataset::from_path(&path).with_context(|| format!("Failed to load dataset {}", path.display()))
}

/// Build the environment described by `args`.
///
/// # Errors
///
/// Unreadable settings or dataset files, compressed datasets and invalid
/// configuration values.
pub fn build_environment(args: &EvaluateArgs) -> Result<KinematicEnv> {
    let mut settings = load_settings(args.settings.as_deref())?;
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    let task = task_config(args);
    let dataset = load_dataset(args, &task, settings.seed)?;

    info!("Initializing environment for split '{}'...", task.split);
    let env = KinematicEnv::new(&settings, &task, dataset).context("Failed to initialize environment")?;
    info!("Environment initialized successfully!");
    Ok(env)
}

/// Progress output of an evaluation run: episode info right after reset,
/// every step, then the episode summary.
pub struct EvaluationReport {
    task: TaskConfig,
}

impl EvaluationReport {
    #[must_use]
    pub fn new(task: TaskConfig) -> Self {
        Self { task }
    }
}

impl StepObserver for EvaluationReport {
    fn on_reset(&mut self, episode: &EpisodeDescriptor, observation: &Observation) {
        print_episode_info(episode);
        print_scene_path(&self.task.scene_path(&episode.scene_id));
        print_initial_goal(observation);
    }

    fn on_step(&mut self, record: &StepRecord<'_>) {
        print_step_info(record);
    }

    fn on_episode_end(&mut self, outcome: &EpisodeOutcome) {
        print_episode_summary(outcome);
    }
}

fn evaluate_with<A, R>(
    env: &mut KinematicEnv,
    mut runner: EpisodeRunner<A, R>,
    report: &mut EvaluationReport,
) -> Result<Vec<EpisodeOutcome>>
where
    A: ActionPolicy,
    R: RewardPolicy,
{
    run_all(env, &mut runner, report).context("Evaluation failed")
}

/// Run the `evaluate` subcommand.
///
/// # Errors
///
/// Configuration failures and the first environment error of any episode.
/// The environment is closed in every case.
pub fn run(args: &EvaluateArgs) -> Result<TrainingSummary> {
    let mut env = build_environment(args)?;
    let mut report = EvaluationReport::new(task_config(args));
    let seed = args.seed.unwrap_or(SimSettings::default().seed);
    let runner = EpisodeRunner::new(args.max_steps);
    let outcomes = match args.policy {
        PolicyKind::Constant => {
            evaluate_with(&mut env, runner.with_action_policy(ConstantVelocity::default()), &mut report)?
        }
        PolicyKind::Random => {
            evaluate_with(&mut env, runner.with_action_policy(UniformRandom::navigation(seed)), &mut report)?
        }
    };

    let summary = TrainingSummary::from_outcomes(&outcomes);
    print_training_summary(&summary);
    Ok(summary)
}
