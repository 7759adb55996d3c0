use clap::{Args, Parser, Subcommand, ValueEnum};
use episode::DEFAULT_MAX_STEPS;
use settings::TaskConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "driver")]
#[command(about = "Run navigation episodes and explore scenes with the kinematic environment")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every dataset episode and report rewards and metrics
    Evaluate(EvaluateArgs),
    /// Random-walk through every scene, saving samples and a video
    Explore(ExploreArgs),
}

/// Strategy choosing the agent's actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    /// Constant `velocity_control` command
    Constant,
    /// Uniformly random discrete navigation action
    Random,
}

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// Dataset split
    #[arg(long, default_value = TaskConfig::DEFAULT_SPLIT)]
    pub split: String,

    /// Episode dataset (plain JSON). Overrides the split's own file
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Root holding one `{split}/{split}.json[.gz]` episode file per split
    #[arg(long, default_value = TaskConfig::DATASETS_DIR)]
    pub datasets_dir: PathBuf,

    /// Root that episode scene ids are relative to
    #[arg(long, default_value = TaskConfig::SCENES_DIR)]
    pub scenes_dir: PathBuf,

    /// Number of synthetic episodes to generate when the split has no file
    #[arg(long, default_value_t = 5)]
    pub episodes: usize,

    /// Step cap of the episode runner
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    pub max_steps: usize,

    /// Steps after which the environment ends an episode itself
    #[arg(long, default_value_t = TaskConfig::DEFAULT_MAX_EPISODE_STEPS)]
    pub max_episode_steps: usize,

    #[arg(long, value_enum, default_value_t = PolicyKind::Constant)]
    pub policy: PolicyKind,

    /// Seed for shuffling, generated episodes and the random policy
    #[arg(long)]
    pub seed: Option<u64>,

    /// Visit episodes in dataset order
    #[arg(long)]
    pub no_shuffle: bool,

    /// Simulator settings JSON
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ExploreArgs {
    /// Root folder of `prefix-id` scene directories
    #[arg(long, default_value = "data/train/")]
    pub scenes: PathBuf,

    /// Directory receiving samples, maps and videos
    #[arg(long, default_value = "outputs")]
    pub output: PathBuf,

    /// Steps walked per scene
    #[arg(long, default_value_t = 200)]
    pub max_frames: usize,

    /// Do not save observation samples
    #[arg(long)]
    pub no_display: bool,

    /// Do not assemble a GIF per scene
    #[arg(long)]
    pub no_make_video: bool,

    /// Simulator settings JSON
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

impl ExploreArgs {
    #[must_use]
    pub fn display(&self) -> bool {
        !self.no_display
    }

    #[must_use]
    pub fn make_video(&self) -> bool {
        !self.no_make_video
    }
}
