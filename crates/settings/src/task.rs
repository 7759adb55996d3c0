use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::SettingsError;

/// Dataset and task overrides for object-goal evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub split: String,
    /// Episode file of the split.
    pub data_path: PathBuf,
    /// Root that episode `scene_id`s are relative to.
    pub scenes_dir: PathBuf,
    /// Steps after which the environment ends an episode on its own.
    pub max_episode_steps: usize,
    /// Shuffle the episode iterator.
    pub shuffle: bool,
    /// Radius around the goal counted as success, in metres.
    pub success_distance: f32,
}

impl TaskConfig {
    pub const DEFAULT_SPLIT: &'static str = "val_mini";
    pub const DEFAULT_MAX_EPISODE_STEPS: usize = 3;
    pub const DATASETS_DIR: &'static str = "data/datasets/objectnav/hm3d/v2";
    pub const SCENES_DIR: &'static str = "data/scene_datasets/hm3d_v0.2";

    #[must_use]
    pub fn new(split: &str) -> Self {
        Self {
            split: split.to_string(),
            data_path: Self::dataset_path(split),
            scenes_dir: PathBuf::from(Self::SCENES_DIR),
            max_episode_steps: Self::DEFAULT_MAX_EPISODE_STEPS,
            shuffle: true,
            success_distance: 0.1,
        }
    }

    /// `data/datasets/objectnav/hm3d/v2/{split}/{split}.json.gz`
    #[must_use]
    pub fn dataset_path(split: &str) -> PathBuf {
        Self::dataset_path_in(Self::DATASETS_DIR, split)
    }

    /// `{root}/{split}/{split}.json.gz`
    #[must_use]
    pub fn dataset_path_in(root: impl AsRef<Path>, split: &str) -> PathBuf {
        root.as_ref().join(split).join(format!("{split}.json.gz"))
    }

    /// The split's episode file as found on disk: the decompressed
    /// `{split}.json` next to `data_path` first, then `data_path` itself.
    #[must_use]
    pub fn existing_dataset(&self) -> Option<PathBuf> {
        let decompressed = self
            .data_path
            .extension()
            .is_some_and(|ext| ext == "gz")
            .then(|| self.data_path.with_extension(""));
        decompressed
            .into_iter()
            .chain(std::iter::once(self.data_path.clone()))
            .find(|path| path.is_file())
    }

    /// Where the asset of an episode's `scene_id` lives.
    #[must_use]
    pub fn scene_path(&self, scene_id: &str) -> PathBuf {
        self.scenes_dir.join(scene_id)
    }

    #[must_use]
    pub fn with_max_episode_steps(mut self, steps: usize) -> Self {
        self.max_episode_steps = steps;
        self
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[must_use]
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    /// Look the split's episode file up under `root` instead of
    /// [`DATASETS_DIR`](Self::DATASETS_DIR).
    #[must_use]
    pub fn with_datasets_dir(mut self, root: impl AsRef<Path>) -> Self {
        self.data_path = Self::dataset_path_in(root, &self.split);
        self
    }

    #[must_use]
    pub fn with_scenes_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scenes_dir = dir.into();
        self
    }

    /// # Errors
    ///
    /// [`SettingsError::Invalid`] for a zero step limit or a non-positive
    /// success radius.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_episode_steps == 0 {
            return Err(SettingsError::Invalid("max_episode_steps must be at least 1".into()));
        }
        if self.success_distance.is_nan() || self.success_distance <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "success_distance must be positive, got {}",
                self.success_distance
            )));
        }
        Ok(())
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SPLIT)
    }
}
