use episode::EpisodeDescriptor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::area::NavigableArea;
use crate::pose::{Pose, Vec3};
use crate::KinematicError;

/// Goal categories of the object-goal task, indexed by the `objectgoal`
/// sensor.
pub const OBJECT_CATEGORIES: [&str; 6] = ["chair", "bed", "plant", "toilet", "tv_monitor", "sofa"];

/// Index of `category` in [`OBJECT_CATEGORIES`].
#[must_use]
pub fn category_index(category: &str) -> Option<usize> {
    OBJECT_CATEGORIES.iter().position(|c| *c == category)
}

/// One dataset episode: its public descriptor plus the goal location the
/// environment scores against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavEpisode {
    #[serde(flatten)]
    pub descriptor: EpisodeDescriptor,
    #[serde(default)]
    pub goal_position: [f32; 3],
}

/// Episode collection read from `{"episodes": [...]}` JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub episodes: Vec<NavEpisode>,
}

impl Dataset {
    /// # Errors
    ///
    /// [`KinematicError::Parse`] for malformed JSON.
    pub fn from_json_str(json: &str) -> Result<Self, KinematicError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a plain JSON dataset file.
    ///
    /// # Errors
    ///
    /// [`KinematicError::Compressed`] for `.gz` files, [`KinematicError::Io`]
    /// when the file cannot be read and [`KinematicError::Parse`] for
    /// malformed contents.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, KinematicError> {
        let path = path.as_ref();
        if path.extension().is_some_and(|ext| ext == "gz") {
            return Err(KinematicError::Compressed(path.to_path_buf()));
        }
        let json = fs::read_to_string(path)
            .map_err(|source| KinematicError::Io { path: path.to_path_buf(), source })?;
        let dataset = Self::from_json_str(&json)?;
        info!("Loaded {} episodes from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    /// `count` episodes in `scene_id` with random starts, headings and goals
    /// inside `area`. Categories cycle through [`OBJECT_CATEGORIES`].
    #[must_use]
    pub fn generate(scene_id: &str, count: usize, area: &NavigableArea, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let episodes = (0..count)
            .map(|i| {
                let start = area.random_navigable_point(&mut rng);
                let goal = area.random_navigable_point(&mut rng);
                let heading = Pose::new(start, (rng.f32() * 2.0 - 1.0) * std::f32::consts::PI);
                let mut descriptor = EpisodeDescriptor::new(i.to_string(), scene_id);
                descriptor.object_category = OBJECT_CATEGORIES[i % OBJECT_CATEGORIES.len()].to_string();
                descriptor.start_position = start.to_array();
                descriptor.start_rotation = heading.rotation();
                NavEpisode { descriptor, goal_position: goal.to_array() }
            })
            .collect();
        Self { episodes }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }
}

impl NavEpisode {
    #[must_use]
    pub fn goal(&self) -> Vec3 {
        Vec3::from_array(self.goal_position)
    }

    #[must_use]
    pub fn start_pose(&self) -> Pose {
        Pose::from_start(self.descriptor.start_position, self.descriptor.start_rotation)
    }
}
