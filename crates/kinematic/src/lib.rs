#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Kinematic Navigation Environment
//!
//! A minimal stand-in for an embodied-AI simulator, enough to run the
//! navigation drivers end to end. It has no physics and renders no scene
//! assets.
//!
//! ## Key Components
//!
//! -   [`KinematicSim`]: a single agent on a square navigable floor. Discrete
//!     actions move and turn it by the amounts in its action space;
//!     `velocity_control` integrates velocities over a fixed control step.
//!     Sensors are synthesised from the pose by the [`render`] module.
//! -   [`KinematicEnv`]: the object-goal task around the simulator,
//!     implementing [`episode::Environment`]. It iterates a [`Dataset`],
//!     ends episodes on `stop` or at the step limit and reports
//!     `distance_to_goal`, `success` and `spl`.
//! -   [`NavigableArea`]: bounds, random navigable points and the top-down
//!     occupancy map.

pub mod area;
pub mod dataset;
pub mod env;
pub mod pose;
pub mod render;
pub mod sim;

use settings::SettingsError;
use std::path::PathBuf;
use thiserror::Error;

pub use area::{NavigableArea, MAP_BORDER, MAP_NAVIGABLE, MAP_UNNAVIGABLE};
pub use dataset::{category_index, Dataset, NavEpisode, OBJECT_CATEGORIES};
pub use env::{KinematicEnv, DISTANCE_TO_GOAL, SPL};
pub use pose::{Pose, Vec3};
pub use render::Goal;
pub use sim::{Actuation, KinematicSim, MOVE_FORWARD, STOP, TURN_LEFT, TURN_RIGHT};

#[derive(Error, Debug)]
pub enum KinematicError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("compressed dataset {} is not supported, decompress it first", .0.display())]
    Compressed(PathBuf),
    #[error("simulator configuration has no agent {0}")]
    NoAgent(usize),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
