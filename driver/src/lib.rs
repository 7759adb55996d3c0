//! # Navigation Drivers
//!
//! Command-line front end tying the workspace crates together.
//!
//! ## Subcommands
//!
//! -   **`evaluate`:** builds a [`kinematic::KinematicEnv`] for a dataset
//!     split, runs every episode with the selected action policy and the
//!     sparse success reward, and logs step, episode and batch results.
//! -   **`explore`:** discovers `prefix-id` scene folders with
//!     [`scene::scene_loader`], loads each scene's navigation mesh (a
//!     failure aborts the run), random-walks the agent and saves samples,
//!     a top-down map and a GIF through [`visualize`].
//!
//! ## The Crates
//!
//! -   **[`episode`]:** the episode runner, policies and environment contract.
//! -   **[`settings`]:** simulator settings and configuration builders.
//! -   **[`scene`]:** scene discovery and navigation mesh loading.
//! -   **[`visualize`]:** PNG and GIF export of observations.
//! -   **[`kinematic`]:** the reference environment the drivers run against.

pub mod cli;
pub mod evaluate;
pub mod explore;
pub mod report;

use tracing_subscriber::{fmt, EnvFilter};

pub use episode;
pub use kinematic;
pub use scene;
pub use settings;
pub use visualize;

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the default
/// `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
}
