#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Scene Discovery
//!
//! Locates scene assets on disk by naming convention and loads navigation
//! meshes. A scene dataset directory looks like:
//!
//! ```text
//! data/train/
//!   00001-UVdNNRcVyV1/
//!     UVdNNRcVyV1.glb
//!     UVdNNRcVyV1.basis.glb
//!     UVdNNRcVyV1.basis.navmesh
//! ```
//!
//! [`scene_loader`] only derives paths; it never checks that the files are
//! there. [`NavMesh::load`] is where a missing or unreadable asset surfaces,
//! as a fail-fast [`SceneError::AssetLoadFailure`].

pub mod navmesh;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub use navmesh::NavMesh;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("failed to list {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load asset {}: {reason}", path.display())]
    AssetLoadFailure { path: PathBuf, reason: String },
}

/// Asset paths of one scene folder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneAssets {
    /// Folder name, e.g. `00001-UVdNNRcVyV1`.
    pub folder: String,
    /// Scene id taken from the folder name, e.g. `UVdNNRcVyV1`.
    pub id: String,
    pub glb: PathBuf,
    pub basis_glb: PathBuf,
    pub navmesh: PathBuf,
}

impl SceneAssets {
    /// Derive the asset paths for `folder` under `root`.
    ///
    /// Returns `None` when the folder name has no `-id` segment.
    #[must_use]
    pub fn from_folder(root: &Path, folder: &str) -> Option<Self> {
        let id = folder.split('-').nth(1).filter(|id| !id.is_empty())?;
        let dir = root.join(folder);
        Some(Self {
            folder: folder.to_string(),
            id: id.to_string(),
            glb: dir.join(format!("{id}.glb")),
            basis_glb: dir.join(format!("{id}.basis.glb")),
            navmesh: dir.join(format!("{id}.basis.navmesh")),
        })
    }
}

/// One [`SceneAssets`] per `prefix-id` folder directly under `root`, sorted
/// by folder name.
///
/// # Errors
///
/// [`SceneError::Io`] when `root` cannot be listed.
pub fn scene_loader(root: impl AsRef<Path>) -> Result<Vec<SceneAssets>, SceneError> {
    let root = root.as_ref();
    let io_err = |source: std::io::Error| SceneError::Io { path: root.to_path_buf(), source };

    let mut folders = Vec::new();
    for entry in fs::read_dir(root).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if entry.file_type().map_err(io_err)?.is_dir() {
            folders.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    folders.sort();

    let mut scenes = Vec::with_capacity(folders.len());
    for folder in folders {
        match SceneAssets::from_folder(root, &folder) {
            Some(assets) => {
                debug!("Discovered scene {} in {}", assets.id, folder);
                scenes.push(assets);
            }
            None => warn!("Skipping folder without a scene id: {folder}"),
        }
    }
    Ok(scenes)
}
