use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::SceneError;

/// A loaded navigation mesh.
///
/// The mesh contents are opaque here; only the simulator interprets them.
/// Loading guarantees the file exists, is readable and is non-empty.
#[derive(Clone, Debug)]
pub struct NavMesh {
    path: PathBuf,
    data: Vec<u8>,
}

impl NavMesh {
    /// # Errors
    ///
    /// [`SceneError::AssetLoadFailure`] when the file cannot be read or is
    /// empty.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| SceneError::AssetLoadFailure {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        if data.is_empty() {
            return Err(SceneError::AssetLoadFailure {
                path: path.to_path_buf(),
                reason: "navigation mesh is empty".to_string(),
            });
        }
        info!("Loaded navmesh {} ({} bytes)", path.display(), data.len());
        Ok(Self { path: path.to_path_buf(), data })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}
