//! Filesystem-backed image storage.
//!
//! Binary assets live under `<root>/wells/<well_id>/<file_name>` and
//! resolve to `<base_url>/wells/<well_id>/<file_name>`. This mirrors
//! the hosted object store's key layout so the two are swappable.

use std::path::PathBuf;

use aquamon_core::error::{AquamonError, AquamonResult};
use aquamon_core::repository::ImageStore;
use uuid::Uuid;

/// Stores well images on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
    base_url: String,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }
}

impl ImageStore for FsImageStore {
    async fn store(&self, well_id: Uuid, file_name: &str, bytes: &[u8]) -> AquamonResult<String> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.contains("..") {
            return Err(AquamonError::Validation {
                message: format!("invalid image file name: {file_name}"),
            });
        }

        let dir = self.root.join("wells").join(well_id.to_string());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AquamonError::Storage(e.to_string()))?;

        let path = dir.join(file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AquamonError::Storage(e.to_string()))?;

        Ok(format!(
            "{}/wells/{}/{}",
            self.base_url.trim_end_matches('/'),
            well_id,
            file_name
        ))
    }
}
