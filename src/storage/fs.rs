//! Local filesystem storage backend.

use std::path::{Component, Path, PathBuf};

use crate::error::{PublishError, Result};
use crate::storage::Storage;

/// Storage backend that writes objects into a local directory.
///
/// Intermediate directories are created automatically. Keys that would escape
/// the base directory are rejected.
///
/// # Example
///
/// ```rust,no_run
/// use mockup_publisher::FsStorage;
///
/// let storage = FsStorage::new("/tmp/mockups-preview");
/// ```
pub struct FsStorage {
    base_dir: PathBuf,
}

impl FsStorage {
    /// Create a new `FsStorage` rooted at the given directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl Storage for FsStorage {
    async fn put(&self, key: &str, content: &[u8], _content_type: Option<&str>) -> Result<()> {
        let relative = Path::new(key);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(PublishError::InvalidPayload(key.to_string()));
        }
        let path = self.base_dir.join(relative);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PublishError::remote(key, e))?;
        }

        tokio::fs::write(&path, content)
            .await
            .map_err(|e| PublishError::remote(key, e))?;

        tracing::debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }
}
