//! Named byte payloads submitted for upload.

use std::path::{Path, PathBuf};

use crate::error::{PublishError, Result};

/// Where a payload's bytes come from.
#[derive(Clone, Debug)]
pub enum PayloadSource {
    /// Bytes already held in memory.
    Bytes(Vec<u8>),
    /// A local file, read when the payload is written.
    Path(PathBuf),
}

/// A single file to publish.
///
/// The `name` becomes the last segment of the object key and must not contain
/// path separators or traversal sequences.
///
/// # Example
///
/// ```
/// use mockup_publisher::FilePayload;
///
/// let css = FilePayload::from_bytes("style.css", "body { margin: 0 }");
/// assert_eq!(css.name(), "style.css");
/// assert_eq!(css.stem(), "style");
/// ```
#[derive(Clone, Debug)]
pub struct FilePayload {
    name: String,
    source: PayloadSource,
    content_type: Option<String>,
}

impl FilePayload {
    pub fn from_bytes(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            source: PayloadSource::Bytes(content.into()),
            content_type: None,
        }
    }

    /// A payload backed by a local file, named after the path's final
    /// component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            source: PayloadSource::Path(path),
            content_type: None,
        }
    }

    /// Declare a content type, used when the extension table has no entry.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &PayloadSource {
        &self.source
    }

    pub fn declared_content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The name without its final extension (`index.html` -> `index`).
    pub fn stem(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
    }

    /// Load the payload's bytes.
    ///
    /// A missing local file maps to [`PublishError::NotFound`].
    pub async fn read(&self) -> Result<Vec<u8>> {
        match &self.source {
            PayloadSource::Bytes(bytes) => Ok(bytes.clone()),
            PayloadSource::Path(path) => tokio::fs::read(path).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PublishError::NotFound(path.clone())
                } else {
                    PublishError::remote(path.display().to_string(), e)
                }
            }),
        }
    }
}

/// Check that `name` is a single, non-traversing path segment.
pub fn validate_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(PublishError::InvalidPayload(name.to_string()));
    }
    Ok(())
}
