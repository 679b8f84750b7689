//! Error types for the `mockup_publisher` crate.

use std::path::PathBuf;

/// All errors that can occur while publishing a mockup.
///
/// Only [`PublishError::Configuration`] stops a session. Every other variant is
/// raised for a single file and recorded next to whatever did succeed.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Missing bucket, unknown identity or an unusable identity table.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The HTML payload is not valid UTF-8.
    #[error("Could not decode {name} as UTF-8: {source}")]
    Decode {
        name: String,
        #[source]
        source: std::str::Utf8Error,
    },

    /// No access key / secret pair is available for the storage client.
    #[error("AWS credentials not found. Set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY.")]
    Credential,

    /// The storage endpoint rejected the credentials.
    #[error("Access denied for {key}: {message}")]
    Auth { key: String, message: String },

    /// A local source file could not be found.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Generic storage-side failure.
    #[error("Failed to upload {key}: {source}")]
    Remote {
        key: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A payload name is not a single safe path segment.
    #[error("Invalid file name {0:?}")]
    InvalidPayload(String),
}

impl PublishError {
    /// Returns `true` if the error aborts the whole session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PublishError::Configuration(_))
    }

    pub(crate) fn remote(
        key: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        PublishError::Remote {
            key: key.into(),
            source: source.into(),
        }
    }
}

/// A type alias for `Result<T, PublishError>`.
pub type Result<T> = std::result::Result<T, PublishError>;
