//! Storage backends that published files are written to.
//!
//! The crate ships with two built-in backends:
//!
//! - [`S3Storage`] -- writes to the configured Amazon S3 bucket
//!   (requires the `s3` feature).
//! - [`FsStorage`] -- mirrors the same key layout in a local directory, for
//!   previewing a publish without credentials.
//!
//! Implement the [`Storage`] trait to add your own backend.

mod fs;
#[cfg(feature = "s3")]
mod s3;

#[cfg(feature = "s3")]
pub use aws_sdk_s3::Client as S3Client;
pub use fs::FsStorage;
#[cfg(feature = "s3")]
pub use s3::S3Storage;

use crate::error::Result;

use std::future::Future;

/// Trait for backends that persist a single object.
///
/// # Implementing a custom backend
///
/// ```rust,no_run
/// use mockup_publisher::{Storage, Result};
///
/// struct MyStorage;
///
/// impl Storage for MyStorage {
///     async fn put(&self, key: &str, content: &[u8], content_type: Option<&str>) -> Result<()> {
///         // write content somewhere ...
///         Ok(())
///     }
/// }
/// ```
pub trait Storage: Send + Sync {
    /// Persist `content` under `key`.
    ///
    /// `content_type` is `None` when the caller leaves detection to the
    /// backend.
    fn put(
        &self,
        key: &str,
        content: &[u8],
        content_type: Option<&str>,
    ) -> impl Future<Output = Result<()>> + Send;
}
