//! # mockup_publisher
//!
//! Publishes an HTML mockup and its assets to an S3 bucket under a per-user
//! prefix and hands back a shareable public URL.
//!
//! ## Overview
//!
//! An operator picks an identity from an [`IdentityMap`], which fixes the path
//! prefix. The HTML document is written to `{prefix}/{name}`. Its supporting
//! files (stylesheets, scripts, images) are grouped under a folder chosen by
//! [`resolve_folder`]: an explicit override, else the directory of the HTML's
//! stylesheet link ([`infer_folder`]), else the HTML file's stem.
//!
//! Files are written sequentially through a [`Storage`] backend. A failed
//! write is recorded in the [`UploadResult`] and does not stop the others.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use mockup_publisher::{FilePayload, FsStorage, PublisherBuilder, Settings};
//!
//! # async fn example() -> mockup_publisher::Result<()> {
//! let settings = Settings::from_env()?;
//! let publisher = PublisherBuilder::new(FsStorage::new("/tmp/preview"), settings).build();
//!
//! let html = FilePayload::from_path("mockups/index.html");
//! let assets = vec![FilePayload::from_path("mockups/Register/style.css")];
//!
//! let result = publisher.upload_session("Lex", Some(&html), &assets, None).await?;
//! if let Some(url) = &result.html_url {
//!     println!("{url}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `s3` | **yes** | Enables [`S3Storage`] on top of `aws-sdk-s3` / `aws-config`. |
//! | `rustls-tls` | no | Use `rustls` instead of the platform TLS for the AWS SDK. |

pub mod config;
pub mod content_type;
pub mod error;
pub mod folder;
pub mod identity;
pub mod payload;
pub mod publisher;
pub mod settings;
pub mod storage;
pub mod url;

pub use config::PublisherBuilder;
pub use error::{PublishError, Result};
pub use folder::{FolderSource, InferredFolder, infer_folder, resolve_folder};
pub use identity::{IdentityMap, UploadTarget};
pub use payload::{FilePayload, PayloadSource};
pub use publisher::{FileError, Publisher, UploadResult};
pub use settings::{AccessKeys, DEFAULT_REGION, Settings};
pub use storage::{FsStorage, Storage};
#[cfg(feature = "s3")]
pub use storage::{S3Client, S3Storage};
pub use url::{encode_key, public_url};
