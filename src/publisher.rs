//! Upload orchestration for one publishing session.

use crate::content_type;
use crate::error::{PublishError, Result};
use crate::folder::{self, InferredFolder};
use crate::identity::{IdentityMap, UploadTarget};
use crate::payload::{self, FilePayload};
use crate::settings::Settings;
use crate::storage::Storage;
use crate::url::public_url;

/// A file that could not be published.
#[derive(Debug)]
pub struct FileError {
    pub name: String,
    /// Object key the file was headed for.
    pub key: String,
    pub error: PublishError,
}

/// Outcome of [`Publisher::upload_session`].
#[derive(Debug)]
pub struct UploadResult {
    pub target: UploadTarget,
    /// Folder the auxiliary files were grouped under, if any.
    pub folder: Option<InferredFolder>,
    /// Keys written, in write order.
    pub uploaded: Vec<String>,
    /// Public URL of the HTML document, when it was written.
    pub html_url: Option<String>,
    pub errors: Vec<FileError>,
}

impl UploadResult {
    fn new(target: UploadTarget, folder: Option<InferredFolder>) -> Self {
        Self {
            target,
            folder,
            uploaded: Vec::new(),
            html_url: None,
            errors: Vec::new(),
        }
    }

    /// `true` when not a single file was written.
    pub fn nothing_uploaded(&self) -> bool {
        self.uploaded.is_empty()
    }

    /// `true` when some files were written and others failed.
    pub fn is_partial(&self) -> bool {
        !self.uploaded.is_empty() && !self.errors.is_empty()
    }

    pub fn url_for(&self, key: &str) -> String {
        public_url(&self.target.bucket, &self.target.region, key)
    }

    /// Public URLs of every uploaded key.
    pub fn urls(&self) -> impl Iterator<Item = String> + '_ {
        self.uploaded.iter().map(|key| self.url_for(key))
    }
}

/// Publishes HTML mockups and their assets for a set of identities.
///
/// Files are written one at a time. A failed write is recorded and the
/// session moves on to the next file.
pub struct Publisher<S: Storage> {
    storage: S,
    settings: Settings,
    identities: IdentityMap,
}

impl<S: Storage> Publisher<S> {
    pub(crate) fn new(storage: S, settings: Settings, identities: IdentityMap) -> Self {
        Self {
            storage,
            settings,
            identities,
        }
    }

    pub fn identities(&self) -> &IdentityMap {
        &self.identities
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Publish one HTML document and its auxiliary files.
    ///
    /// Auxiliary files go to `{prefix}/{folder}/{name}` (or `{prefix}/{name}`
    /// without a folder) in input order; the HTML is written last to
    /// `{prefix}/{name}`. Only configuration problems are returned as `Err`;
    /// per-file failures are collected in [`UploadResult::errors`].
    pub async fn upload_session(
        &self,
        identity: &str,
        html: Option<&FilePayload>,
        aux: &[FilePayload],
        folder_override: Option<&str>,
    ) -> Result<UploadResult> {
        let target = self.identities.resolve(identity, &self.settings)?;
        let folder_override = folder_override.map(str::trim).filter(|s| !s.is_empty());

        // The HTML is read up front so its stylesheet can pick the folder.
        let mut read_error = None;
        let html_bytes = match html {
            Some(file) => match file.read().await {
                Ok(bytes) => Some(bytes),
                Err(error) => {
                    read_error = Some((file, error));
                    None
                }
            },
            None => None,
        };

        let folder = folder::resolve_folder(
            folder_override,
            html.map(|file| (file, html_bytes.as_deref().unwrap_or_default())),
        );
        match &folder {
            Some(f) => tracing::info!(
                "Using folder {:?} ({:?}) under {}",
                f.name,
                f.source,
                target.prefix
            ),
            None => tracing::info!("No folder, writing files directly under {}", target.prefix),
        }

        let mut result = UploadResult::new(target, folder);
        if let Some((file, error)) = read_error {
            let key = result.target.key(None, file.name());
            record(&mut result, file, key, error);
        }
        let folder_name = result.folder.as_ref().map(|f| f.name.clone());

        for file in aux {
            let key = result.target.key(folder_name.as_deref(), file.name());
            match self.write(file, &key, None).await {
                Ok(()) => result.uploaded.push(key),
                Err(error) => record(&mut result, file, key, error),
            }
        }

        if let (Some(file), Some(bytes)) = (html, html_bytes) {
            let key = result.target.key(None, file.name());
            match self.write(file, &key, Some(bytes)).await {
                Ok(()) => {
                    result.html_url = Some(result.url_for(&key));
                    result.uploaded.push(key);
                }
                Err(error) => record(&mut result, file, key, error),
            }
        }

        tracing::info!(
            "Uploaded {} file(s), {} failed",
            result.uploaded.len(),
            result.errors.len()
        );
        Ok(result)
    }

    /// Write a single payload. `bytes` short-circuits reading the source.
    async fn write(&self, file: &FilePayload, key: &str, bytes: Option<Vec<u8>>) -> Result<()> {
        payload::validate_name(file.name())?;
        let bytes = match bytes {
            Some(bytes) => bytes,
            None => file.read().await?,
        };
        let content_type = content_type::resolve(file.name(), file.declared_content_type());
        self.storage.put(key, &bytes, content_type).await?;
        tracing::info!("Uploaded {key}");
        Ok(())
    }
}

fn record(result: &mut UploadResult, file: &FilePayload, key: String, error: PublishError) {
    tracing::error!("Failed to upload {key}: {error}");
    result.errors.push(FileError {
        name: file.name().to_string(),
        key,
        error,
    });
}
