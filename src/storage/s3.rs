//! Amazon S3 storage backend (requires the `s3` feature).

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_credential_types::provider::ProvideCredentials;
use aws_credential_types::provider::error::CredentialsError;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::put_object::PutObjectError;

use crate::error::{PublishError, Result};
use crate::settings::Settings;
use crate::storage::Storage;

/// Error codes S3 returns for rejected or unusable credentials.
const AUTH_ERROR_CODES: &[&str] = &[
    "AccessDenied",
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "ExpiredToken",
    "InvalidToken",
];

/// Storage backend that uploads objects to an Amazon S3 bucket.
///
/// Objects are streamed from memory, so nothing is staged on disk. When no
/// content type is given, one is guessed from the key's extension.
///
/// # Example
///
/// ```rust,ignore
/// use mockup_publisher::{S3Storage, Settings};
///
/// let settings = Settings::from_env()?;
/// let storage = S3Storage::from_settings(&settings).await;
/// ```
pub struct S3Storage {
    client: Client,
    bucket: String,
    /// `false` once the provider chain resolved no credentials; writes then fail
    /// without a request.
    credentials_resolved: bool,
}

impl S3Storage {
    /// Create a new `S3Storage` with an existing [`Client`] and bucket name.
    ///
    /// Credentials are resolved by the SDK at send time; a resolution failure
    /// is reported as [`PublishError::Credential`].
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            credentials_resolved: true,
        }
    }

    /// Create an `S3Storage` from an [`aws_sdk_s3::Config`].
    pub fn from_conf(config: aws_sdk_s3::Config, bucket: impl Into<String>) -> Self {
        Self::new(Client::from_conf(config), bucket)
    }

    /// Build the client for a session.
    ///
    /// Static keys from `settings` take priority; otherwise the default AWS
    /// provider chain is consulted. If no credentials can be resolved, every
    /// write fails with [`PublishError::Credential`].
    pub async fn from_settings(settings: &Settings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()));
        if let Some(keys) = &settings.credentials {
            loader = loader.credentials_provider(Credentials::new(
                &keys.access_key_id,
                &keys.secret_access_key,
                None,
                None,
                "mockup-publisher",
            ));
        }
        let config = loader.load().await;

        let credentials_resolved = match config.credentials_provider() {
            Some(provider) => match provider.provide_credentials().await {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!("No usable AWS credentials: {e}");
                    false
                }
            },
            None => false,
        };

        Self {
            client: Client::new(&config),
            bucket: settings.bucket.clone(),
            credentials_resolved,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl Storage for S3Storage {
    async fn put(&self, key: &str, content: &[u8], content_type: Option<&str>) -> Result<()> {
        if !self.credentials_resolved {
            return Err(PublishError::Credential);
        }

        let content_type = content_type
            .map(str::to_string)
            .or_else(|| mime_guess::from_path(key).first().map(|m| m.to_string()));

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(content.to_vec().into())
            .set_content_type(content_type)
            .send()
            .await
            .map_err(|e| classify(e, key))?;

        tracing::debug!(
            "Uploaded {} bytes to s3://{}/{}",
            content.len(),
            self.bucket,
            key
        );
        Ok(())
    }
}

fn classify(err: SdkError<PutObjectError>, key: &str) -> PublishError {
    if let Some(service_err) = err.as_service_error() {
        if let Some(code) = service_err.code() {
            if AUTH_ERROR_CODES.contains(&code) {
                return PublishError::Auth {
                    key: key.to_string(),
                    message: service_err.message().unwrap_or(code).to_string(),
                };
            }
        }
    }
    match &err {
        SdkError::ServiceError(context) if context.raw().status().as_u16() == 403 => {
            return PublishError::Auth {
                key: key.to_string(),
                message: "403 Forbidden".into(),
            };
        }
        SdkError::ConstructionFailure(_) | SdkError::DispatchFailure(_)
            if caused_by_credentials(&err) =>
        {
            return PublishError::Credential;
        }
        _ => {}
    }
    PublishError::remote(key, err)
}

/// Walks the source chain looking for a credentials-provider failure.
fn caused_by_credentials(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.downcast_ref::<CredentialsError>().is_some() {
            return true;
        }
        current = e.source();
    }
    false
}
