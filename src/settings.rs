//! Environment-sourced settings, read once at startup.

use crate::error::{PublishError, Result};

/// Region used when `AWS_REGION` is not set.
pub const DEFAULT_REGION: &str = "us-east-1";

pub const BUCKET_VAR: &str = "S3_BUCKET_NAME";
pub const REGION_VAR: &str = "AWS_REGION";
pub const ACCESS_KEY_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";

/// Static access key / secret pair.
#[derive(Clone)]
pub struct AccessKeys {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for AccessKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessKeys")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Bucket, region and credentials for a session.
#[derive(Clone, Debug)]
pub struct Settings {
    pub bucket: String,
    pub region: String,
    pub credentials: Option<AccessKeys>,
}

impl Settings {
    /// Build settings from raw values, applying defaults and validation.
    ///
    /// A blank bucket is a [`PublishError::Configuration`]. Missing credentials
    /// only produce a warning; the first write to S3 will fail instead.
    pub fn new(
        bucket: Option<String>,
        region: Option<String>,
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
    ) -> Result<Self> {
        let bucket = non_blank(bucket).ok_or_else(|| {
            PublishError::Configuration(format!("{BUCKET_VAR} environment variable is not set"))
        })?;
        let region = non_blank(region).unwrap_or_else(|| DEFAULT_REGION.to_string());

        let credentials = match (non_blank(access_key_id), non_blank(secret_access_key)) {
            (Some(access_key_id), Some(secret_access_key)) => Some(AccessKeys {
                access_key_id,
                secret_access_key,
            }),
            _ => {
                tracing::warn!(
                    "AWS credentials not detected. Make sure {ACCESS_KEY_VAR} and {SECRET_KEY_VAR} are set."
                );
                None
            }
        };

        Ok(Self {
            bucket,
            region,
            credentials,
        })
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::new(
            std::env::var(BUCKET_VAR).ok(),
            std::env::var(REGION_VAR).ok(),
            std::env::var(ACCESS_KEY_VAR).ok(),
            std::env::var(SECRET_KEY_VAR).ok(),
        )
    }

    pub fn is_default_region(&self) -> bool {
        self.region == DEFAULT_REGION
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
