//! Operator identities and the storage prefixes they map to.

use crate::error::{PublishError, Result};
use crate::settings::Settings;

/// Environment variable that replaces the built-in identity table.
///
/// Format: `Label=prefix,Other Label=other_prefix`.
pub const IDENTITIES_VAR: &str = "PUBLISHER_IDENTITIES";

const DEFAULT_IDENTITIES: &[(&str, &str)] = &[
    ("Janelle", "Janelle_folder"),
    ("Lex", "Lex_folder"),
    ("Yurii", "Yurii_folder"),
];

/// Where a session writes: bucket, region and the identity's path prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadTarget {
    pub bucket: String,
    pub region: String,
    pub prefix: String,
}

impl UploadTarget {
    /// Join the prefix with an optional folder and a file name.
    pub fn key(&self, folder: Option<&str>, name: &str) -> String {
        match folder {
            Some(folder) => format!("{}/{}/{}", self.prefix, folder, name),
            None => format!("{}/{}", self.prefix, name),
        }
    }
}

/// Ordered table of identity label to path prefix.
#[derive(Clone, Debug)]
pub struct IdentityMap {
    entries: Vec<(String, String)>,
}

impl IdentityMap {
    /// Build a table from `(label, prefix)` pairs.
    ///
    /// Fails if a label is blank or repeated, or a prefix is not
    /// filesystem-safe.
    pub fn new<L, P>(entries: impl IntoIterator<Item = (L, P)>) -> Result<Self>
    where
        L: Into<String>,
        P: Into<String>,
    {
        let mut map = Self {
            entries: Vec::new(),
        };
        for (label, prefix) in entries {
            let label: String = label.into();
            let prefix: String = prefix.into();
            let (label, prefix) = (label.trim().to_string(), prefix.trim().to_string());
            if label.is_empty() {
                return Err(PublishError::Configuration(
                    "identity label must not be empty".into(),
                ));
            }
            if map.prefix_for(&label).is_some() {
                return Err(PublishError::Configuration(format!(
                    "identity {label:?} is listed twice"
                )));
            }
            if !is_safe_prefix(&prefix) {
                return Err(PublishError::Configuration(format!(
                    "identity {label:?} has an unusable path prefix {prefix:?}"
                )));
            }
            map.entries.push((label, prefix));
        }
        if map.entries.is_empty() {
            return Err(PublishError::Configuration(
                "no identities configured".into(),
            ));
        }
        Ok(map)
    }

    /// Parse the `Label=prefix,...` form used by [`IDENTITIES_VAR`].
    pub fn parse(table: &str) -> Result<Self> {
        let pairs = table
            .split(',')
            .filter(|entry| !entry.trim().is_empty())
            .map(|entry| {
                entry.split_once('=').ok_or_else(|| {
                    PublishError::Configuration(format!(
                        "identity entry {entry:?} is not of the form Label=prefix"
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(pairs)
    }

    /// The table from [`IDENTITIES_VAR`] if set, otherwise the built-in one.
    pub fn from_env() -> Result<Self> {
        match std::env::var(IDENTITIES_VAR) {
            Ok(table) if !table.trim().is_empty() => Self::parse(&table),
            _ => Ok(Self::default()),
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn prefix_for(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, prefix)| prefix.as_str())
    }

    /// Resolve an identity label into the session's [`UploadTarget`].
    pub fn resolve(&self, label: &str, settings: &Settings) -> Result<UploadTarget> {
        let prefix = self.prefix_for(label).ok_or_else(|| {
            PublishError::Configuration(format!("unknown identity {label:?}"))
        })?;
        Ok(UploadTarget {
            bucket: settings.bucket.clone(),
            region: settings.region.clone(),
            prefix: prefix.to_string(),
        })
    }
}

impl Default for IdentityMap {
    fn default() -> Self {
        Self {
            entries: DEFAULT_IDENTITIES
                .iter()
                .map(|(label, prefix)| (label.to_string(), prefix.to_string()))
                .collect(),
        }
    }
}

fn is_safe_prefix(prefix: &str) -> bool {
    !prefix.is_empty()
        && prefix != "."
        && prefix != ".."
        && prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
