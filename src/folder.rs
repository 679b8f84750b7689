//! Project-folder inference from an HTML document's stylesheet link.
//!
//! A mockup exported as `index.html` next to a `Register/` directory links its
//! stylesheet as `Register/style.css`. That directory is the folder the
//! auxiliary assets are grouped under, so the HTML keeps resolving them once
//! published.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::PublishError;
use crate::payload::FilePayload;

/// `rel="stylesheet"` before `href`.
const REL_THEN_HREF: &str =
    r#"(?i)<link[^>]+rel\s*=\s*["']stylesheet["'][^>]+href\s*=\s*["']([^"']+)["']"#;

/// `href` before `rel="stylesheet"`.
const HREF_THEN_REL: &str =
    r#"(?i)<link[^>]+href\s*=\s*["']([^"']+)["'][^>]+rel\s*=\s*["']stylesheet["']"#;

static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [REL_THEN_HREF, HREF_THEN_REL]
        .into_iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!("Could not compile stylesheet pattern: {e}");
                None
            }
        })
        .collect()
});

/// How the effective folder was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FolderSource {
    /// Supplied by the operator.
    Override,
    /// Taken from the HTML's stylesheet link.
    Stylesheet,
    /// The HTML file name without its extension.
    FileName,
}

/// Folder under which auxiliary payloads are grouped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InferredFolder {
    pub name: String,
    pub source: FolderSource,
}

/// Infer the project folder from the first stylesheet link in `html`.
///
/// The `rel`-first pattern is tried over the whole document before the
/// `href`-first one, so a later `rel`-first link wins over an earlier
/// `href`-first link. Returns `None` when no link matches or the href has no
/// usable directory component.
///
/// ```
/// use mockup_publisher::infer_folder;
///
/// assert_eq!(
///     infer_folder(r#"<link rel="stylesheet" href="Register/style.css">"#),
///     Some("Register".to_string())
/// );
/// assert_eq!(infer_folder(r#"<link rel="stylesheet" href="style.css">"#), None);
/// ```
pub fn infer_folder(html: &str) -> Option<String> {
    let href = PATTERNS
        .iter()
        .find_map(|re| re.captures(html))
        .and_then(|caps| caps.get(1))?
        .as_str();

    let dir = dirname(href);
    if dir.is_empty() || dir == "." {
        return None;
    }
    let folder = normalize(dir);
    if folder.is_empty() || folder == "." {
        return None;
    }
    Some(folder.to_string())
}

/// Directory part of a `/`-separated path. Trailing separators on the result
/// are dropped unless it consists only of separators.
fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        None => "",
        Some(i) => {
            let head = &path[..=i];
            match head.trim_end_matches('/') {
                "" => head,
                trimmed => trimmed,
            }
        }
    }
}

fn normalize(dir: &str) -> &str {
    let dir = dir.trim_matches('/');
    let dir = dir.strip_prefix("./").unwrap_or(dir);
    dir.strip_prefix(".\\").unwrap_or(dir)
}

/// Pick the effective folder for a session.
///
/// Precedence: a non-blank `folder_override`, then the folder inferred from
/// the HTML, then the HTML file's stem. Without HTML only the override can
/// apply. An HTML payload that is not UTF-8 skips inference with a warning.
pub fn resolve_folder(
    folder_override: Option<&str>,
    html: Option<(&FilePayload, &[u8])>,
) -> Option<InferredFolder> {
    if let Some(name) = folder_override.map(str::trim).filter(|s| !s.is_empty()) {
        return Some(InferredFolder {
            name: name.to_string(),
            source: FolderSource::Override,
        });
    }

    let (payload, bytes) = html?;
    let inferred = match std::str::from_utf8(bytes) {
        Ok(text) => infer_folder(text),
        Err(source) => {
            let err = PublishError::Decode {
                name: payload.name().to_string(),
                source,
            };
            tracing::warn!("Could not parse folder from HTML: {err}");
            None
        }
    };

    Some(match inferred {
        Some(name) => InferredFolder {
            name,
            source: FolderSource::Stylesheet,
        },
        None => InferredFolder {
            name: payload.stem().to_string(),
            source: FolderSource::FileName,
        },
    })
}
