//! Content-type selection by file extension.

use std::path::Path;

/// Extensions with an explicit content type. Anything else, images included,
/// is left undeclared so the storage layer can detect it.
const TABLE: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
];

/// Look up the content type for `name` by its extension.
pub fn for_name(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?;
    TABLE
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, content_type)| *content_type)
}

/// Content type to declare for a write: the extension table first, then the
/// payload's own declaration.
pub fn resolve<'a>(name: &str, declared: Option<&'a str>) -> Option<&'a str> {
    let known: Option<&'a str> = for_name(name);
    known.or(declared)
}
