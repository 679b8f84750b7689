//! Public URL construction for uploaded objects.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::settings::DEFAULT_REGION;

/// Everything except ASCII alphanumerics, `/` and the unreserved marks.
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode an object key, keeping `/` separators literal.
pub fn encode_key(key: &str) -> String {
    utf8_percent_encode(key, KEY_ENCODE_SET).to_string()
}

/// Virtual-hosted-style URL of `key` in `bucket`.
///
/// ```
/// use mockup_publisher::public_url;
///
/// assert_eq!(
///     public_url("mockups", "us-east-1", "Lex_folder/My Page.html"),
///     "https://mockups.s3.amazonaws.com/Lex_folder/My%20Page.html"
/// );
/// assert_eq!(
///     public_url("mockups", "eu-west-1", "Lex_folder/index.html"),
///     "https://mockups.s3.eu-west-1.amazonaws.com/Lex_folder/index.html"
/// );
/// ```
pub fn public_url(bucket: &str, region: &str, key: &str) -> String {
    let encoded = encode_key(key);
    if region == DEFAULT_REGION {
        format!("https://{bucket}.s3.amazonaws.com/{encoded}")
    } else {
        format!("https://{bucket}.s3.{region}.amazonaws.com/{encoded}")
    }
}
