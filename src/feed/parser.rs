//! JSONP feed document parsing

use crate::feed::error::FeedError;
use crate::feed::types::Package;

/// Returns the payload strictly between the first `(` and the last `)`.
///
/// Returns None if either bracket is missing or the closing bracket does not
/// come after the opening one.
pub fn strip_jsonp(body: &str) -> Option<&str> {
    let start = body.find('(')?;
    let end = body.rfind(')')?;
    if end <= start {
        return None;
    }
    Some(&body[start + 1..end])
}

/// Decode a feed document into its package records
///
/// # Arguments
/// * `url` - The feed URL, used for error reporting
/// * `body` - The raw response body, e.g. `downloads([...])`
pub fn parse_feed(url: &str, body: &str) -> Result<Vec<Package>, FeedError> {
    let payload =
        strip_jsonp(body).ok_or_else(|| FeedError::format(url, "error in jsonp content"))?;

    serde_json::from_str(payload).map_err(|e| FeedError::format(url, e.to_string()))
}
