//! Version key normalization
//!
//! A version key is the `major.minor` identity of a release line. Build
//! directories are named after version keys and several releases (4.3.0,
//! 4.3.1, 4.3.1-standalone, ...) collapse onto the same key.

/// Key returned for version strings with fewer than two components
pub const FALLBACK_VERSION_KEY: &str = "0.0";

/// Derive the `major.minor` key from a raw version string.
///
/// Every `.` or `-` is a separator. Total over all input.
///
/// Examples:
/// - "4.3.1" -> "4.3"
/// - "4.3.1-standalone" -> "4.3"
/// - "5" -> "0.0"
pub fn major_minor(version: &str) -> String {
    let mut parts = version.splitn(3, ['.', '-']);
    match (parts.next(), parts.next()) {
        (Some(major), Some(minor)) => format!("{major}.{minor}"),
        _ => FALLBACK_VERSION_KEY.to_string(),
    }
}
