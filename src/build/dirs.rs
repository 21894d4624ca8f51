//! Tracked build directory discovery

use std::fs;
use std::io;
use std::path::Path;

/// Prefix of entries that are never tracked
const HIDDEN_PREFIX: char = '.';

/// List the build directories under `root`, sorted by name.
///
/// Every immediate, non-hidden subdirectory is a tracked release line and is
/// expected to be named after a version key (e.g. `4.3`). A directory whose
/// name is not valid UTF-8 fails the listing instead of being skipped.
pub fn tracked_directories(root: &Path) -> io::Result<Vec<String>> {
    let mut dirs = Vec::new();

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let name = entry.file_name().into_string().map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("directory name is not valid UTF-8: {}", entry.path().display()),
            )
        })?;

        if name.starts_with(HIDDEN_PREFIX) {
            continue;
        }
        dirs.push(name);
    }

    dirs.sort();
    Ok(dirs)
}
