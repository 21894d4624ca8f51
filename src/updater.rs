//! Update orchestration
//!
//! Lists the tracked build directories, resolves the latest package for every
//! release line, then regenerates each directory in order. The first failure
//! aborts the run; directories updated before it keep their new contents.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::build::artifacts::ArtifactWriter;
use crate::build::dirs::tracked_directories;
use crate::build::template::Template;
use crate::error::UpdateError;
use crate::feed::selector::select_latest;
use crate::feed::source::FeedSource;
use crate::feed::types::{FeedSet, Package};

/// Outcome for one regenerated build directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedDirectory {
    pub dir: String,
    pub version: String,
    pub latest: bool,
}

/// Read and parse the Dockerfile template
pub fn load_template(path: &Path) -> Result<Template, UpdateError> {
    let text = fs::read_to_string(path).map_err(|source| UpdateError::TemplateRead {
        path: path.to_path_buf(),
        source,
    })?;
    Template::parse(&text).map_err(|source| UpdateError::Template {
        path: path.to_path_buf(),
        source,
    })
}

/// Regenerate every tracked directory under `root`
pub fn update_all<S, W>(
    root: &Path,
    feeds: &FeedSet,
    source: &S,
    writer: &W,
) -> Result<Vec<UpdatedDirectory>, UpdateError>
where
    S: FeedSource + ?Sized,
    W: ArtifactWriter + ?Sized,
{
    let dirs = tracked_directories(root).map_err(|source| UpdateError::DirectoryList {
        path: root.to_path_buf(),
        source,
    })?;
    info!("tracking {} build directories", dirs.len());

    let versions = select_latest(source, feeds)?;
    info!("resolved {} release lines", versions.len());

    update_directories(root, &dirs, &versions, writer)
}

/// Regenerate `dirs` from an already resolved version mapping
///
/// Each directory name is looked up as a version key. A directory without a
/// resolved package aborts before it, or any later directory, is touched.
pub fn update_directories<W: ArtifactWriter + ?Sized>(
    root: &Path,
    dirs: &[String],
    versions: &BTreeMap<String, Package>,
    writer: &W,
) -> Result<Vec<UpdatedDirectory>, UpdateError> {
    let mut updated = Vec::with_capacity(dirs.len());

    for dir in dirs {
        let package = versions
            .get(dir)
            .ok_or_else(|| UpdateError::MissingVersion(dir.clone()))?;

        writer
            .write(&root.join(dir), package)
            .map_err(|source| UpdateError::ArtifactWrite {
                dir: dir.clone(),
                source,
            })?;
        info!("updated {} to {}", dir, package.version);

        updated.push(UpdatedDirectory {
            dir: dir.clone(),
            version: package.version.clone(),
            latest: package.is_primary,
        });
    }

    Ok(updated)
}
