//! Package variant filtering
//!
//! Feeds list every distribution of a release (zip, msi, war, cluster and
//! enterprise editions, ...). Only the plain or standalone tarballs can be
//! installed by the container build.

use crate::feed::types::Package;

/// Returns true if the package's archive is an installable tarball
pub fn is_installable_archive(package: &Package) -> bool {
    let file_name = package.file_name();

    let is_tarball = file_name.contains(".tar.gz");
    let is_allowed_edition = !file_name.contains("enterprise") || file_name.contains("standalone");
    let is_cluster = file_name.contains("cluster");
    let is_war = file_name.contains("war");

    is_tarball && is_allowed_edition && !is_cluster && !is_war
}
