//! Build artifact generation for a tracked directory

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::build::template::Template;
use crate::feed::types::Package;

/// Mode of a freshly created Dockerfile
#[cfg(unix)]
const DOCKERFILE_MODE: u32 = 0o644;

/// Mode the entrypoint needs to be executable inside the container
#[cfg(unix)]
const ENTRYPOINT_MODE: u32 = 0o764;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ArtifactError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Trait for regenerating the artifacts of one build directory
pub trait ArtifactWriter {
    /// Writes the artifacts for `package` into `dir`
    fn write(&self, dir: &Path, package: &Package) -> Result<(), ArtifactError>;
}

/// Writes the rendered Dockerfile and installs the entrypoint script
pub struct DockerArtifacts {
    template: Template,
    entrypoint: PathBuf,
    dockerfile_name: String,
}

impl DockerArtifacts {
    /// # Arguments
    /// * `template` - Parsed Dockerfile template
    /// * `entrypoint` - Script copied into every directory, keeping its file name
    /// * `dockerfile_name` - Name of the rendered file inside each directory
    pub fn new(template: Template, entrypoint: &Path, dockerfile_name: &str) -> Self {
        Self {
            template,
            entrypoint: entrypoint.to_path_buf(),
            dockerfile_name: dockerfile_name.to_string(),
        }
    }

    fn write_dockerfile(&self, path: &Path, package: &Package) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.create(true).write(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(DOCKERFILE_MODE);
        }

        let mut file = options.open(path)?;
        file.write_all(self.template.render(package).as_bytes())?;
        file.flush()
    }

    fn install_entrypoint(&self, target: &Path) -> io::Result<()> {
        fs::copy(&self.entrypoint, target)?;
        // An existing target keeps its old mode, so always reset it
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(target, fs::Permissions::from_mode(ENTRYPOINT_MODE))?;
        }
        Ok(())
    }
}

impl ArtifactWriter for DockerArtifacts {
    fn write(&self, dir: &Path, package: &Package) -> Result<(), ArtifactError> {
        let dockerfile = dir.join(&self.dockerfile_name);
        self.write_dockerfile(&dockerfile, package)
            .map_err(ArtifactError::io(&dockerfile))?;
        debug!("wrote {}", dockerfile.display());

        let file_name = self
            .entrypoint
            .file_name()
            .ok_or_else(|| ArtifactError::Io {
                path: self.entrypoint.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "entrypoint has no file name"),
            })?;
        let target = dir.join(file_name);
        self.install_entrypoint(&target)
            .map_err(ArtifactError::io(&target))?;
        debug!("installed {}", target.display());

        Ok(())
    }
}

/// Writer that only reports what would be regenerated
pub struct DryRunArtifacts;

impl ArtifactWriter for DryRunArtifacts {
    fn write(&self, dir: &Path, package: &Package) -> Result<(), ArtifactError> {
        info!(
            "dry run: would update {} to {} ({})",
            dir.display(),
            package.version,
            package.archive_url
        );
        Ok(())
    }
}
