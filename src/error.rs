use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::build::artifacts::ArtifactError;
use crate::build::template::TemplateError;
use crate::feed::error::FeedError;

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("can't find a package for version {0}")]
    MissingVersion(String),

    #[error("failed to list build directories in {}: {source}", path.display())]
    DirectoryList {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to update {dir}: {source}")]
    ArtifactWrite {
        dir: String,
        #[source]
        source: ArtifactError,
    },

    #[error("failed to read template {}: {source}", path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid template {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },
}
