use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::feed::types::FeedSet;

// =============================================================================
// Feed defaults
// =============================================================================

/// Primary feed listing the currently supported releases
pub const CURRENT_FEED_URL: &str = "https://my.atlassian.com/download/feeds/current/crowd.json";

/// Feed listing archived releases
pub const ARCHIVED_FEED_URL: &str = "https://my.atlassian.com/download/feeds/archived/crowd.json";

/// Feed listing early access releases
pub const EAP_FEED_URL: &str = "https://my.atlassian.com/download/feeds/eap/crowd.json";

// =============================================================================
// File defaults, relative to the root directory
// =============================================================================

pub const TEMPLATE_FILE: &str = "Dockerfile.tmpl";

pub const ENTRYPOINT_FILE: &str = "docker-entrypoint.sh";

/// Name of the rendered file inside each build directory
pub const DOCKERFILE_NAME: &str = "Dockerfile";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Updater configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdaterConfig {
    pub feeds: FeedsConfig,
    pub files: FilesConfig,
}

/// Release feed locations
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedsConfig {
    /// Primary feed, its packages are flagged as latest
    pub current: String,
    /// Feeds consulted before the primary one, in order
    pub secondary: Vec<String>,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            current: CURRENT_FEED_URL.to_string(),
            secondary: vec![ARCHIVED_FEED_URL.to_string(), EAP_FEED_URL.to_string()],
        }
    }
}

impl FeedsConfig {
    pub fn feed_set(&self) -> FeedSet {
        let secondary: Vec<&str> = self.secondary.iter().map(String::as_str).collect();
        FeedSet::new(&self.current, &secondary)
    }
}

/// Template and generated file names
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilesConfig {
    pub template: PathBuf,
    pub entrypoint: PathBuf,
    pub dockerfile: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            template: PathBuf::from(TEMPLATE_FILE),
            entrypoint: PathBuf::from(ENTRYPOINT_FILE),
            dockerfile: DOCKERFILE_NAME.to_string(),
        }
    }
}

impl UpdaterConfig {
    /// Load a JSON config file, missing fields use the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
