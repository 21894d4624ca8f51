use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to fetch feed {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("feed {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid feed content from {url}: {reason}")]
    Format { url: String, reason: String },
}

impl FeedError {
    pub fn format(url: &str, reason: impl Into<String>) -> Self {
        Self::Format {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    /// URL of the feed that failed
    pub fn url(&self) -> &str {
        match self {
            Self::Fetch { url, .. } | Self::Status { url, .. } | Self::Format { url, .. } => url,
        }
    }

    /// True for transport-level failures, false for malformed content
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Status { .. })
    }
}
