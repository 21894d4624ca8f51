//! Feed source trait and its HTTP implementation

#[cfg(test)]
use mockall::automock;

use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::feed::error::FeedError;
use crate::feed::parser::parse_feed;
use crate::feed::types::Package;

/// User agent sent with feed requests
const USER_AGENT: &str = "crowd-image-updater";

/// Trait for fetching raw feed documents
#[cfg_attr(test, automock)]
pub trait FeedSource {
    /// Fetches the raw body of the feed at `url`
    ///
    /// # Returns
    /// * `Ok(String)` - The undecoded feed document
    /// * `Err(FeedError)` - If the request fails or the status is not a success
    fn fetch(&self, url: &str) -> Result<String, FeedError>;
}

/// Fetch and decode every package record of a feed
pub fn fetch_packages<S: FeedSource + ?Sized>(
    source: &S,
    url: &str,
) -> Result<Vec<Package>, FeedError> {
    let body = source.fetch(url)?;
    let packages = parse_feed(url, &body)?;
    debug!("feed {} lists {} packages", url, packages.len());
    Ok(packages)
}

/// Feed source performing one blocking HTTP GET per fetch, without retries
pub struct HttpFeedSource {
    client: Client,
}

impl HttpFeedSource {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }
}

impl FeedSource for HttpFeedSource {
    fn fetch(&self, url: &str) -> Result<String, FeedError> {
        let fetch_error = |source| FeedError::Fetch {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().map_err(fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!("feed returned status {}: {}", status, url);
            return Err(FeedError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().map_err(fetch_error)
    }
}
