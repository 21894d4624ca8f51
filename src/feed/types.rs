//! Common types for release feeds

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Deserializer};

/// Date format used by the `released` field of feed records (e.g. `02-Jun-2021`)
pub const RELEASE_DATE_FORMAT: &str = "%d-%b-%Y";

/// chrono accepts one-digit days and short years, the feed format does not
static RELEASE_DATE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}-[A-Za-z]{3}-[0-9]{4}$").expect("release date pattern is valid")
});

/// A candidate release published by a feed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Package {
    /// Location of the distributable archive
    #[serde(rename = "zipUrl", deserialize_with = "string_or_null")]
    pub archive_url: String,
    /// Raw version text as published (e.g. "4.3.1", "4.3.1-standalone")
    pub version: String,
    #[serde(deserialize_with = "release_date")]
    pub released: NaiveDate,
    /// Set only for packages coming from the primary feed
    #[serde(skip)]
    pub is_primary: bool,
}

impl Package {
    pub fn new(archive_url: &str, version: &str, released: NaiveDate) -> Self {
        Self {
            archive_url: archive_url.to_string(),
            version: version.to_string(),
            released,
            is_primary: false,
        }
    }

    /// Last path segment of the archive URL
    pub fn file_name(&self) -> &str {
        self.archive_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }
}

/// Parses a release date in the feed's fixed `dd-Mon-yyyy` format
///
/// Returns None unless the text is a two-digit day, a three-letter month and
/// a four-digit year naming a valid calendar date.
pub fn parse_release_date(text: &str) -> Option<NaiveDate> {
    if !RELEASE_DATE_SHAPE.is_match(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, RELEASE_DATE_FORMAT).ok()
}

fn release_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_release_date(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid release date {text:?}")))
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Role of a feed when selecting the latest releases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedRole {
    /// The "current" feed; its packages are flagged as latest
    Primary,
    /// Archived or early-access feeds
    Secondary,
}

/// Ordered set of feeds consulted for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSet {
    primary: String,
    secondary: Vec<String>,
}

impl FeedSet {
    pub fn new(primary: &str, secondary: &[&str]) -> Self {
        Self {
            primary: primary.to_string(),
            secondary: secondary.iter().map(|url| url.to_string()).collect(),
        }
    }

    /// Iterates every feed with its role. Secondary feeds come first in
    /// declaration order, the primary feed always comes last.
    pub fn ordered(&self) -> impl Iterator<Item = (&str, FeedRole)> {
        self.secondary
            .iter()
            .map(|url| (url.as_str(), FeedRole::Secondary))
            .chain(std::iter::once((self.primary.as_str(), FeedRole::Primary)))
    }
}
