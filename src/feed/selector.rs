//! Latest release selection across feeds
//!
//! Keeps exactly one package per version key. Within the same feed class the
//! most recently released package wins, and the last one processed wins an
//! exact date tie. A package from the primary feed always claims its key over
//! a secondary one, and a secondary package never displaces a primary one, so
//! `is_primary` cannot revert once set.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::{debug, info};

use crate::feed::error::FeedError;
use crate::feed::filter::is_installable_archive;
use crate::feed::source::{FeedSource, fetch_packages};
use crate::feed::types::{FeedRole, FeedSet, Package};
use crate::feed::version_key::major_minor;

/// Accumulator of the best package per version key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatestReleases {
    packages: BTreeMap<String, Package>,
}

impl LatestReleases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one feed's packages into the accumulator
    ///
    /// Packages that are not installable archives are skipped.
    pub fn absorb(mut self, packages: Vec<Package>, role: FeedRole) -> Self {
        for mut package in packages {
            if !is_installable_archive(&package) {
                continue;
            }
            package.is_primary = role == FeedRole::Primary;
            self.record(package);
        }
        self
    }

    fn record(&mut self, package: Package) {
        let key = major_minor(&package.version);
        match self.packages.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(package);
            }
            Entry::Occupied(mut entry) => {
                if supersedes(&package, entry.get()) {
                    debug!(
                        "{}: {} replaces {}",
                        entry.key(),
                        package.version,
                        entry.get().version
                    );
                    entry.insert(package);
                }
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Package> {
        self.packages.get(key)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<String, Package> {
        self.packages
    }
}

fn supersedes(candidate: &Package, existing: &Package) -> bool {
    match (candidate.is_primary, existing.is_primary) {
        (true, false) => true,
        (false, true) => false,
        _ => candidate.released >= existing.released,
    }
}

/// Resolve the latest installable package for every version key
///
/// Feeds are processed one at a time in [`FeedSet::ordered`] order. The first
/// feed that fails to fetch or parse aborts the whole selection.
pub fn select_latest<S: FeedSource + ?Sized>(
    source: &S,
    feeds: &FeedSet,
) -> Result<BTreeMap<String, Package>, FeedError> {
    let mut releases = LatestReleases::new();
    for (url, role) in feeds.ordered() {
        info!("fetching feed {}", url);
        let packages = fetch_packages(source, url)?;
        releases = releases.absorb(packages, role);
    }
    Ok(releases.into_map())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::source::MockFeedSource;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tarball(version: &str, released: NaiveDate) -> Package {
        let url = format!("https://example.com/atlassian-crowd-{version}.tar.gz");
        Package::new(&url, version, released)
    }

    #[test]
    fn absorb_keeps_most_recently_released_package_per_key() {
        let releases = LatestReleases::new().absorb(
            vec![
                tarball("4.3.1", date(2021, 1, 10)),
                tarball("4.3.2", date(2021, 3, 1)),
                tarball("4.2.0", date(2020, 11, 5)),
            ],
            FeedRole::Secondary,
        );

        assert_eq!(releases.len(), 2);
        assert_eq!(releases.get("4.3").unwrap().released, date(2021, 3, 1));
        assert_eq!(releases.get("4.2").unwrap().version, "4.2.0");
    }

    #[test]
    fn absorb_ignores_encounter_order_for_different_dates() {
        let releases = LatestReleases::new().absorb(
            vec![
                tarball("4.3.2", date(2021, 3, 1)),
                tarball("4.3.1", date(2021, 1, 10)),
            ],
            FeedRole::Secondary,
        );

        assert_eq!(releases.get("4.3").unwrap().version, "4.3.2");
    }

    #[test]
    fn absorb_prefers_last_processed_package_on_exact_date_tie() {
        let releases = LatestReleases::new().absorb(
            vec![
                tarball("4.3.1", date(2021, 3, 1)),
                tarball("4.3.1-standalone", date(2021, 3, 1)),
            ],
            FeedRole::Secondary,
        );

        assert_eq!(releases.get("4.3").unwrap().version, "4.3.1-standalone");
    }

    #[test]
    fn absorb_skips_non_installable_archives() {
        let releases = LatestReleases::new().absorb(
            vec![
                Package::new(
                    "https://example.com/atlassian-crowd-4.3.9.zip",
                    "4.3.9",
                    date(2021, 9, 1),
                ),
                tarball("4.3.1", date(2021, 1, 10)),
            ],
            FeedRole::Secondary,
        );

        assert_eq!(releases.get("4.3").unwrap().version, "4.3.1");
    }

    #[test]
    fn absorb_of_only_non_installable_archives_stays_empty() {
        let releases = LatestReleases::new().absorb(
            vec![Package::new(
                "https://example.com/atlassian-crowd-4.3.1-cluster.tar.gz",
                "4.3.1",
                date(2021, 1, 1),
            )],
            FeedRole::Primary,
        );

        assert!(releases.is_empty());
        assert_eq!(releases.len(), 0);
    }

    #[test]
    fn absorb_marks_primary_packages() {
        let releases = LatestReleases::new()
            .absorb(vec![tarball("4.2.0", date(2020, 1, 1))], FeedRole::Secondary)
            .absorb(vec![tarball("4.3.1", date(2021, 1, 1))], FeedRole::Primary);

        assert!(!releases.get("4.2").unwrap().is_primary);
        assert!(releases.get("4.3").unwrap().is_primary);
    }

    #[test]
    fn primary_package_claims_key_even_when_secondary_is_newer() {
        let releases = LatestReleases::new()
            .absorb(vec![tarball("4.3.2", date(2021, 6, 1))], FeedRole::Secondary)
            .absorb(vec![tarball("4.3.1", date(2021, 1, 1))], FeedRole::Primary);

        let package = releases.get("4.3").unwrap();
        assert!(package.is_primary);
        assert_eq!(package.version, "4.3.1");
    }

    #[test]
    fn primary_package_replaces_older_secondary_package() {
        let releases = LatestReleases::new()
            .absorb(vec![tarball("4.3.0", date(2020, 6, 1))], FeedRole::Secondary)
            .absorb(vec![tarball("4.3.1", date(2021, 1, 1))], FeedRole::Primary);

        let package = releases.get("4.3").unwrap();
        assert!(package.is_primary);
        assert_eq!(package.version, "4.3.1");
    }

    #[test]
    fn secondary_package_never_displaces_primary_package() {
        let releases = LatestReleases::new()
            .absorb(vec![tarball("4.3.1", date(2021, 1, 1))], FeedRole::Primary)
            .absorb(vec![tarball("4.3.2", date(2021, 6, 1))], FeedRole::Secondary);

        let package = releases.get("4.3").unwrap();
        assert!(package.is_primary);
        assert_eq!(package.version, "4.3.1");
    }

    #[test]
    fn primary_packages_compare_by_date_among_themselves() {
        let releases = LatestReleases::new().absorb(
            vec![
                tarball("4.3.2", date(2021, 6, 1)),
                tarball("4.3.1", date(2021, 1, 1)),
            ],
            FeedRole::Primary,
        );

        let package = releases.get("4.3").unwrap();
        assert!(package.is_primary);
        assert_eq!(package.version, "4.3.2");
    }

    const ARCHIVED: &str = "https://feeds/archived";
    const EAP: &str = "https://feeds/eap";
    const CURRENT: &str = "https://feeds/current";

    fn feed_body(entries: &[(&str, &str)]) -> String {
        let records: Vec<String> = entries
            .iter()
            .map(|(version, released)| {
                format!(
                    r#"{{"zipUrl": "https://example.com/atlassian-crowd-{version}.tar.gz", "version": "{version}", "released": "{released}"}}"#
                )
            })
            .collect();
        format!("downloads([{}])", records.join(","))
    }

    #[test]
    fn select_latest_merges_all_feeds() {
        let mut source = MockFeedSource::new();
        source.expect_fetch().times(3).returning(|url| {
            let body = match url {
                ARCHIVED => feed_body(&[("4.2.0", "05-Nov-2020"), ("4.3.0", "10-Jan-2021")]),
                EAP => feed_body(&[("5.0.0-m01", "01-Jul-2021")]),
                CURRENT => feed_body(&[("4.3.2", "01-Mar-2021")]),
                other => panic!("unexpected feed {other}"),
            };
            Ok(body)
        });

        let feeds = FeedSet::new(CURRENT, &[ARCHIVED, EAP]);
        let versions = select_latest(&source, &feeds).unwrap();

        let summary: Vec<(&str, &str, bool)> = versions
            .iter()
            .map(|(key, p)| (key.as_str(), p.version.as_str(), p.is_primary))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("4.2", "4.2.0", false),
                ("4.3", "4.3.2", true),
                ("5.0", "5.0.0-m01", false),
            ]
        );
    }

    #[test]
    fn select_latest_aborts_on_first_failing_feed() {
        let mut source = MockFeedSource::new();
        // Only the first secondary feed is ever requested
        source
            .expect_fetch()
            .times(1)
            .returning(|url| Err(FeedError::format(url, "error in jsonp content")));

        let feeds = FeedSet::new(CURRENT, &[ARCHIVED, EAP]);
        let result = select_latest(&source, &feeds);

        assert!(matches!(
            result,
            Err(FeedError::Format { ref url, .. }) if url == ARCHIVED
        ));
    }

    #[test]
    fn select_latest_returns_empty_map_for_empty_feeds() {
        let mut source = MockFeedSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|_| Ok("downloads([])".to_string()));

        let feeds = FeedSet::new(CURRENT, &[]);

        assert!(select_latest(&source, &feeds).unwrap().is_empty());
    }
}
