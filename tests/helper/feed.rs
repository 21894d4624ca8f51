//! Feed test utilities

use std::cell::RefCell;
use std::collections::HashMap;

use crowd_image_updater::feed::error::FeedError;
use crowd_image_updater::feed::source::FeedSource;

pub const ARCHIVED: &str = "https://feeds.test/archived/crowd.json";
pub const EAP: &str = "https://feeds.test/eap/crowd.json";
pub const CURRENT: &str = "https://feeds.test/current/crowd.json";

/// Stub feed source serving fixed bodies and recording requested URLs
#[derive(Default)]
pub struct StubFeedSource {
    bodies: HashMap<String, String>,
    requested: RefCell<Vec<String>>,
}

impl StubFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl FeedSource for StubFeedSource {
    fn fetch(&self, url: &str) -> Result<String, FeedError> {
        self.requested.borrow_mut().push(url.to_string());
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| FeedError::format(url, "no stub body"))
    }
}

/// Build a JSONP feed document from `(file name, version, released)` records
pub fn feed_body(records: &[(&str, &str, &str)]) -> String {
    let records: Vec<String> = records
        .iter()
        .map(|(file_name, version, released)| {
            format!(
                r#"{{"description": "{file_name}", "zipUrl": "https://downloads.test/software/crowd/downloads/{file_name}", "md5": "", "released": "{released}", "version": "{version}"}}"#
            )
        })
        .collect();
    format!("downloads([{}])", records.join(",\n"))
}
