//! Keeps per-version Atlassian Crowd container build directories pointing at
//! the latest patch release of their `major.minor` line.

pub mod build;
pub mod config;
pub mod error;
pub mod feed;
pub mod updater;
