//! Build directory layer
//!
//! Discovers the tracked build directories and regenerates their artifacts
//! (`Dockerfile` and `docker-entrypoint.sh`).
//!
//! # Modules
//!
//! - [`dirs`]: Tracked directory listing
//! - [`template`]: Dockerfile template parsing and rendering
//! - [`artifacts`]: Artifact writer trait and its filesystem implementation

pub mod artifacts;
pub mod dirs;
pub mod template;
