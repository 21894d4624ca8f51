//! Release feed layer
//!
//! Fetches the Atlassian download feeds and resolves the latest installable
//! package for every `major.minor` release line.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ FeedSource  │────▶│   Parser    │────▶│   Filter    │
//! │  (fetch)    │     │  (JSONP)    │     │ (tarballs)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │ VersionKey  │◀────│  Selector   │
//!                     │(major.minor)│     │  (latest)   │
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`source`]: Feed source trait and blocking HTTP implementation
//! - [`parser`]: JSONP unwrapping and record decoding
//! - [`filter`]: Installable archive predicate
//! - [`selector`]: Latest release per version key across feeds
//! - [`version_key`]: `major.minor` normalization
//! - [`error`]: Error types for feed operations
//! - [`types`]: `Package` and `FeedSet`

pub mod error;
pub mod filter;
pub mod parser;
pub mod selector;
pub mod source;
pub mod types;
pub mod version_key;
