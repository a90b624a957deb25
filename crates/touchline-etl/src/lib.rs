//! Crawl and sync stages for touchline.
//!
//! The crawl stages drive a headless browser against the fixtures
//! provider and persist its raw API pages; the sync stages turn those pages
//! into the canonical club and fixture files the website reads.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod crawl;
pub mod error;
pub mod layout;
pub mod merge;
pub mod resolver;
pub mod status;
pub mod sync;
pub mod transform;

pub use config::Config;
pub use crawl::{crawl_clubs, crawl_fixtures, FixtureCrawlRequest};
pub use error::{PipelineError, PipelineResult};
pub use layout::DataLayout;
pub use resolver::ClubDirectory;
pub use sync::{sync_all_fixtures, sync_clubs, sync_fixtures, ClubSyncReport, FixtureSyncReport};
pub use transform::FixtureTransformer;
