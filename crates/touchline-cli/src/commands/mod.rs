pub mod config;
pub mod crawl;
pub mod status;
pub mod sync;
