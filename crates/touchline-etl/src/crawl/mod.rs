//! Browser-driven crawl stages.

pub mod chrome;
pub mod clubs;
pub mod driver;
pub mod fixtures;

pub use chrome::ChromeDriver;
pub use clubs::{crawl_clubs_with, ClubCrawlReport};
pub use driver::{CrawlSettings, PageDriver, ResponseLog};
pub use fixtures::{
    crawl_fixtures_with, persist_chunks, CrawlState, FilterStep, FixtureCrawlReport,
    FixtureCrawlRequest, FixtureCrawler,
};

use crate::config::Config;
use crate::error::PipelineResult;

/// Crawl every fixture page for one team with a fresh Chrome instance.
///
/// The browser is closed when this returns, whether the crawl succeeded
/// or not.
///
/// # Errors
/// See [`crawl_fixtures_with`].
pub fn crawl_fixtures(
    config: &Config,
    request: &FixtureCrawlRequest,
) -> PipelineResult<FixtureCrawlReport> {
    let mut driver = ChromeDriver::launch(
        config.headless,
        &config.fixtures_api_prefix,
        config.crawl_settings(),
    )?;
    crawl_fixtures_with(&mut driver, config, request)
}

/// Crawl the club list with a fresh Chrome instance.
///
/// # Errors
/// See [`crawl_clubs_with`].
pub fn crawl_clubs(config: &Config, url: Option<&str>) -> PipelineResult<ClubCrawlReport> {
    let mut driver = ChromeDriver::launch(
        config.headless,
        &config.clubs_api_prefix,
        config.crawl_settings(),
    )?;
    crawl_clubs_with(&mut driver, config, url)
}
