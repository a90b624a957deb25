//! Club crawl: load the fixtures page once and keep the club list the page
//! fetches for its filters.

use std::path::PathBuf;

use serde_json::Value;

use touchline_core::provider::ClubsPage;
use touchline_core::store;

use crate::config::Config;
use crate::crawl::driver::{CrawlSettings, PageDriver};
use crate::error::{PipelineError, PipelineResult};

/// Outcome of a club crawl.
#[derive(Debug, Clone)]
pub struct ClubCrawlReport {
    pub clubs: usize,
    pub path: PathBuf,
}

/// Navigate and return the first captured club list response.
///
/// # Errors
/// Returns [`PipelineError::Timeout`] when no club list arrives in time.
pub fn capture_club_list<D: PageDriver>(
    driver: &mut D,
    url: &str,
    settings: &CrawlSettings,
) -> PipelineResult<Value> {
    driver.navigate(url)?;
    driver.responses().wait_for(
        1,
        "the club list response",
        settings.response_timeout,
        settings.poll_interval,
    )?;
    let mut responses = driver.responses().snapshot();
    if responses.len() > 1 {
        log::debug!(
            "{} club list responses captured; keeping the first",
            responses.len()
        );
    }
    if responses.is_empty() {
        return Err(PipelineError::Browser(
            "club list response vanished after capture".to_string(),
        ));
    }
    Ok(responses.swap_remove(0))
}

/// Crawl the club list with an already opened page and persist it.
///
/// `url` overrides the configured fixtures page.
///
/// # Errors
/// Returns a timeout, browser, validation or I/O error; nothing is written
/// unless the payload validates.
pub fn crawl_clubs_with<D: PageDriver>(
    driver: &mut D,
    config: &Config,
    url: Option<&str>,
) -> PipelineResult<ClubCrawlReport> {
    let url = url.unwrap_or(&config.fixtures_url);
    log::info!("Crawling club list via {url}");
    let raw = capture_club_list(driver, url, &config.crawl_settings())?;

    let page = ClubsPage::from_value(&raw, "club list response")?;
    let path = config.layout().external_clubs_file();
    store::write_raw(&path, &raw)?;
    log::info!("Wrote {} ({} clubs)", path.display(), page.clubs.len());

    Ok(ClubCrawlReport {
        clubs: page.clubs.len(),
        path,
    })
}
