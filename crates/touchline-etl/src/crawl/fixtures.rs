//! Fixture crawl: filter the provider's fixture list, page through it with
//! "Load more", and keep one raw API response per page.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use serde_json::Value;

use touchline_core::provider::FixturesPage;
use touchline_core::store;

use crate::config::Config;
use crate::crawl::driver::{CrawlSettings, PageDriver};
use crate::error::{PipelineError, PipelineResult};
use crate::layout::{list_chunks, DataLayout};

/// What to crawl for one of the club's teams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureCrawlRequest {
    /// Local team slug; names the output directory only.
    pub team: String,
    pub league: String,
    pub season: i32,
    pub competition: String,
}

impl FixtureCrawlRequest {
    /// A request with the default season (current year) and competition.
    #[must_use]
    pub fn new(team: impl Into<String>, league: impl Into<String>, config: &Config) -> Self {
        Self {
            team: team.into(),
            league: league.into(),
            season: current_season(),
            competition: config.default_competition.clone(),
        }
    }

    /// Filters in the order the page requires: each one's options depend
    /// on the value of the one before.
    #[must_use]
    pub fn filter_steps(&self, config: &Config) -> Vec<FilterStep> {
        vec![
            FilterStep::new("season", current_season().to_string(), self.season.to_string()),
            FilterStep::new(
                "competition",
                config.default_competition.clone(),
                self.competition.clone(),
            ),
            FilterStep::new(
                "league",
                config.league_placeholder.clone(),
                self.league.clone(),
            ),
        ]
    }
}

#[must_use]
pub fn current_season() -> i32 {
    chrono::Local::now().year()
}

/// One dropdown change: click the label currently shown, then the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterStep {
    pub name: &'static str,
    pub current: String,
    pub target: String,
}

impl FilterStep {
    #[must_use]
    pub fn new(name: &'static str, current: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name,
            current: current.into(),
            target: target.into(),
        }
    }
}

/// Where a fixture crawl is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Idle,
    Navigated,
    FiltersApplying,
    FiltersApplied,
    AwaitingInitialResponse,
    /// `n` pages captured.
    HasPage(usize),
    /// Waiting for page `n`.
    Paginating(usize),
    Exhausted,
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Navigated => write!(f, "navigated"),
            Self::FiltersApplying => write!(f, "applying filters"),
            Self::FiltersApplied => write!(f, "filters applied"),
            Self::AwaitingInitialResponse => write!(f, "awaiting initial response"),
            Self::HasPage(n) => write!(f, "has {n} page(s)"),
            Self::Paginating(n) => write!(f, "loading page {n}"),
            Self::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// Drives one page through the fixture crawl state machine.
#[derive(Debug)]
pub struct FixtureCrawler<'d, D: PageDriver> {
    driver: &'d mut D,
    settings: CrawlSettings,
    state: CrawlState,
}

impl<'d, D: PageDriver> FixtureCrawler<'d, D> {
    pub fn new(driver: &'d mut D, settings: CrawlSettings) -> Self {
        Self {
            driver,
            settings,
            state: CrawlState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> CrawlState {
        self.state
    }

    fn enter(&mut self, state: CrawlState) {
        log::debug!("Crawl state: {} -> {}", self.state, state);
        self.state = state;
    }

    /// Run the crawl and return one raw response body per page, in order.
    ///
    /// # Errors
    /// Any timeout or browser failure aborts the whole crawl; a partial
    /// page list is never returned.
    pub fn run(&mut self, url: &str, filters: &[FilterStep]) -> PipelineResult<Vec<Value>> {
        self.driver.navigate(url)?;
        self.enter(CrawlState::Navigated);

        self.enter(CrawlState::FiltersApplying);
        for step in filters {
            self.apply_filter(step)?;
        }
        self.driver.settle()?;
        self.enter(CrawlState::FiltersApplied);

        // Responses from intermediate filter states are stale; only the
        // newest can reflect the final filters.
        let stale = self.driver.responses().truncate_to_last();
        if stale > 0 {
            log::info!("Discarded {stale} response(s) captured while filtering");
        }

        self.enter(CrawlState::AwaitingInitialResponse);
        self.driver.responses().wait_for(
            1,
            "the initial fixtures page",
            self.settings.response_timeout,
            self.settings.poll_interval,
        )?;
        let mut pages = self.driver.responses().len();
        self.enter(CrawlState::HasPage(pages));

        loop {
            self.driver.scroll_to_bottom()?;
            if !self.poll_load_more()? {
                self.enter(CrawlState::Exhausted);
                break;
            }
            if pages >= self.settings.max_pages {
                return Err(PipelineError::Browser(format!(
                    "still offered \"Load more\" after {pages} pages"
                )));
            }

            self.enter(CrawlState::Paginating(pages + 1));
            self.driver.click_load_more()?;
            let waiting_for = format!("fixtures page {}", pages + 1);
            self.driver.responses().wait_for(
                pages + 1,
                &waiting_for,
                self.settings.response_timeout,
                self.settings.poll_interval,
            )?;
            self.driver.pause(self.settings.after_page_pause);
            pages = self.driver.responses().len();
            self.enter(CrawlState::HasPage(pages));
        }

        log::info!("Pagination exhausted after {pages} page(s)");
        Ok(self.driver.responses().snapshot())
    }

    fn apply_filter(&mut self, step: &FilterStep) -> PipelineResult<()> {
        if step.current == step.target {
            log::info!("Filter {}: already {:?}", step.name, step.target);
            return Ok(());
        }
        log::info!(
            "Filter {}: {:?} -> {:?}",
            step.name,
            step.current,
            step.target
        );
        self.driver.click_text(&step.current)?;
        self.driver.settle()?;
        self.driver.click_text(&step.target)?;
        self.driver.settle()?;
        Ok(())
    }

    fn poll_load_more(&mut self) -> PipelineResult<bool> {
        for attempt in 1..=self.settings.load_more_attempts {
            if self.driver.load_more_ready()? {
                return Ok(true);
            }
            if attempt < self.settings.load_more_attempts {
                self.driver.pause(self.settings.load_more_poll);
            }
        }
        Ok(false)
    }
}

/// Outcome of a fixture crawl.
#[derive(Debug, Clone)]
pub struct FixtureCrawlReport {
    pub team: String,
    pub chunks: usize,
    pub fixtures: usize,
    pub dir: PathBuf,
}

/// Validate and persist crawled pages as `chunk-<n>.json`, numbered from 1.
///
/// Existing chunks of the team are removed first so a shorter re-crawl
/// cannot leave stale pages behind. Pages are validated one at a time; the
/// first invalid page aborts, leaving earlier chunks on disk for
/// inspection.
///
/// # Errors
/// Returns a validation error for the first invalid page, or an I/O error.
pub fn persist_chunks(
    layout: &DataLayout,
    team: &str,
    pages: &[Value],
) -> PipelineResult<FixtureCrawlReport> {
    let dir = layout.external_fixtures_dir(team);
    remove_chunks(&dir)?;

    let mut fixtures = 0;
    for (i, raw) in pages.iter().enumerate() {
        let index = i + 1;
        let path = layout.chunk_file(team, index);
        let page = FixturesPage::from_value(raw, &format!("fixtures page {index} for {team}"))?;
        store::write_raw(&path, raw)?;
        log::info!(
            "Wrote {} ({} fixtures)",
            path.display(),
            page.fixtures.len()
        );
        fixtures += page.fixtures.len();
        if page.links.next.is_some() && index == pages.len() {
            log::warn!("Last page still links to a next page; the list may be incomplete");
        }
    }

    Ok(FixtureCrawlReport {
        team: team.to_string(),
        chunks: pages.len(),
        fixtures,
        dir,
    })
}

fn remove_chunks(dir: &Path) -> PipelineResult<()> {
    for (_, path) in list_chunks(dir) {
        fs::remove_file(&path).map_err(touchline_core::Error::from)?;
        log::debug!("Removed stale {}", path.display());
    }
    Ok(())
}

/// Crawl with an already opened page and persist the result.
///
/// # Errors
/// See [`FixtureCrawler::run`] and [`persist_chunks`].
pub fn crawl_fixtures_with<D: PageDriver>(
    driver: &mut D,
    config: &Config,
    request: &FixtureCrawlRequest,
) -> PipelineResult<FixtureCrawlReport> {
    log::info!(
        "Crawling fixtures for {} ({} {} {})",
        request.team,
        request.season,
        request.competition,
        request.league
    );
    let pages = FixtureCrawler::new(driver, config.crawl_settings())
        .run(&config.fixtures_url, &request.filter_steps(config))?;
    persist_chunks(&config.layout(), &request.team, &pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn page(ids: &[&str]) -> Value {
        let data: Vec<Value> = ids
            .iter()
            .map(|id| {
                json!({
                    "type": "fixtures",
                    "id": id,
                    "attributes": {
                        "date": "2025-04-05T05:00:00Z",
                        "round": "R1",
                        "competition_name": "State League 2",
                        "home_team_name": "A",
                        "away_team_name": "B",
                        "ground_name": "Oval",
                        "ground_latitude": -37.8,
                        "ground_longitude": 144.9
                    }
                })
            })
            .collect();
        json!({ "data": data })
    }

    #[test]
    fn test_filter_steps_order_and_defaults() {
        let config = Config::default();
        let request = FixtureCrawlRequest::new("seniors", "State League 2 North-West", &config);
        assert_eq!(request.season, current_season());
        assert_eq!(request.competition, "FFV");

        let steps = request.filter_steps(&config);
        let names: Vec<&str> = steps.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["season", "competition", "league"]);
        assert_eq!(steps[0].current, steps[0].target);
        assert_eq!(steps[2].current, "All leagues");
        assert_eq!(steps[2].target, "State League 2 North-West");
    }

    #[test]
    fn test_persist_chunks_numbers_from_one() {
        let dir = TempDir::new().unwrap();
        let layout = DataLayout::new(dir.path());
        let report = persist_chunks(&layout, "seniors", &[page(&["a", "b"]), page(&["c"])]).unwrap();

        assert_eq!(report.chunks, 2);
        assert_eq!(report.fixtures, 3);
        assert!(layout.chunk_file("seniors", 1).exists());
        assert!(layout.chunk_file("seniors", 2).exists());
        assert_eq!(store::read_raw(&layout.chunk_file("seniors", 2)).unwrap(), page(&["c"]));
    }

    #[test]
    fn test_persist_chunks_replaces_previous_crawl() {
        let dir = TempDir::new().unwrap();
        let layout = DataLayout::new(dir.path());
        persist_chunks(&layout, "seniors", &[page(&["a"]), page(&["b"]), page(&["c"])]).unwrap();
        persist_chunks(&layout, "seniors", &[page(&["z"])]).unwrap();

        let chunks = layout.chunk_files("seniors").unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_persist_chunks_stops_at_first_invalid_page() {
        let dir = TempDir::new().unwrap();
        let layout = DataLayout::new(dir.path());
        let bad = json!({ "data": [{ "type": "fixtures", "id": "x" }] });
        let err = persist_chunks(&layout, "seniors", &[page(&["a"]), bad, page(&["c"])]).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Core(touchline_core::Error::Validation(_))
        ));
        assert!(layout.chunk_file("seniors", 1).exists());
        assert!(!layout.chunk_file("seniors", 2).exists());
        assert!(!layout.chunk_file("seniors", 3).exists());
    }

    #[test]
    fn test_crawl_state_display() {
        assert_eq!(CrawlState::HasPage(2).to_string(), "has 2 page(s)");
        assert_eq!(CrawlState::Paginating(3).to_string(), "loading page 3");
    }
}
