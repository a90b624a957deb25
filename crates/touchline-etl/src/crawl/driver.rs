//! The page-automation seam.
//!
//! Crawl orchestration talks to the provider's page only through
//! [`PageDriver`], so the element-matching strategy (visible text today)
//! can be swapped without touching the state machines or transforms.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::error::{PipelineError, PipelineResult};

/// Bounds on every wait a crawl performs.
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub navigation_timeout: Duration,
    /// Bound on waiting for the initial page, each further page, and the
    /// club list.
    pub response_timeout: Duration,
    pub settle_timeout: Duration,
    /// How long the page must stay quiet to count as settled.
    pub settle_quiet: Duration,
    /// Polls for a usable "Load more" before pagination is exhausted.
    pub load_more_attempts: u32,
    pub load_more_poll: Duration,
    /// Interval of response and element polling.
    pub poll_interval: Duration,
    /// Pause after a "Load more" response so the list can render.
    pub after_page_pause: Duration,
    /// Hard stop against a page that never runs out of "Load more".
    pub max_pages: usize,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(30),
            response_timeout: Duration::from_secs(60),
            settle_timeout: Duration::from_secs(15),
            settle_quiet: Duration::from_millis(750),
            load_more_attempts: 10,
            load_more_poll: Duration::from_millis(500),
            poll_interval: Duration::from_millis(100),
            after_page_pause: Duration::from_millis(500),
            max_pages: 500,
        }
    }
}

/// Poll `probe` until it reports `true` or `timeout` elapses.
///
/// # Errors
/// Returns [`PipelineError::Timeout`] naming `waiting_for`, or the first
/// error `probe` returns.
pub fn poll_until<F>(
    waiting_for: &str,
    timeout: Duration,
    interval: Duration,
    mut probe: F,
) -> PipelineResult<()>
where
    F: FnMut() -> PipelineResult<bool>,
{
    let started = Instant::now();
    loop {
        if probe()? {
            return Ok(());
        }
        if started.elapsed() >= timeout {
            return Err(PipelineError::Timeout {
                waiting_for: waiting_for.to_string(),
                after: timeout,
            });
        }
        thread::sleep(interval);
    }
}

/// Ordered record of every provider API response the page received.
///
/// Cloning shares the underlying list: the browser's network listener
/// appends from its own thread while the crawl reads.
#[derive(Debug, Clone, Default)]
pub struct ResponseLog {
    inner: Arc<Mutex<Vec<Value>>>,
}

impl ResponseLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Value>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, body: Value) {
        let mut list = self.lock();
        list.push(body);
        log::debug!("Captured API response #{}", list.len());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Keep at most the newest entry. Returns how many were discarded.
    pub fn truncate_to_last(&self) -> usize {
        let mut list = self.lock();
        let discard = list.len().saturating_sub(1);
        list.drain(..discard);
        discard
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<Value> {
        self.lock().clone()
    }

    /// Block until at least `count` responses are recorded.
    ///
    /// # Errors
    /// Returns [`PipelineError::Timeout`] when `timeout` elapses first.
    pub fn wait_for(
        &self,
        count: usize,
        waiting_for: &str,
        timeout: Duration,
        interval: Duration,
    ) -> PipelineResult<()> {
        poll_until(waiting_for, timeout, interval, || Ok(self.len() >= count))
    }
}

/// Operations a crawl needs from a browser page.
pub trait PageDriver {
    /// Load `url` and wait for the navigation to finish.
    fn navigate(&mut self, url: &str) -> PipelineResult<()>;

    /// Click the visible element whose trimmed text is exactly `text`.
    fn click_text(&mut self, text: &str) -> PipelineResult<()>;

    /// Wait until the page has stopped loading resources.
    fn settle(&mut self) -> PipelineResult<()>;

    fn scroll_to_bottom(&mut self) -> PipelineResult<()>;

    /// `true` when a "Load more" control is visible and enabled.
    fn load_more_ready(&mut self) -> PipelineResult<bool>;

    fn click_load_more(&mut self) -> PipelineResult<()>;

    fn pause(&mut self, duration: Duration);

    /// Responses captured since the driver was created.
    fn responses(&self) -> &ResponseLog;
}
