//! [`PageDriver`] backed by a headless Chrome instance.
//!
//! The provider's page exposes no stable selectors, so elements are found
//! by their visible text content. Only elements with a non-zero layout box
//! count as visible.

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use headless_chrome::protocol::cdp::Network::events::ResponseReceivedEventParams;
use headless_chrome::protocol::cdp::Network::GetResponseBodyReturnObject;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;

use crate::crawl::driver::{poll_until, CrawlSettings, PageDriver, ResponseLog};
use crate::error::{PipelineError, PipelineResult};

const LISTENER_NAME: &str = "touchline-response-capture";

/// Attempts at reading a response body that is still streaming.
const BODY_ATTEMPTS: u32 = 5;

const VISIBLE_JS: &str = "const visible = el => { \
    const r = el.getBoundingClientRect(); return r.width > 0 && r.height > 0; };";

const FIND_LOAD_MORE_JS: &str = "const findLoadMore = () => \
    Array.from(document.querySelectorAll('button, a, [role=\"button\"]')) \
    .find(el => /load more/i.test(el.textContent || '') && visible(el));";

/// A single Chrome tab with a response listener on the provider's API.
pub struct ChromeDriver {
    tab: Arc<Tab>,
    responses: ResponseLog,
    settings: CrawlSettings,
    // Dropped last: dropping the browser kills the Chrome process.
    _browser: Browser,
}

impl fmt::Debug for ChromeDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChromeDriver")
            .field("responses", &self.responses.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ChromeDriver {
    /// Launch Chrome and open a tab that records every successful response
    /// whose URL starts with `capture_prefix`.
    ///
    /// The listener is registered before any navigation so that no early
    /// response can slip past it.
    ///
    /// # Errors
    /// Returns [`PipelineError::Browser`] if Chrome cannot be started.
    pub fn launch(
        headless: bool,
        capture_prefix: &str,
        settings: CrawlSettings,
    ) -> PipelineResult<Self> {
        let idle = settings.navigation_timeout
            + settings.response_timeout
            + settings.settle_timeout
            + Duration::from_secs(60);
        let options = LaunchOptions::default_builder()
            .headless(headless)
            .window_size(Some((1366, 900)))
            .idle_browser_timeout(idle)
            .build()
            .map_err(PipelineError::browser)?;

        log::info!("Launching Chrome (headless: {headless})");
        let browser = Browser::new(options).map_err(PipelineError::browser)?;
        let tab = browser.new_tab().map_err(PipelineError::browser)?;
        tab.set_default_timeout(settings.navigation_timeout);

        let responses = ResponseLog::new();
        attach_listener(&tab, capture_prefix, responses.clone())?;

        Ok(Self {
            tab,
            responses,
            settings,
            _browser: browser,
        })
    }

    fn eval(&self, script: &str) -> PipelineResult<Option<Value>> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(PipelineError::browser)?;
        Ok(result.value)
    }

    fn eval_bool(&self, script: &str) -> PipelineResult<bool> {
        Ok(matches!(self.eval(script)?, Some(Value::Bool(true))))
    }

    /// `(document ready, finished resource count)`.
    fn load_state(&self) -> PipelineResult<(bool, u64)> {
        let sample = self.eval(
            "document.readyState + '|' + performance.getEntriesByType('resource').length",
        )?;
        let text = sample.as_ref().and_then(Value::as_str).unwrap_or_default();
        let (ready, count) = text.split_once('|').unwrap_or(("", "0"));
        Ok((ready == "complete", count.parse().unwrap_or(0)))
    }
}

impl Drop for ChromeDriver {
    fn drop(&mut self) {
        log::info!("Closing browser");
    }
}

fn attach_listener(tab: &Tab, prefix: &str, sink: ResponseLog) -> PipelineResult<()> {
    let prefix = prefix.to_string();
    tab.register_response_handling(
        LISTENER_NAME,
        Box::new(
            move |params: ResponseReceivedEventParams,
                  fetch_body: &dyn Fn() -> anyhow::Result<GetResponseBodyReturnObject>| {
                let url = &params.response.url;
                if !url.starts_with(&prefix) {
                    return;
                }
                let status = params.response.status;
                if !(200..300).contains(&status) {
                    log::warn!("Ignoring {url}: HTTP {status}");
                    return;
                }

                let mut attempt = 0;
                let body = loop {
                    attempt += 1;
                    match fetch_body() {
                        Ok(body) => break body,
                        Err(e) if attempt < BODY_ATTEMPTS => {
                            log::debug!("Body of {url} not ready ({e}), retrying");
                            thread::sleep(Duration::from_millis(100));
                        }
                        Err(e) => {
                            log::warn!("Could not read body of {url}: {e}");
                            return;
                        }
                    }
                };
                if body.base_64_encoded {
                    log::warn!("Ignoring {url}: binary body");
                    return;
                }
                match serde_json::from_str::<Value>(&body.body) {
                    Ok(json) => {
                        log::debug!("Captured {url}");
                        sink.push(json);
                    }
                    // CORS preflights share the URL but carry no body.
                    Err(e) => log::debug!("Ignoring non-JSON body from {url}: {e}"),
                }
            },
        ),
    )
    .map_err(PipelineError::browser)?;
    Ok(())
}

impl PageDriver for ChromeDriver {
    fn navigate(&mut self, url: &str) -> PipelineResult<()> {
        log::info!("Navigating to {url}");
        self.tab.navigate_to(url).map_err(PipelineError::browser)?;
        self.tab
            .wait_until_navigated()
            .map_err(PipelineError::browser)?;
        Ok(())
    }

    fn click_text(&mut self, text: &str) -> PipelineResult<()> {
        let literal = serde_json::to_string(text).map_err(PipelineError::browser)?;
        let script = format!(
            "(() => {{ {VISIBLE_JS} \
             const target = {literal}; \
             const hits = Array.from(document.querySelectorAll('body *')) \
               .filter(el => (el.textContent || '').trim() === target && visible(el)); \
             const el = hits.find(c => !hits.some(o => o !== c && c.contains(o))); \
             if (!el) return false; \
             el.scrollIntoView({{ block: 'center' }}); \
             el.click(); \
             return true; }})()"
        );
        let waiting_for = format!("a visible element with text {text:?}");
        poll_until(
            &waiting_for,
            self.settings.settle_timeout,
            self.settings.poll_interval,
            || self.eval_bool(&script),
        )?;
        log::debug!("Clicked {text:?}");
        Ok(())
    }

    fn settle(&mut self) -> PipelineResult<()> {
        let quiet = self.settings.settle_quiet;
        let mut last_count = None;
        let mut quiet_since = Instant::now();
        poll_until(
            "the page to settle",
            self.settings.settle_timeout,
            self.settings.poll_interval,
            || {
                let (ready, count) = self.load_state()?;
                if ready && last_count == Some(count) {
                    return Ok(quiet_since.elapsed() >= quiet);
                }
                last_count = Some(count);
                quiet_since = Instant::now();
                Ok(false)
            },
        )
    }

    fn scroll_to_bottom(&mut self) -> PipelineResult<()> {
        self.eval("window.scrollTo(0, document.body.scrollHeight); true")?;
        Ok(())
    }

    fn load_more_ready(&mut self) -> PipelineResult<bool> {
        self.eval_bool(&format!(
            "(() => {{ {VISIBLE_JS} {FIND_LOAD_MORE_JS} \
             const btn = findLoadMore(); \
             if (!btn) return false; \
             return !(btn.disabled || btn.getAttribute('aria-disabled') === 'true'); }})()"
        ))
    }

    fn click_load_more(&mut self) -> PipelineResult<()> {
        let clicked = self.eval_bool(&format!(
            "(() => {{ {VISIBLE_JS} {FIND_LOAD_MORE_JS} \
             const btn = findLoadMore(); \
             if (!btn) return false; \
             btn.click(); \
             return true; }})()"
        ))?;
        if clicked {
            Ok(())
        } else {
            Err(PipelineError::Browser(
                "\"Load more\" disappeared before it could be clicked".to_string(),
            ))
        }
    }

    fn pause(&mut self, duration: Duration) {
        thread::sleep(duration);
    }

    fn responses(&self) -> &ResponseLog {
        &self.responses
    }
}
