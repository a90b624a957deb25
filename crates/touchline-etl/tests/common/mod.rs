//! Shared fixtures for the integration tests: provider payload builders
//! and a scripted page driver.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use serde_json::{json, Value};
use touchline_etl::crawl::{CrawlSettings, PageDriver, ResponseLog};
use touchline_etl::PipelineResult;

/// A provider fixture resource.
pub fn fixture(id: &str, round: &str, date: &str, home: &str, away: &str) -> Value {
    json!({
        "type": "fixtures",
        "id": id,
        "attributes": {
            "date": date,
            "round": round,
            "competition_name": "FFV",
            "league_name": "State League 2 North-West",
            "home_team_name": home,
            "home_logo": format!("https://cdn.example.com/logos/{}.png", home.to_lowercase().replace(' ', "-")),
            "away_team_name": away,
            "away_logo": format!("https://cdn.example.com/logos/{}.png", away.to_lowercase().replace(' ', "-")),
            "ground_name": "Bill Lawry Oval",
            "field_name": "Pitch 1",
            "ground_latitude": -37.7749,
            "ground_longitude": "144.9988"
        }
    })
}

/// A fixtures page envelope.
pub fn fixtures_page(fixtures: Vec<Value>, next: Option<&str>) -> Value {
    json!({
        "data": fixtures,
        "links": { "next": next },
        "meta": { "per_page": 20 }
    })
}

/// A provider club resource whose logo matches [`fixture`]'s logo URLs.
pub fn club(id: &str, name: &str) -> Value {
    json!({
        "type": "clubs",
        "id": id,
        "attributes": {
            "name": name,
            "image": format!("https://cdn.example.com/logos/{}.png", name.to_lowercase().replace(' ', "-")),
            "email": "secretary@example.com",
            "socials": [{ "name": "Facebook", "value": "https://facebook.com/example" }]
        }
    })
}

pub fn clubs_page(clubs: Vec<Value>) -> Value {
    json!({ "data": clubs })
}

/// Crawl settings with short waits for tests.
pub fn quick_settings() -> CrawlSettings {
    CrawlSettings {
        navigation_timeout: Duration::from_millis(50),
        response_timeout: Duration::from_millis(50),
        settle_timeout: Duration::from_millis(50),
        settle_quiet: Duration::from_millis(1),
        load_more_attempts: 3,
        load_more_poll: Duration::from_millis(1),
        poll_interval: Duration::from_millis(1),
        after_page_pause: Duration::from_millis(1),
        max_pages: 50,
    }
}

/// A page that answers every action from a script.
///
/// Responses are pushed synchronously, the way the browser's listener
/// would record them while an action is in flight.
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    log: ResponseLog,
    /// Pushed on navigation.
    pub on_navigate: Vec<Value>,
    /// Pushed when the element with the given text is clicked.
    pub on_click: HashMap<String, Value>,
    /// One entry per "Load more" click; `None` produces no response.
    pub more: VecDeque<Option<Value>>,
    /// Readiness polls that report "not ready" before the control shows.
    pub not_ready_polls: u32,
    pub visited: Vec<String>,
    pub clicked: Vec<String>,
    pub settles: usize,
    pub load_more_clicks: usize,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageDriver for ScriptedDriver {
    fn navigate(&mut self, url: &str) -> PipelineResult<()> {
        self.visited.push(url.to_string());
        for body in self.on_navigate.drain(..) {
            self.log.push(body);
        }
        Ok(())
    }

    fn click_text(&mut self, text: &str) -> PipelineResult<()> {
        self.clicked.push(text.to_string());
        if let Some(body) = self.on_click.remove(text) {
            self.log.push(body);
        }
        Ok(())
    }

    fn settle(&mut self) -> PipelineResult<()> {
        self.settles += 1;
        Ok(())
    }

    fn scroll_to_bottom(&mut self) -> PipelineResult<()> {
        Ok(())
    }

    fn load_more_ready(&mut self) -> PipelineResult<bool> {
        if self.more.is_empty() {
            return Ok(false);
        }
        if self.not_ready_polls > 0 {
            self.not_ready_polls -= 1;
            return Ok(false);
        }
        Ok(true)
    }

    fn click_load_more(&mut self) -> PipelineResult<()> {
        self.load_more_clicks += 1;
        if let Some(Some(body)) = self.more.pop_front() {
            self.log.push(body);
        }
        Ok(())
    }

    fn pause(&mut self, _duration: Duration) {}

    fn responses(&self) -> &ResponseLog {
        &self.log
    }
}
