//! Crawl state machine tests against a scripted page.

mod common;

use std::fs;

use common::{club, clubs_page, fixture, fixtures_page, quick_settings, ScriptedDriver};
use serde_json::Value;
use tempfile::TempDir;
use touchline_core::store;
use touchline_etl::crawl::{
    crawl_clubs_with, crawl_fixtures_with, CrawlState, FilterStep, FixtureCrawler,
};
use touchline_etl::{Config, FixtureCrawlRequest, PipelineError};

const DATE: &str = "2025-04-05T05:00:00.000000Z";

fn page_with(id: &str) -> Value {
    fixtures_page(vec![fixture(id, "R1", DATE, "Alpha FC", "Beta SC")], None)
}

fn first_id(page: &Value) -> &str {
    page["data"][0]["id"].as_str().unwrap()
}

fn config_in(dir: &TempDir) -> Config {
    Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::default()
    }
}

fn league_filter(target: &str) -> Vec<FilterStep> {
    vec![FilterStep::new("league", "All leagues", target)]
}

#[test]
fn test_stale_filter_responses_are_discarded() {
    let mut driver = ScriptedDriver::new();
    driver.on_navigate = vec![page_with("unfiltered")];
    driver.on_click.insert("All leagues".to_string(), page_with("dropdown"));
    driver.on_click.insert("State League 2".to_string(), page_with("filtered"));
    driver.more.push_back(Some(page_with("second")));

    let mut crawler = FixtureCrawler::new(&mut driver, quick_settings());
    let pages = crawler
        .run("https://fv.example.com/fixtures/", &league_filter("State League 2"))
        .unwrap();
    assert_eq!(crawler.state(), CrawlState::Exhausted);

    let ids: Vec<&str> = pages.iter().map(first_id).collect();
    assert_eq!(ids, vec!["filtered", "second"]);
}

#[test]
fn test_paginates_until_load_more_disappears() {
    let mut driver = ScriptedDriver::new();
    driver.on_navigate = vec![page_with("p1")];
    driver.more.extend([Some(page_with("p2")), Some(page_with("p3"))]);
    driver.not_ready_polls = 2;

    let pages = FixtureCrawler::new(&mut driver, quick_settings())
        .run("https://fv.example.com/fixtures/", &[])
        .unwrap();

    assert_eq!(pages.len(), 3);
    assert_eq!(first_id(&pages[2]), "p3");
    assert_eq!(driver.load_more_clicks, 2);
}

#[test]
fn test_filters_already_at_target_are_not_clicked() {
    let mut driver = ScriptedDriver::new();
    driver.on_navigate = vec![page_with("p1")];

    let filters = vec![
        FilterStep::new("season", "2025", "2025"),
        FilterStep::new("competition", "FFV", "FFV"),
        FilterStep::new("league", "All leagues", "State League 2"),
    ];
    FixtureCrawler::new(&mut driver, quick_settings())
        .run("https://fv.example.com/fixtures/", &filters)
        .unwrap();

    assert_eq!(driver.clicked, vec!["All leagues", "State League 2"]);
}

#[test]
fn test_missing_initial_response_times_out() {
    let mut driver = ScriptedDriver::new();

    let mut crawler = FixtureCrawler::new(&mut driver, quick_settings());
    let err = crawler
        .run("https://fv.example.com/fixtures/", &[])
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(crawler.state(), CrawlState::AwaitingInitialResponse);
}

#[test]
fn test_missing_page_response_aborts_crawl() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(&dir);
    config.response_timeout_secs = 0;

    let mut driver = ScriptedDriver::new();
    driver.on_navigate = vec![page_with("p1")];
    driver.more.push_back(None);

    let request = FixtureCrawlRequest::new("u18", "State League 2", &config);
    let err = crawl_fixtures_with(&mut driver, &config, &request).unwrap_err();

    assert!(matches!(err, PipelineError::Timeout { .. }), "got {err}");
    assert!(!config.layout().external_fixtures_dir("u18").exists());
}

#[test]
fn test_crawl_writes_numbered_chunks() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let layout = config.layout();

    let mut driver = ScriptedDriver::new();
    driver.on_click.insert("State League 2".to_string(), page_with("p1"));
    driver.more.extend([Some(page_with("p2")), Some(page_with("p3"))]);

    let request = FixtureCrawlRequest::new("seniors", "State League 2", &config);
    let report = crawl_fixtures_with(&mut driver, &config, &request).unwrap();

    assert_eq!(report.chunks, 3);
    assert_eq!(report.fixtures, 3);
    assert_eq!(driver.visited, vec![config.fixtures_url.clone()]);
    for (index, id) in [(1, "p1"), (2, "p2"), (3, "p3")] {
        let raw = store::read_raw(&layout.chunk_file("seniors", index)).unwrap();
        assert_eq!(first_id(&raw), id);
    }
}

#[test]
fn test_recrawl_replaces_previous_chunks() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let layout = config.layout();
    for index in 1..=4 {
        store::write_raw(&layout.chunk_file("seniors", index), &page_with("old")).unwrap();
    }

    let mut driver = ScriptedDriver::new();
    driver.on_click.insert("State League 2".to_string(), page_with("new"));
    let request = FixtureCrawlRequest::new("seniors", "State League 2", &config);
    crawl_fixtures_with(&mut driver, &config, &request).unwrap();

    let names: Vec<String> = fs::read_dir(layout.external_fixtures_dir("seniors"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["chunk-1.json"]);
}

#[test]
fn test_club_crawl_keeps_first_response() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let mut driver = ScriptedDriver::new();
    driver.on_navigate = vec![
        clubs_page(vec![club("c1", "Alpha FC"), club("c2", "Beta SC")]),
        clubs_page(vec![club("c3", "Gamma United")]),
    ];

    let report = crawl_clubs_with(&mut driver, &config, None).unwrap();
    assert_eq!(report.clubs, 2);

    let raw = store::read_raw(&config.layout().external_clubs_file()).unwrap();
    assert_eq!(raw["data"].as_array().unwrap().len(), 2);
}

#[test]
fn test_club_crawl_rejects_fixture_payload() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let mut driver = ScriptedDriver::new();
    driver.on_navigate = vec![page_with("p1")];

    assert!(crawl_clubs_with(&mut driver, &config, Some("https://fv.example.com/clubs")).is_err());
    assert!(!config.layout().external_clubs_file().exists());
    assert_eq!(driver.visited, vec!["https://fv.example.com/clubs"]);
}
