use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::validate::{index, is_hh_mm, join, parse_iso_date, Issues, Validate};

/// Identity of a fixture for deduplication: the same pairing can only be
/// played once per round.
pub type FixtureKey = (u32, String, String);

/// A canonical fixture as published to the website.
///
/// `date`, `time` and `day` are all observed in the venue's timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub round: u32,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// English weekday name of `date`.
    pub day: String,
    /// 24-hour `HH:MM`.
    pub time: String,
    pub home_team_id: String,
    pub away_team_id: String,
    pub address: String,
    /// `"<lat>,<lng>"`.
    pub coordinates: String,
}

impl Fixture {
    #[must_use]
    pub fn key(&self) -> FixtureKey {
        (
            self.round,
            self.home_team_id.clone(),
            self.away_team_id.clone(),
        )
    }

    /// Calendar year of the fixture date, if it parses.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        use chrono::Datelike;
        parse_iso_date(&self.date).map(|d| d.year())
    }
}

fn check_coordinates(path: &str, value: &str, issues: &mut Issues) {
    let parts: Vec<&str> = value.split(',').collect();
    let parsed: Vec<Option<f64>> = parts
        .iter()
        .map(|p| p.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect();
    match parsed.as_slice() {
        [Some(lat), Some(lng)] => {
            if !(-90.0..=90.0).contains(lat) {
                issues.push(path, format!("latitude {lat} out of range"));
            }
            if !(-180.0..=180.0).contains(lng) {
                issues.push(path, format!("longitude {lng} out of range"));
            }
        }
        _ => issues.push(path, format!("expected \"<lat>,<lng>\", got {value:?}")),
    }
}

impl Validate for Fixture {
    fn subject(&self) -> String {
        format!(
            "fixture R{} {} v {}",
            self.round, self.home_team_id, self.away_team_id
        )
    }

    fn check(&self, path: &str, issues: &mut Issues) {
        match parse_iso_date(&self.date) {
            Some(date) => {
                let weekday = date.format("%A").to_string();
                if self.day != weekday {
                    issues.push(
                        join(path, "day"),
                        format!("{:?} does not match {} ({weekday})", self.day, self.date),
                    );
                }
            }
            None => issues.push(
                join(path, "date"),
                format!("expected YYYY-MM-DD, got {:?}", self.date),
            ),
        }
        if !is_hh_mm(&self.time) {
            issues.push(
                join(path, "time"),
                format!("expected HH:MM, got {:?}", self.time),
            );
        }
        issues.require_text(&join(path, "homeTeamId"), &self.home_team_id);
        issues.require_text(&join(path, "awayTeamId"), &self.away_team_id);
        issues.require_text(&join(path, "address"), &self.address);
        check_coordinates(&join(path, "coordinates"), &self.coordinates, issues);
    }
}

/// One team's full fixture list, as stored in `matches/<team>.json`.
///
/// `total_fixtures` and `total_rounds` are derived from `fixtures`; build
/// values with [`FixtureData::new`] so they stay in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureData {
    pub competition: String,
    pub season: i32,
    pub total_fixtures: usize,
    pub total_rounds: u32,
    pub fixtures: Vec<Fixture>,
}

impl FixtureData {
    #[must_use]
    pub fn new(competition: impl Into<String>, season: i32, fixtures: Vec<Fixture>) -> Self {
        Self {
            competition: competition.into(),
            season,
            total_fixtures: fixtures.len(),
            total_rounds: fixtures.iter().map(|f| f.round).max().unwrap_or(0),
            fixtures,
        }
    }
}

impl Validate for FixtureData {
    fn subject(&self) -> String {
        format!("{} {} fixtures", self.competition, self.season)
    }

    fn check(&self, path: &str, issues: &mut Issues) {
        issues.require_text(&join(path, "competition"), &self.competition);
        if !(1900..=2200).contains(&self.season) {
            issues.push(
                join(path, "season"),
                format!("implausible season {}", self.season),
            );
        }
        if self.total_fixtures != self.fixtures.len() {
            issues.push(
                join(path, "totalFixtures"),
                format!(
                    "is {} but {} fixtures are listed",
                    self.total_fixtures,
                    self.fixtures.len()
                ),
            );
        }
        let max_round = self.fixtures.iter().map(|f| f.round).max().unwrap_or(0);
        if self.total_rounds != max_round {
            issues.push(
                join(path, "totalRounds"),
                format!("is {} but the highest round is {max_round}", self.total_rounds),
            );
        }

        let list = join(path, "fixtures");
        let mut seen = HashSet::new();
        for (i, fixture) in self.fixtures.iter().enumerate() {
            let at = index(&list, i);
            fixture.check(&at, issues);
            if !seen.insert(fixture.key()) {
                issues.push(at, "duplicate (round, homeTeamId, awayTeamId)");
            }
        }
    }
}
