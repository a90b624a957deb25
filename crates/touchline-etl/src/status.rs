//! Inventory of what has been crawled and synced.

use std::collections::BTreeSet;

use touchline_core::model::{ClubSet, FixtureData};
use touchline_core::store;

use crate::error::PipelineResult;
use crate::layout::{list_chunks, DataLayout};

/// Crawl and sync state of one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamStatus {
    pub team: String,
    pub chunks: usize,
    /// `(total fixtures, total rounds)` of the canonical file, if synced.
    pub synced: Option<(usize, u32)>,
}

/// Snapshot of a data directory.
#[derive(Debug, Clone)]
pub struct Status {
    pub raw_clubs: bool,
    pub clubs: Option<usize>,
    pub teams: Vec<TeamStatus>,
}

impl Status {
    /// Inspect `layout`.
    ///
    /// # Errors
    /// Returns an error when a canonical file exists but cannot be read or
    /// fails validation.
    pub fn collect(layout: &DataLayout) -> PipelineResult<Self> {
        let raw_clubs = layout.external_clubs_file().is_file();
        let clubs = store::read_json_opt::<ClubSet>(&layout.clubs_file())?.map(|set| set.len());

        let names: BTreeSet<String> = layout
            .crawled_teams()
            .into_iter()
            .chain(layout.synced_teams())
            .collect();

        let mut teams = Vec::with_capacity(names.len());
        for team in names {
            let chunks = list_chunks(&layout.external_fixtures_dir(&team)).len();
            let synced = store::read_json_opt::<FixtureData>(&layout.matches_file(&team))?
                .map(|data| (data.total_fixtures, data.total_rounds));
            teams.push(TeamStatus {
                team,
                chunks,
                synced,
            });
        }

        Ok(Self {
            raw_clubs,
            clubs,
            teams,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_empty_data_dir() {
        let dir = TempDir::new().unwrap();
        let status = Status::collect(&DataLayout::new(dir.path())).unwrap();
        assert!(!status.raw_clubs);
        assert_eq!(status.clubs, None);
        assert!(status.teams.is_empty());
    }

    #[test]
    fn test_crawled_but_not_synced() {
        let dir = TempDir::new().unwrap();
        let layout = DataLayout::new(dir.path());
        store::write_raw(&layout.chunk_file("u18", 1), &json!({ "data": [] })).unwrap();
        store::write_raw(&layout.chunk_file("u18", 2), &json!({ "data": [] })).unwrap();
        store::write_json(&layout.clubs_file(), &ClubSet::default()).unwrap();

        let status = Status::collect(&layout).unwrap();
        assert_eq!(status.clubs, Some(0));
        assert_eq!(
            status.teams,
            vec![TeamStatus {
                team: "u18".to_string(),
                chunks: 2,
                synced: None,
            }]
        );
    }
}
