//! Club resolution: mapping a scraped team to a canonical club.
//!
//! Resolution is ordered and first-match-wins:
//!
//! 1. exact logo URL (provider-issued and stable),
//! 2. exact normalized name against each club's `name` and `displayName`,
//!
//! and never guesses beyond that. A miss is a data-completeness problem to
//! fix by re-running the club crawl and sync.

use std::collections::HashMap;

use touchline_core::model::{Club, ClubSet};

use crate::error::{PipelineError, PipelineResult};

const SENIORS_SUFFIX: &str = "Seniors";

/// Normalize a team or club name for matching: trim, then drop a trailing
/// "Seniors" and the whitespace before it.
#[must_use]
pub fn normalize_name(name: &str) -> &str {
    let trimmed = name.trim();
    trimmed
        .strip_suffix(SENIORS_SUFFIX)
        .map_or(trimmed, str::trim_end)
}

/// An immutable lookup table over the canonical club list.
///
/// Built once per run and shared by reference with the transformer.
#[derive(Debug, Clone, Default)]
pub struct ClubDirectory {
    by_logo: HashMap<String, String>,
    by_name: HashMap<String, String>,
    len: usize,
}

impl ClubDirectory {
    /// Index `clubs`. When two clubs share a key, the earlier one wins.
    #[must_use]
    pub fn new(clubs: &[Club]) -> Self {
        let mut by_logo = HashMap::new();
        let mut by_name = HashMap::new();
        for club in clubs {
            if !club.logo_url.is_empty() {
                by_logo
                    .entry(club.logo_url.clone())
                    .or_insert_with(|| club.external_id.clone());
            }
            for name in [&club.name, &club.display_name] {
                let key = normalize_name(name);
                if !key.is_empty() {
                    by_name
                        .entry(key.to_string())
                        .or_insert_with(|| club.external_id.clone());
                }
            }
        }
        Self {
            by_logo,
            by_name,
            len: clubs.len(),
        }
    }

    #[must_use]
    pub fn from_set(set: &ClubSet) -> Self {
        Self::new(&set.clubs)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Resolve a scraped team to a club `externalId`.
    ///
    /// # Errors
    /// Returns [`PipelineError::ClubNotFound`] when neither the logo nor the
    /// normalized name matches.
    pub fn resolve(&self, team_name: &str, logo_url: &str) -> PipelineResult<&str> {
        if !logo_url.is_empty() {
            if let Some(id) = self.by_logo.get(logo_url) {
                return Ok(id.as_str());
            }
        }
        if let Some(id) = self.by_name.get(normalize_name(team_name)) {
            log::debug!("Resolved {:?} by name (logo {:?} unknown)", team_name, logo_url);
            return Ok(id.as_str());
        }
        Err(PipelineError::ClubNotFound {
            team_name: team_name.to_string(),
            logo_url: logo_url.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn club(id: &str, name: &str, logo: &str) -> Club {
        Club::new(id, name, logo)
    }

    fn directory() -> ClubDirectory {
        ClubDirectory::new(&[
            club("zebras", "Brunswick Zebras", "https://cdn.example.com/zebras.png"),
            club("city", "Northcote City", "https://cdn.example.com/city.png")
                .with_display_name("Northcote City FC"),
        ])
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Northcote City Seniors"), "Northcote City");
        assert_eq!(normalize_name("  Northcote City  "), "Northcote City");
        assert_eq!(normalize_name("Northcote City Seniors  "), "Northcote City");
        assert_eq!(normalize_name("Seniors"), "");
        assert_eq!(normalize_name("Seniors United"), "Seniors United");
    }

    #[test]
    fn test_resolve_by_logo() {
        let dir = directory();
        let id = dir
            .resolve("Some Other Name", "https://cdn.example.com/city.png")
            .unwrap();
        assert_eq!(id, "city");
    }

    #[test]
    fn test_resolve_by_name_with_seniors_suffix() {
        let dir = directory();
        assert_eq!(dir.resolve("Brunswick Zebras Seniors", "").unwrap(), "zebras");
    }

    #[test]
    fn test_resolve_by_display_name() {
        let dir = directory();
        let id = dir
            .resolve("Northcote City FC", "https://cdn.example.com/unknown.png")
            .unwrap();
        assert_eq!(id, "city");
    }

    #[test]
    fn test_logo_match_wins_over_name_match() {
        let dir = directory();
        // Name points at zebras, logo points at city: the logo wins.
        let id = dir
            .resolve("Brunswick Zebras", "https://cdn.example.com/city.png")
            .unwrap();
        assert_eq!(id, "city");
    }

    #[test]
    fn test_resolve_miss_is_an_error() {
        let dir = directory();
        let err = dir
            .resolve("Moreland Smashers", "https://cdn.example.com/smashers.png")
            .unwrap_err();
        match err {
            PipelineError::ClubNotFound {
                team_name,
                logo_url,
            } => {
                assert_eq!(team_name, "Moreland Smashers");
                assert_eq!(logo_url, "https://cdn.example.com/smashers.png");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let dir = directory();
        assert!(dir.resolve("brunswick zebras", "").is_err());
    }

    #[test]
    fn test_first_club_wins_on_shared_key() {
        let dir = ClubDirectory::new(&[
            club("first", "Twin", "https://cdn.example.com/a.png"),
            club("second", "Twin", "https://cdn.example.com/b.png"),
        ]);
        assert_eq!(dir.resolve("Twin", "").unwrap(), "first");
        assert_eq!(dir.len(), 2);
    }
}
