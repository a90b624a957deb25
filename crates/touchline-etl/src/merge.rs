//! Deduplication, ordering and merge of canonical records.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use deunicode::deunicode;

use touchline_core::model::{Club, Fixture};

/// Drop repeated `(round, homeTeamId, awayTeamId)` fixtures, keeping the
/// first occurrence. Returns the survivors and the number dropped.
#[must_use]
pub fn dedupe_fixtures(fixtures: Vec<Fixture>) -> (Vec<Fixture>, usize) {
    let mut seen = HashSet::with_capacity(fixtures.len());
    let before = fixtures.len();
    let kept: Vec<Fixture> = fixtures
        .into_iter()
        .filter(|f| seen.insert(f.key()))
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

/// Order fixtures by round, then by date. Dates are fixed-width
/// `YYYY-MM-DD`, so string order is calendar order.
pub fn sort_fixtures(fixtures: &mut [Fixture]) {
    fixtures.sort_by(|a, b| a.round.cmp(&b.round).then_with(|| a.date.cmp(&b.date)));
}

/// Primary sort key of a name: transliterated to ASCII, then lowercased,
/// so `Éire` files with `Eire`.
fn fold_name(name: &str) -> String {
    deunicode(name).to_lowercase()
}

/// Accent- and case-insensitive name order. Ties break on the lowercased
/// original, then the original, so the result does not depend on input
/// order.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    fold_name(a)
        .cmp(&fold_name(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

pub fn sort_clubs(clubs: &mut [Club]) {
    clubs.sort_by(|a, b| {
        compare_names(&a.name, &b.name).then_with(|| a.external_id.cmp(&b.external_id))
    });
}

/// Outcome counts of a club merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Incoming clubs with no existing record.
    pub added: usize,
    /// Incoming clubs that replaced an existing record.
    pub updated: usize,
    /// Existing clubs absent from the incoming set, kept as they were.
    pub preserved: usize,
}

/// Merge incoming clubs into the existing canonical set by `externalId`.
///
/// Incoming data always wins for a shared id; existing-only clubs are kept
/// untouched. The result is sorted by name.
#[must_use]
pub fn merge_clubs(existing: Vec<Club>, incoming: Vec<Club>) -> (Vec<Club>, MergeStats) {
    let mut by_id: HashMap<String, Club> = existing
        .into_iter()
        .map(|c| (c.external_id.clone(), c))
        .collect();
    let existing_count = by_id.len();

    let mut stats = MergeStats::default();
    let mut incoming_ids = HashSet::new();
    for club in incoming {
        if !incoming_ids.insert(club.external_id.clone()) {
            log::warn!(
                "Club {} appears more than once in the payload; keeping the last entry",
                club.external_id
            );
        } else if by_id.contains_key(&club.external_id) {
            stats.updated += 1;
        } else {
            stats.added += 1;
        }
        by_id.insert(club.external_id.clone(), club);
    }
    stats.preserved = existing_count - stats.updated;

    let mut merged: Vec<Club> = by_id.into_values().collect();
    sort_clubs(&mut merged);
    (merged, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(round: u32, date: &str, home: &str, away: &str) -> Fixture {
        Fixture {
            round,
            date: date.to_string(),
            day: String::new(),
            time: "15:00".to_string(),
            home_team_id: home.to_string(),
            away_team_id: away.to_string(),
            address: "Oval".to_string(),
            coordinates: "-37.8,144.9".to_string(),
        }
    }

    fn club(id: &str, name: &str) -> Club {
        Club::new(id, name, format!("https://cdn.example.com/{id}.png"))
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let (kept, dropped) = dedupe_fixtures(vec![
            fixture(1, "2025-04-05", "x", "y"),
            fixture(1, "2025-04-06", "x", "y"),
            fixture(1, "2025-04-05", "y", "x"),
        ]);
        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].date, "2025-04-05");
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let input = vec![
            fixture(2, "2025-04-12", "a", "b"),
            fixture(2, "2025-04-12", "a", "b"),
        ];
        let (once, _) = dedupe_fixtures(input);
        let (twice, dropped) = dedupe_fixtures(once.clone());
        assert_eq!(once, twice);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn test_sort_by_round_then_date() {
        let mut fixtures = vec![
            fixture(2, "2025-04-01", "a", "b"),
            fixture(1, "2025-04-20", "c", "d"),
            fixture(1, "2025-04-05", "e", "f"),
        ];
        sort_fixtures(&mut fixtures);
        let order: Vec<(u32, &str)> = fixtures.iter().map(|f| (f.round, f.date.as_str())).collect();
        assert_eq!(
            order,
            vec![(1, "2025-04-05"), (1, "2025-04-20"), (2, "2025-04-01")]
        );
    }

    #[test]
    fn test_merge_additive() {
        let existing = vec![club("a", "Alpha"), club("b", "Bravo")];
        let mut updated_a = club("a", "Alpha Rovers");
        updated_a.phone = Some("0400 000 000".to_string());

        let (merged, stats) = merge_clubs(existing, vec![updated_a.clone()]);
        assert_eq!(merged, vec![updated_a, club("b", "Bravo")]);
        assert_eq!(
            stats,
            MergeStats {
                added: 0,
                updated: 1,
                preserved: 1
            }
        );
    }

    #[test]
    fn test_merge_into_empty() {
        let (merged, stats) = merge_clubs(Vec::new(), vec![club("z", "Zulu")]);
        assert_eq!(merged.len(), 1);
        assert_eq!(stats.added, 1);
        assert_eq!(stats.updated, 0);
        assert_eq!(stats.preserved, 0);
    }

    #[test]
    fn test_merge_sorts_by_name_case_insensitively() {
        let (merged, _) = merge_clubs(
            vec![club("1", "bravo")],
            vec![club("2", "Charlie"), club("3", "Alpha")],
        );
        let names: Vec<&str> = merged.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "bravo", "Charlie"]);
    }

    #[test]
    fn test_merge_sorts_accented_names_with_their_base_letter() {
        let (merged, _) = merge_clubs(
            vec![club("1", "Zebras FC")],
            vec![club("2", "Éire United"), club("3", "Eagles")],
        );
        let names: Vec<&str> = merged.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Eagles", "Éire United", "Zebras FC"]);
    }

    #[test]
    fn test_compare_names_orders_accent_variants_deterministically() {
        assert_eq!(compare_names("Eire", "Éire"), Ordering::Less);
        assert_eq!(compare_names("Éire", "Eire"), Ordering::Greater);
        assert_eq!(compare_names("Éire", "Éire"), Ordering::Equal);
    }

    #[test]
    fn test_merge_repeated_incoming_id_counts_once() {
        let (merged, stats) = merge_clubs(
            Vec::new(),
            vec![club("a", "Alpha"), club("a", "Alpha FC")],
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "Alpha FC");
        assert_eq!(stats.added, 1);
    }
}
