use std::path::PathBuf;

use touchline_core::model::{Club, ClubSet};
use touchline_core::provider::ClubsPage;
use touchline_core::store;

use crate::error::PipelineResult;
use crate::layout::DataLayout;
use crate::merge::{merge_clubs, MergeStats};
use crate::sync::read_raw_input;
use crate::transform::club_from_external;

/// Outcome of a club sync.
#[derive(Debug, Clone)]
pub struct ClubSyncReport {
    pub stats: MergeStats,
    pub total: usize,
    pub path: PathBuf,
}

/// Merge the crawled club list into the canonical club file.
///
/// Crawled clubs replace canonical clubs with the same `externalId`;
/// canonical clubs the crawl did not return are kept. A missing canonical
/// file is a first run, not an error.
///
/// # Errors
/// Returns [`PipelineError::MissingInput`](crate::PipelineError::MissingInput)
/// when no club crawl exists, or a validation error for an invalid crawl
/// or canonical file. Nothing is written unless the merged set validates.
pub fn sync_clubs(layout: &DataLayout) -> PipelineResult<ClubSyncReport> {
    let source = layout.external_clubs_file();
    let raw = read_raw_input(&source, "run `touchline crawl clubs` first")?;
    let page = ClubsPage::from_value(&raw, &source.display().to_string())?;
    let incoming: Vec<Club> = page.clubs.iter().map(club_from_external).collect();
    log::info!("Read {} clubs from {}", incoming.len(), source.display());

    let path = layout.clubs_file();
    let existing = store::read_json_opt::<ClubSet>(&path)?.unwrap_or_default();
    if existing.is_empty() {
        log::info!("No canonical clubs yet at {}", path.display());
    }

    let (merged, stats) = merge_clubs(existing.clubs, incoming);
    let set = ClubSet::new(merged);
    store::write_json(&path, &set)?;

    log::info!(
        "Clubs: {} new, {} updated, {} preserved ({} total)",
        stats.added,
        stats.updated,
        stats.preserved,
        set.len()
    );
    Ok(ClubSyncReport {
        stats,
        total: set.len(),
        path,
    })
}
