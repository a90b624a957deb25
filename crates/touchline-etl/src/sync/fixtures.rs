use std::path::PathBuf;

use touchline_core::model::{ClubSet, FixtureData};
use touchline_core::provider::FixturesPage;
use touchline_core::store;

use crate::crawl::fixtures::current_season;
use crate::error::{PipelineError, PipelineResult};
use crate::layout::DataLayout;
use crate::merge::{dedupe_fixtures, sort_fixtures};
use crate::resolver::ClubDirectory;
use crate::sync::read_input;
use crate::transform::FixtureTransformer;

/// Outcome of syncing one team.
#[derive(Debug, Clone)]
pub struct FixtureSyncReport {
    pub team: String,
    pub chunks: usize,
    /// Fixtures read from the chunks, before any were skipped.
    pub scraped: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub total_fixtures: usize,
    pub total_rounds: u32,
    pub path: PathBuf,
}

/// Counters gathered while building a team's fixture data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub scraped: usize,
    pub skipped: usize,
    pub duplicates: usize,
}

/// Transform, dedupe and order the fixtures of a crawl's pages.
///
/// Fixtures that fail for a record-level reason (unknown club, malformed
/// round or date, invalid output) are logged and skipped. Competition and
/// season come from the first fixture that transforms.
///
/// # Errors
/// Returns [`PipelineError::NoFixtures`] when nothing transforms, or the
/// first error that is not record-level.
pub fn build_fixture_data(
    pages: &[FixturesPage],
    clubs: &ClubDirectory,
    team: &str,
) -> PipelineResult<(FixtureData, BuildStats)> {
    let transformer = FixtureTransformer::new(clubs);
    let mut stats = BuildStats::default();
    let mut header: Option<(String, i32)> = None;
    let mut fixtures = Vec::new();

    for external in pages.iter().flat_map(|p| &p.fixtures) {
        stats.scraped += 1;
        match transformer.transform(external) {
            Ok(fixture) => {
                if header.is_none() {
                    let season = fixture.year().unwrap_or_else(current_season);
                    header = Some((external.attributes.competition_name.clone(), season));
                }
                fixtures.push(fixture);
            }
            Err(e) if e.is_skippable() => {
                log::warn!("Skipping fixture {}: {e}", external.id);
                stats.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    let Some((competition, season)) = header else {
        return Err(PipelineError::NoFixtures {
            team: team.to_string(),
        });
    };

    let (mut fixtures, duplicates) = dedupe_fixtures(fixtures);
    if duplicates > 0 {
        log::info!("Dropped {duplicates} duplicate fixtures for {team}");
    }
    stats.duplicates = duplicates;
    sort_fixtures(&mut fixtures);

    Ok((FixtureData::new(competition, season, fixtures), stats))
}

/// Fixture sync bound to one data directory and its canonical clubs.
#[derive(Debug)]
pub struct FixtureSync {
    layout: DataLayout,
    clubs: ClubDirectory,
}

impl FixtureSync {
    /// Load the canonical club file.
    ///
    /// # Errors
    /// Returns [`PipelineError::MissingInput`] when clubs were never synced,
    /// or a validation error when the club file is invalid.
    pub fn load(layout: &DataLayout) -> PipelineResult<Self> {
        let set: ClubSet = read_input(
            &layout.clubs_file(),
            "run `touchline crawl clubs` and `touchline sync clubs` first",
        )?;
        let clubs = ClubDirectory::from_set(&set);
        log::debug!("Loaded {} clubs for resolution", clubs.len());
        Ok(Self {
            layout: layout.clone(),
            clubs,
        })
    }

    /// Sync one team's crawl into its canonical fixture file.
    ///
    /// The output file is only replaced when the whole result validates.
    ///
    /// # Errors
    /// Returns [`PipelineError::MissingInput`] when the team was never
    /// crawled, a validation error naming the chunk when a chunk is not a
    /// valid fixtures page, or [`PipelineError::NoFixtures`].
    pub fn run(&self, team: &str) -> PipelineResult<FixtureSyncReport> {
        let chunks = self.layout.chunk_files(team)?;
        if chunks.is_empty() {
            return Err(PipelineError::MissingInput {
                path: self.layout.external_fixtures_dir(team),
                hint: format!("no chunk files; run `touchline crawl fixtures --team {team} --league <name>`"),
            });
        }

        let mut pages = Vec::with_capacity(chunks.len());
        for (_, path) in &chunks {
            let raw = store::read_raw(path)?;
            pages.push(FixturesPage::from_value(&raw, &path.display().to_string())?);
        }
        log::info!("Read {} chunks for {team}", pages.len());

        let (data, stats) = build_fixture_data(&pages, &self.clubs, team)?;
        let path = self.layout.matches_file(team);
        store::write_json(&path, &data)?;
        log::info!(
            "Wrote {} fixtures over {} rounds to {}",
            data.total_fixtures,
            data.total_rounds,
            path.display()
        );

        Ok(FixtureSyncReport {
            team: team.to_string(),
            chunks: chunks.len(),
            scraped: stats.scraped,
            skipped: stats.skipped,
            duplicates: stats.duplicates,
            total_fixtures: data.total_fixtures,
            total_rounds: data.total_rounds,
            path,
        })
    }
}

/// Sync one team.
///
/// # Errors
/// See [`FixtureSync::load`] and [`FixtureSync::run`].
pub fn sync_fixtures(layout: &DataLayout, team: &str) -> PipelineResult<FixtureSyncReport> {
    FixtureSync::load(layout)?.run(team)
}

/// Sync every crawled team, carrying on past per-team failures.
///
/// # Errors
/// Fails outright only when the club file cannot be loaded; per-team
/// failures are returned alongside the team slug.
pub fn sync_all_fixtures(
    layout: &DataLayout,
) -> PipelineResult<Vec<(String, PipelineResult<FixtureSyncReport>)>> {
    let sync = FixtureSync::load(layout)?;
    let teams = layout.crawled_teams();
    if teams.is_empty() {
        log::warn!("No crawled teams under {}", layout.external_fixtures_root().display());
    }
    Ok(teams
        .into_iter()
        .map(|team| {
            let result = sync.run(&team);
            if let Err(e) = &result {
                log::error!("Sync failed for {team}: {e}");
            }
            (team, result)
        })
        .collect())
}
