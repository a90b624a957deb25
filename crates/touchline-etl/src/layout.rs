//! Where every artifact lives under the data directory.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::error::{PipelineError, PipelineResult};

static CHUNK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^chunk-(\d+)\.json$").expect("chunk pattern"));

/// Paths of the raw and canonical artifacts under one data root.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Raw club list as captured from the provider.
    #[must_use]
    pub fn external_clubs_file(&self) -> PathBuf {
        self.root.join("external").join("clubs").join("clubs.json")
    }

    #[must_use]
    pub fn external_fixtures_root(&self) -> PathBuf {
        self.root.join("external").join("fixtures")
    }

    /// Directory of one team's raw fixture pages.
    #[must_use]
    pub fn external_fixtures_dir(&self, team: &str) -> PathBuf {
        self.external_fixtures_root().join(team)
    }

    #[must_use]
    pub fn chunk_file(&self, team: &str, index: usize) -> PathBuf {
        self.external_fixtures_dir(team)
            .join(format!("chunk-{index}.json"))
    }

    /// Canonical club list.
    #[must_use]
    pub fn clubs_file(&self) -> PathBuf {
        self.root.join("clubs").join("clubs.json")
    }

    #[must_use]
    pub fn matches_dir(&self) -> PathBuf {
        self.root.join("matches")
    }

    /// Canonical fixture file of one team.
    #[must_use]
    pub fn matches_file(&self, team: &str) -> PathBuf {
        self.matches_dir().join(format!("{team}.json"))
    }

    /// A team's chunk files in numeric order (`chunk-2` before `chunk-10`).
    ///
    /// # Errors
    /// Returns [`PipelineError::MissingInput`] when the team has never been
    /// crawled.
    pub fn chunk_files(&self, team: &str) -> PipelineResult<Vec<(usize, PathBuf)>> {
        let dir = self.external_fixtures_dir(team);
        if !dir.is_dir() {
            return Err(PipelineError::MissingInput {
                path: dir,
                hint: format!("run `touchline crawl fixtures --team {team} --league <name>` first"),
            });
        }
        Ok(list_chunks(&dir))
    }

    /// Teams with a raw fixtures directory, sorted by slug.
    #[must_use]
    pub fn crawled_teams(&self) -> Vec<String> {
        let mut teams: Vec<String> = WalkDir::new(self.external_fixtures_root())
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_dir())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        teams.sort();
        teams
    }

    /// Teams with a canonical fixture file, sorted by slug.
    #[must_use]
    pub fn synced_teams(&self) -> Vec<String> {
        let mut teams: Vec<String> = WalkDir::new(self.matches_dir())
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let path = e.path();
                if path.extension()? != "json" {
                    return None;
                }
                path.file_stem().map(|s| s.to_string_lossy().into_owned())
            })
            .collect();
        teams.sort();
        teams
    }
}

/// Parse the numeric index out of a `chunk-<n>.json` file name.
#[must_use]
pub fn chunk_index(file_name: &str) -> Option<usize> {
    CHUNK_RE
        .captures(file_name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// `chunk-<n>.json` files directly inside `dir`, in numeric order.
pub(crate) fn list_chunks(dir: &Path) -> Vec<(usize, PathBuf)> {
    let mut chunks: Vec<(usize, PathBuf)> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let index = chunk_index(&e.file_name().to_string_lossy())?;
            Some((index, e.into_path()))
        })
        .collect();
    chunks.sort_by_key(|(index, _)| *index);
    chunks
}
