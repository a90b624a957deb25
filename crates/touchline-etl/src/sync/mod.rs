//! Batch stages that turn raw crawls into the canonical data set.

pub mod clubs;
pub mod fixtures;

pub use clubs::{sync_clubs, ClubSyncReport};
pub use fixtures::{build_fixture_data, sync_all_fixtures, sync_fixtures, FixtureSync, FixtureSyncReport};

use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use touchline_core::{store, Validate};

use crate::error::{PipelineError, PipelineResult};

fn missing(path: &Path, hint: &str, err: touchline_core::Error) -> PipelineError {
    match err {
        touchline_core::Error::Io(e) if e.kind() == ErrorKind::NotFound => {
            PipelineError::MissingInput {
                path: path.to_path_buf(),
                hint: hint.to_string(),
            }
        }
        other => other.into(),
    }
}

/// Read a raw artifact another command is expected to have produced.
pub(crate) fn read_raw_input(path: &Path, hint: &str) -> PipelineResult<Value> {
    store::read_raw(path).map_err(|e| missing(path, hint, e))
}

/// Read a typed artifact another command is expected to have produced.
pub(crate) fn read_input<T: DeserializeOwned + Validate>(path: &Path, hint: &str) -> PipelineResult<T> {
    store::read_json(path).map_err(|e| missing(path, hint, e))
}
