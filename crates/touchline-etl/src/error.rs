//! Pipeline error types.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors raised by the crawl and sync stages.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No canonical club matches a scraped team.
    #[error("no club matches team {team_name:?} (logo {logo_url:?})")]
    ClubNotFound { team_name: String, logo_url: String },

    /// A round code that is not `R<number>`.
    #[error("invalid round code {0:?}, expected R<number>")]
    InvalidRound(String),

    /// A kick-off timestamp that is not RFC 3339.
    #[error("invalid fixture date {value:?}: {message}")]
    InvalidDate { value: String, message: String },

    /// A bounded browser wait ran out.
    #[error("timed out after {after:?} waiting for {waiting_for}")]
    Timeout {
        waiting_for: String,
        after: Duration,
    },

    /// The browser or page misbehaved.
    #[error("browser error: {0}")]
    Browser(String),

    /// An expected input file or directory does not exist.
    #[error("{} not found; {hint}", path.display())]
    MissingInput { path: PathBuf, hint: String },

    /// A sync found nothing it could publish.
    #[error("no fixtures could be transformed for team {team}")]
    NoFixtures { team: String },

    /// An error propagated from the core domain layer.
    #[error(transparent)]
    Core(#[from] touchline_core::Error),
}

impl PipelineError {
    /// Returns `true` when the error concerns a single scraped record, so a
    /// batch sync may log it and carry on with the rest.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            Self::ClubNotFound { .. }
                | Self::InvalidRound(_)
                | Self::InvalidDate { .. }
                | Self::Core(touchline_core::Error::Validation(_))
        )
    }

    /// Returns `true` when a browser wait timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub(crate) fn browser(err: impl std::fmt::Display) -> Self {
        Self::Browser(err.to_string())
    }
}

impl From<touchline_core::ValidationError> for PipelineError {
    fn from(err: touchline_core::ValidationError) -> Self {
        Self::Core(err.into())
    }
}

/// Convenience alias for pipeline results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use touchline_core::ValidationError;

    #[test]
    fn test_record_errors_are_skippable() {
        let not_found = PipelineError::ClubNotFound {
            team_name: "Zebras".to_string(),
            logo_url: String::new(),
        };
        assert!(not_found.is_skippable());
        assert!(PipelineError::InvalidRound("Final".to_string()).is_skippable());
        assert!(PipelineError::from(ValidationError::new("fixture", Vec::new())).is_skippable());
    }

    #[test]
    fn test_run_errors_are_fatal() {
        let timeout = PipelineError::Timeout {
            waiting_for: "initial fixtures page".to_string(),
            after: Duration::from_secs(60),
        };
        assert!(!timeout.is_skippable());
        assert!(timeout.is_timeout());

        let missing = PipelineError::MissingInput {
            path: PathBuf::from("data/external/fixtures/u18"),
            hint: "run `touchline crawl fixtures --team u18` first".to_string(),
        };
        assert!(!missing.is_skippable());
        assert!(missing.to_string().contains("crawl fixtures"));
    }

    #[test]
    fn test_club_not_found_message_names_team_and_logo() {
        let err = PipelineError::ClubNotFound {
            team_name: "Zebras".to_string(),
            logo_url: "https://cdn.example.com/z.png".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("Zebras"));
        assert!(text.contains("z.png"));
    }
}
