use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A single schema violation, located by a JSON-ish path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Every violation found while validating one payload or record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    /// What was being validated (e.g. "fixtures chunk 3", "canonical clubs").
    pub subject: String,
    pub issues: Vec<Issue>,
}

impl ValidationError {
    #[must_use]
    pub fn new(subject: impl Into<String>, issues: Vec<Issue>) -> Self {
        Self {
            subject: subject.into(),
            issues,
        }
    }

    /// Wrap a deserialization failure as a single-issue validation error.
    ///
    /// Errors raised while reading text carry a position; errors raised
    /// from an in-memory `Value` do not (serde_json reports line 0).
    #[must_use]
    pub fn from_parse(subject: impl Into<String>, err: &serde_json::Error) -> Self {
        let path = if err.line() == 0 {
            String::new()
        } else {
            format!("line {} column {}", err.line(), err.column())
        };
        Self::new(
            subject,
            vec![Issue {
                path,
                message: err.to_string(),
            }],
        )
    }

    /// Re-label the error, e.g. once the file it came from is known.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "validation failed for {} ({} issue{})",
            self.subject,
            self.issues.len(),
            if self.issues.len() == 1 { "" } else { "s" }
        )?;
        for issue in &self.issues {
            write!(f, "\n  - {issue}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_issue() {
        let err = ValidationError::new(
            "club",
            vec![
                Issue {
                    path: "externalId".to_string(),
                    message: "must not be empty".to_string(),
                },
                Issue {
                    path: "logoUrl".to_string(),
                    message: "must be an http(s) URL".to_string(),
                },
            ],
        );
        let text = err.to_string();
        assert!(text.starts_with("validation failed for club (2 issues)"));
        assert!(text.contains("externalId: must not be empty"));
        assert!(text.contains("logoUrl: must be an http(s) URL"));
    }

    #[test]
    fn test_validation_error_from_parse() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ValidationError::from_parse("chunk-1.json", &parse_err);
        assert_eq!(err.issues.len(), 1);
        assert!(err.issues[0].path.starts_with("line 1"));
    }
}
