//! Structural and semantic validation shared by canonical records and
//! provider payloads.
//!
//! Validators collect every violation they find instead of stopping at the
//! first one, so an operator sees the full damage of a malformed payload in
//! a single run.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{Issue, ValidationError};

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("time pattern"));

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("url pattern"));

/// Accumulates issues for one validation pass.
#[derive(Debug, Default)]
pub struct Issues {
    items: Vec<Issue>,
}

impl Issues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.items.push(Issue {
            path: path.into(),
            message: message.into(),
        });
    }

    /// Record an issue when `value` is empty or whitespace only.
    pub fn require_text(&mut self, path: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(path, "must not be empty");
        }
    }

    /// Record an issue when `value` is not an absolute http(s) URL.
    pub fn require_url(&mut self, path: &str, value: &str) {
        if !is_http_url(value) {
            self.push(path, format!("must be an http(s) URL, got {value:?}"));
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Finish the pass: `Ok` when nothing was recorded.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] carrying every recorded issue.
    pub fn finish(self, subject: impl Into<String>) -> Result<(), ValidationError> {
        if self.items.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(subject, self.items))
        }
    }
}

/// A record or payload that can check its own schema.
pub trait Validate {
    /// Name used in error reports when no better subject is known.
    fn subject(&self) -> String;

    /// Record every violation under `path`.
    fn check(&self, path: &str, issues: &mut Issues);

    /// Run [`check`](Self::check) from the root.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] listing every violation.
    fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Issues::new();
        self.check("", &mut issues);
        issues.finish(self.subject())
    }
}

/// Join a parent path and a field name.
#[must_use]
pub fn join(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{parent}.{field}")
    }
}

/// Join a parent path and a list index.
#[must_use]
pub fn index(parent: &str, i: usize) -> String {
    format!("{parent}[{i}]")
}

#[must_use]
pub fn is_http_url(value: &str) -> bool {
    URL_RE.is_match(value)
}

/// Parse a fixed-width `YYYY-MM-DD` date.
#[must_use]
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// `true` for a 24-hour `HH:MM` time.
#[must_use]
pub fn is_hh_mm(value: &str) -> bool {
    TIME_RE.is_match(value)
}
