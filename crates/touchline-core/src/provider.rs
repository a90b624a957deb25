//! The fixtures provider's JSON:API payloads.
//!
//! Every page the provider returns is a `{ data: [...], links, meta }`
//! envelope whose resources carry a `type` discriminator. Resources are
//! modelled as a tagged enum so that an envelope of the wrong kind, or a
//! resource missing required attributes, is rejected before any transform
//! logic runs.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::validate::{index, join, Issues, Validate};

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// A JSON:API top-level document.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub data: Vec<Resource>,
    #[serde(default)]
    pub links: Option<Links>,
    #[serde(default)]
    pub meta: Option<Value>,
}

/// Pagination links of a document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

/// A resource object, discriminated by its `type` member.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Resource {
    #[serde(rename = "fixtures")]
    Fixture(ExternalFixture),
    #[serde(rename = "clubs")]
    Club(ExternalClub),
}

impl Resource {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fixture(_) => "fixtures",
            Self::Club(_) => "clubs",
        }
    }
}

/// A latitude or longitude; the provider sends either JSON numbers or
/// numeric strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    /// The finite numeric value, if there is one.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        let v = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
        };
        v.is_finite().then_some(v)
    }

    /// The value as the provider wrote it, if it is a finite number.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        self.value()?;
        Some(match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// One scraped fixture.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalFixture {
    pub id: String,
    pub attributes: FixtureAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureAttributes {
    /// Kick-off instant, RFC 3339 (the provider sends UTC).
    pub date: String,
    /// Round code, e.g. `"R7"`.
    pub round: String,
    pub competition_name: String,
    #[serde(default)]
    pub league_name: Option<String>,
    pub home_team_name: String,
    #[serde(default)]
    pub home_logo: Option<String>,
    pub away_team_name: String,
    #[serde(default)]
    pub away_logo: Option<String>,
    pub ground_name: String,
    #[serde(default)]
    pub field_name: Option<String>,
    pub ground_latitude: Coordinate,
    pub ground_longitude: Coordinate,
}

impl Validate for ExternalFixture {
    fn subject(&self) -> String {
        format!("external fixture {}", self.id)
    }

    fn check(&self, path: &str, issues: &mut Issues) {
        let a = &self.attributes;
        let attrs = join(path, "attributes");
        issues.require_text(&join(path, "id"), &self.id);
        issues.require_text(&join(&attrs, "date"), &a.date);
        issues.require_text(&join(&attrs, "round"), &a.round);
        issues.require_text(&join(&attrs, "competition_name"), &a.competition_name);
        issues.require_text(&join(&attrs, "home_team_name"), &a.home_team_name);
        issues.require_text(&join(&attrs, "away_team_name"), &a.away_team_name);
        issues.require_text(&join(&attrs, "ground_name"), &a.ground_name);
        if a.ground_latitude.value().is_none() {
            issues.push(join(&attrs, "ground_latitude"), "must be a finite number");
        }
        if a.ground_longitude.value().is_none() {
            issues.push(join(&attrs, "ground_longitude"), "must be a finite number");
        }
    }
}

/// A validated page of fixtures.
#[derive(Debug, Clone)]
pub struct FixturesPage {
    pub fixtures: Vec<ExternalFixture>,
    pub links: Links,
}

impl FixturesPage {
    /// Parse and validate one raw provider response.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when the envelope does not deserialize,
    /// carries non-fixture resources, or a fixture lacks required attributes.
    pub fn from_value(raw: &Value, subject: &str) -> Result<Self, ValidationError> {
        let doc = Document::deserialize(raw).map_err(|e| ValidationError::from_parse(subject, &e))?;
        Self::from_document(doc, subject)
    }

    /// Validate an already deserialized document.
    ///
    /// # Errors
    /// See [`FixturesPage::from_value`].
    pub fn from_document(doc: Document, subject: &str) -> Result<Self, ValidationError> {
        let mut issues = Issues::new();
        let mut fixtures = Vec::with_capacity(doc.data.len());
        for (i, resource) in doc.data.into_iter().enumerate() {
            let at = index("data", i);
            match resource {
                Resource::Fixture(f) => {
                    f.check(&at, &mut issues);
                    fixtures.push(f);
                }
                other => issues.push(
                    join(&at, "type"),
                    format!("expected \"fixtures\", got {:?}", other.kind()),
                ),
            }
        }
        issues.finish(subject)?;
        Ok(Self {
            fixtures,
            links: doc.links.unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Clubs
// ---------------------------------------------------------------------------

/// One scraped club.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalClub {
    pub id: String,
    pub attributes: ClubAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClubAttributes {
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    /// Logo URL.
    pub image: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Club website.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub address_line_1: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub socials: Vec<ExternalSocial>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalSocial {
    /// Platform name, e.g. `"facebook"`.
    pub name: String,
    /// Profile URL.
    pub value: String,
}

impl Validate for ExternalClub {
    fn subject(&self) -> String {
        format!("external club {}", self.id)
    }

    fn check(&self, path: &str, issues: &mut Issues) {
        let attrs = join(path, "attributes");
        issues.require_text(&join(path, "id"), &self.id);
        issues.require_text(&join(&attrs, "name"), &self.attributes.name);
        issues.require_url(&join(&attrs, "image"), &self.attributes.image);
    }
}

/// A validated club list payload.
#[derive(Debug, Clone)]
pub struct ClubsPage {
    pub clubs: Vec<ExternalClub>,
}

impl ClubsPage {
    /// Parse and validate a raw club list response.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when the envelope does not deserialize,
    /// carries non-club resources, or a club lacks required attributes.
    pub fn from_value(raw: &Value, subject: &str) -> Result<Self, ValidationError> {
        let doc = Document::deserialize(raw).map_err(|e| ValidationError::from_parse(subject, &e))?;
        let mut issues = Issues::new();
        let mut clubs = Vec::with_capacity(doc.data.len());
        for (i, resource) in doc.data.into_iter().enumerate() {
            let at = index("data", i);
            match resource {
                Resource::Club(c) => {
                    c.check(&at, &mut issues);
                    clubs.push(c);
                }
                other => issues.push(
                    join(&at, "type"),
                    format!("expected \"clubs\", got {:?}", other.kind()),
                ),
            }
        }
        issues.finish(subject)?;
        Ok(Self { clubs })
    }
}
