use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::validate::{index, join, Issues, Validate};

/// Postal address of a club's home ground or office.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postcode: String,
}

impl Address {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.street.is_empty()
            && self.city.is_empty()
            && self.state.is_empty()
            && self.postcode.is_empty()
    }
}

/// A social media profile link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
    pub platform: String,
    pub url: String,
}

/// A canonical club record.
///
/// `external_id` is the fixtures provider's stable identifier and the
/// primary key of the canonical club set. Fixtures reference clubs by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub external_id: String,
    pub name: String,
    pub display_name: String,
    pub logo_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub socials: Vec<Social>,
}

impl Club {
    #[must_use]
    pub fn new(
        external_id: impl Into<String>,
        name: impl Into<String>,
        logo_url: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            external_id: external_id.into(),
            display_name: name.clone(),
            name,
            logo_url: logo_url.into(),
            email: None,
            phone: None,
            website: None,
            address: None,
            socials: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }
}

impl Validate for Club {
    fn subject(&self) -> String {
        format!("club {:?}", self.external_id)
    }

    fn check(&self, path: &str, issues: &mut Issues) {
        issues.require_text(&join(path, "externalId"), &self.external_id);
        issues.require_text(&join(path, "name"), &self.name);
        issues.require_text(&join(path, "displayName"), &self.display_name);
        issues.require_url(&join(path, "logoUrl"), &self.logo_url);

        if let Some(website) = &self.website {
            issues.require_url(&join(path, "website"), website);
        }
        for (i, social) in self.socials.iter().enumerate() {
            let at = index(&join(path, "socials"), i);
            issues.require_text(&join(&at, "platform"), &social.platform);
            issues.require_url(&join(&at, "url"), &social.url);
        }
    }
}

/// The canonical club list, unique by `externalId`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubSet {
    pub clubs: Vec<Club>,
}

impl ClubSet {
    #[must_use]
    pub fn new(clubs: Vec<Club>) -> Self {
        Self { clubs }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clubs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clubs.is_empty()
    }

    #[must_use]
    pub fn find(&self, external_id: &str) -> Option<&Club> {
        self.clubs.iter().find(|c| c.external_id == external_id)
    }
}

impl Validate for ClubSet {
    fn subject(&self) -> String {
        "canonical clubs".to_string()
    }

    fn check(&self, path: &str, issues: &mut Issues) {
        let list = join(path, "clubs");
        let mut seen = HashSet::new();
        for (i, club) in self.clubs.iter().enumerate() {
            let at = index(&list, i);
            club.check(&at, issues);
            if !seen.insert(club.external_id.as_str()) {
                issues.push(
                    join(&at, "externalId"),
                    format!("duplicate externalId {:?}", club.external_id),
                );
            }
        }
    }
}
