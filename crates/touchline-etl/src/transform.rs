//! Conversion of scraped provider records into canonical records.

use chrono::DateTime;
use chrono_tz::Tz;

use touchline_core::model::{Address, Club, Fixture, Social};
use touchline_core::provider::{Coordinate, ExternalClub, ExternalFixture};
use touchline_core::validate::is_http_url;
use touchline_core::Validate;

use crate::error::{PipelineError, PipelineResult};
use crate::resolver::ClubDirectory;

/// Every kick-off is reported in the venue's zone, whatever the zone of the
/// machine running the sync.
pub const VENUE_TZ: Tz = chrono_tz::Australia::Melbourne;

/// Calendar fields of a kick-off as observed at the venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalKickOff {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// 24-hour `HH:MM`.
    pub time: String,
    /// English weekday name.
    pub day: String,
}

/// Parse a round code such as `"R7"` into its number.
///
/// # Errors
/// Returns [`PipelineError::InvalidRound`] unless the code is `R` followed
/// by decimal digits.
pub fn parse_round(code: &str) -> PipelineResult<u32> {
    code.trim()
        .strip_prefix('R')
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| PipelineError::InvalidRound(code.to_string()))
}

/// Convert a provider instant into venue-local date, time and weekday.
///
/// # Errors
/// Returns [`PipelineError::InvalidDate`] if `instant` is not RFC 3339.
pub fn local_kick_off(instant: &str) -> PipelineResult<LocalKickOff> {
    let parsed = DateTime::parse_from_rfc3339(instant.trim()).map_err(|e| {
        PipelineError::InvalidDate {
            value: instant.to_string(),
            message: e.to_string(),
        }
    })?;
    let local = parsed.with_timezone(&VENUE_TZ);
    Ok(LocalKickOff {
        date: local.format("%Y-%m-%d").to_string(),
        time: local.format("%H:%M").to_string(),
        day: local.format("%A").to_string(),
    })
}

/// Ground name followed by the field name when there is one.
#[must_use]
pub fn format_address(ground: &str, field: Option<&str>) -> String {
    let ground = ground.trim();
    match field.map(str::trim).filter(|f| !f.is_empty()) {
        Some(field) => format!("{ground}, {field}"),
        None => ground.to_string(),
    }
}

#[must_use]
pub fn format_coordinates(lat: &Coordinate, lng: &Coordinate) -> Option<String> {
    Some(format!("{},{}", lat.as_text()?, lng.as_text()?))
}

/// Turns scraped fixtures into canonical fixtures, resolving both teams
/// against a fixed club directory.
#[derive(Debug, Clone, Copy)]
pub struct FixtureTransformer<'a> {
    clubs: &'a ClubDirectory,
}

impl<'a> FixtureTransformer<'a> {
    #[must_use]
    pub fn new(clubs: &'a ClubDirectory) -> Self {
        Self { clubs }
    }

    /// Transform one scraped fixture.
    ///
    /// The result is validated against the canonical schema before it is
    /// returned.
    ///
    /// # Errors
    /// Returns [`PipelineError::InvalidRound`], [`PipelineError::InvalidDate`],
    /// [`PipelineError::ClubNotFound`] for either team, or a validation error
    /// when the assembled fixture is not a valid canonical fixture.
    pub fn transform(&self, external: &ExternalFixture) -> PipelineResult<Fixture> {
        let a = &external.attributes;

        let round = parse_round(&a.round)?;
        let kick_off = local_kick_off(&a.date)?;
        let home_team_id = self
            .clubs
            .resolve(&a.home_team_name, a.home_logo.as_deref().unwrap_or_default())?;
        let away_team_id = self
            .clubs
            .resolve(&a.away_team_name, a.away_logo.as_deref().unwrap_or_default())?;

        let coordinates =
            format_coordinates(&a.ground_latitude, &a.ground_longitude).unwrap_or_default();

        let fixture = Fixture {
            round,
            date: kick_off.date,
            day: kick_off.day,
            time: kick_off.time,
            home_team_id: home_team_id.to_string(),
            away_team_id: away_team_id.to_string(),
            address: format_address(&a.ground_name, a.field_name.as_deref()),
            coordinates,
        };
        fixture
            .validate()
            .map_err(|e| e.with_subject(format!("fixture {}", external.id)))?;
        Ok(fixture)
    }
}

/// A club website as an absolute URL. Scheme-less hosts get `https://`;
/// anything else is dropped.
fn website_url(club_id: &str, value: &str) -> Option<String> {
    if is_http_url(value) {
        return Some(value.to_string());
    }
    let prefixed = format!("https://{value}");
    if !value.contains("://") && is_http_url(&prefixed) {
        return Some(prefixed);
    }
    log::warn!("Dropping website {value:?} of club {club_id}: not a URL");
    None
}

/// Build a canonical club from a scraped one.
///
/// Optional fields that cannot be made valid are dropped with a warning
/// instead of failing the club.
#[must_use]
pub fn club_from_external(external: &ExternalClub) -> Club {
    let a = &external.attributes;
    let non_empty = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let address = Address {
        street: non_empty(&a.address_line_1).unwrap_or_default(),
        city: non_empty(&a.city).unwrap_or_default(),
        state: non_empty(&a.state).unwrap_or_default(),
        postcode: non_empty(&a.postcode).unwrap_or_default(),
    };

    let name = a.name.trim().to_string();
    Club {
        external_id: external.id.clone(),
        display_name: non_empty(&a.short_name).unwrap_or_else(|| name.clone()),
        name,
        logo_url: a.image.trim().to_string(),
        email: non_empty(&a.email),
        phone: non_empty(&a.phone),
        website: non_empty(&a.url).and_then(|url| website_url(&external.id, &url)),
        address: (!address.is_empty()).then_some(address),
        socials: a
            .socials
            .iter()
            .filter(|s| !s.value.trim().is_empty())
            .filter(|s| {
                let ok = is_http_url(s.value.trim());
                if !ok {
                    log::warn!(
                        "Dropping {} link {:?} of club {}: not a URL",
                        s.name,
                        s.value,
                        external.id
                    );
                }
                ok
            })
            .map(|s| Social {
                platform: s.name.trim().to_lowercase(),
                url: s.value.trim().to_string(),
            })
            .collect(),
    }
}
