//! Per-registry response conventions.
//!
//! Registries disagree on date layouts and on which fields carry the
//! expiration and status. Each [`RegistryFormat`] describes one registry
//! family; [`format_for`] picks the first entry whose suffix matches the
//! domain, so more specific suffixes must come before broader ones.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

/// How a registry writes its expiration timestamp. Values are upper-cased
/// before they reach [`DateFormat::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// Strict RFC 3339, e.g. `2024-01-01T00:00:00Z`.
    Rfc3339,
    /// Date and time without a zone, read as UTC.
    NaiveDateTime(&'static str),
    /// Date only, read as midnight UTC.
    Date(&'static str),
    /// Date and time followed by `Z` or a numeric offset (`+03`, `+0300`, `+03:00`).
    OffsetDateTime(&'static str),
    /// Date and time followed by a space and a zone abbreviation such as `EEST`.
    ZoneAbbreviation(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryFormat {
    /// Matched against the end of the domain, leading dot included.
    pub suffix: &'static str,
    pub expiration: DateFormat,
    /// An "expir" key containing this is a registrar field, not the registry's expiry.
    pub decoy_key: Option<&'static str>,
    /// Exact key that carries the expiration when the registry doesn't call it "expir...".
    pub expiration_key: Option<&'static str>,
    /// Exact key holding every status in one comma-joined value.
    pub joined_status_key: Option<&'static str>,
}

impl RegistryFormat {
    const fn dates(suffix: &'static str, expiration: DateFormat) -> Self {
        Self {
            suffix,
            expiration,
            decoy_key: None,
            expiration_key: None,
            joined_status_key: None,
        }
    }

    // .ru and .su share the TCI registry's field names.
    const fn tci(suffix: &'static str) -> Self {
        Self {
            suffix,
            expiration: DateFormat::Rfc3339,
            decoy_key: None,
            expiration_key: Some("paid-till"),
            joined_status_key: Some("state"),
        }
    }
}

pub static REGISTRY_FORMATS: &[RegistryFormat] = &[
    RegistryFormat::dates(".pp.ua", DateFormat::ZoneAbbreviation("%d-%b-%Y %H:%M:%S")),
    RegistryFormat::dates(".ua", DateFormat::OffsetDateTime("%Y-%m-%d %H:%M:%S")),
    RegistryFormat::dates(".uk", DateFormat::Date("%d-%b-%Y")),
    RegistryFormat::dates(".cz", DateFormat::Date("%d.%m.%Y")),
    RegistryFormat::dates(".im", DateFormat::NaiveDateTime("%d/%m/%Y %H:%M:%S")),
    RegistryFormat {
        suffix: ".scot",
        expiration: DateFormat::Rfc3339,
        decoy_key: Some("registrar"),
        expiration_key: None,
        joined_status_key: None,
    },
    RegistryFormat::dates(".br", DateFormat::Date("%Y%m%d")),
    RegistryFormat::dates(".cn", DateFormat::NaiveDateTime("%Y-%m-%d %H:%M:%S")),
    RegistryFormat::dates(".mx", DateFormat::Date("%Y-%m-%d")),
    RegistryFormat::tci(".ru"),
    RegistryFormat::tci(".su"),
];

pub static DEFAULT_FORMAT: RegistryFormat = RegistryFormat::dates("", DateFormat::Rfc3339);

/// First matching registry format for a lower-cased domain.
pub fn format_for(domain: &str) -> &'static RegistryFormat {
    REGISTRY_FORMATS
        .iter()
        .find(|format| domain.ends_with(format.suffix))
        .unwrap_or(&DEFAULT_FORMAT)
}

impl DateFormat {
    pub fn parse(&self, value: &str) -> Option<DateTime<Utc>> {
        let parsed = match *self {
            DateFormat::Rfc3339 => DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            DateFormat::NaiveDateTime(format) => NaiveDateTime::parse_from_str(value, format)
                .ok()
                .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc)),
            DateFormat::Date(format) => NaiveDate::parse_from_str(value, format)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc)),
            DateFormat::OffsetDateTime(format) => parse_with_offset(value, format),
            DateFormat::ZoneAbbreviation(format) => parse_with_zone_abbreviation(value, format),
        };

        if parsed.is_none() {
            debug!("Failed to parse date {:?} as {:?}", value, self);
        }
        parsed
    }
}

fn parse_with_offset(value: &str, format: &str) -> Option<DateTime<Utc>> {
    if let Some(local) = value.strip_suffix('Z') {
        return NaiveDateTime::parse_from_str(local, format)
            .ok()
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc));
    }

    DateTime::parse_from_str(value, &format!("{}%#z", format))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_with_zone_abbreviation(value: &str, format: &str) -> Option<DateTime<Utc>> {
    let (local, zone) = value.rsplit_once(' ')?;
    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(local, format).ok()?;
    let offset = FixedOffset::east_opt(zone_offset_seconds(zone))?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

// Unknown abbreviations are read as UTC.
fn zone_offset_seconds(zone: &str) -> i32 {
    match zone {
        "EET" => 2 * 3600,
        "EEST" => 3 * 3600,
        _ => 0,
    }
}
