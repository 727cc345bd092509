#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crash record, severity and filter state types.
//!
//! This crate defines the in-memory shape of one traffic-crash row and
//! the typed values derived from it once at load time (the `year` and the
//! casualty counters). Every other crate in the crash map consumes these
//! types read-only.

pub mod fields;
pub mod filter;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use filter::{FilterState, InjuryMode, InvalidInjuryModeError, YearScope};

/// Per-victim-category counter triple (driver, pedestrian, bicyclist).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VictimCounts {
    /// Count for drivers.
    pub driver: f64,
    /// Count for pedestrians.
    pub pedestrian: f64,
    /// Count for bicyclists.
    pub bicyclist: f64,
}

impl VictimCounts {
    /// Sum across the three victim categories.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.driver + self.pedestrian + self.bicyclist
    }

    fn from_record(record: &[(String, String)], names: [&str; 3]) -> Self {
        let [driver, pedestrian, bicyclist] = names.map(|name| fields::counter(lookup(record, name)));
        Self {
            driver,
            pedestrian,
            bicyclist,
        }
    }
}

/// Casualty counters parsed once from a crash row.
///
/// Missing or non-numeric source values are stored as `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CasualtyCounts {
    /// `FATAL_*` counters.
    pub fatal: VictimCounts,
    /// `MAJORINJURIES_*` counters.
    pub major: VictimCounts,
    /// `MINORINJURIES_*` counters.
    pub minor: VictimCounts,
    /// `TOTAL_PEDESTRIANS`.
    pub total_pedestrians: f64,
    /// `TOTAL_BICYCLES`.
    pub total_bicycles: f64,
}

impl CasualtyCounts {
    fn from_record(record: &[(String, String)]) -> Self {
        Self {
            fatal: VictimCounts::from_record(record, fields::FATAL),
            major: VictimCounts::from_record(record, fields::MAJOR_INJURIES),
            minor: VictimCounts::from_record(record, fields::MINOR_INJURIES),
            total_pedestrians: fields::counter(lookup(record, fields::TOTAL_PEDESTRIANS)),
            total_bicycles: fields::counter(lookup(record, fields::TOTAL_BICYCLES)),
        }
    }

    /// Buckets these counters by precedence: fatal, then major, then minor.
    #[must_use]
    pub fn severity(&self) -> SeverityBucket {
        if self.fatal.total() > 0.0 {
            SeverityBucket::Fatal
        } else if self.major.total() > 0.0 {
            SeverityBucket::Major
        } else if self.minor.total() > 0.0 {
            SeverityBucket::Minor
        } else {
            SeverityBucket::None
        }
    }
}

/// One traffic-crash row.
///
/// Columns keep their source order so that detail views list them the way
/// the dataset does. The derived `year` and [`CasualtyCounts`] are computed
/// once in [`CrashRecord::from_fields`] and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrashRecord {
    year: String,
    fields: Vec<(String, String)>,
    casualties: CasualtyCounts,
}

impl CrashRecord {
    /// Builds a record from `(column, value)` pairs, deriving the year from
    /// the first four characters of `DATE`.
    ///
    /// A missing or short `DATE` produces a short year string; it is not
    /// validated.
    #[must_use]
    pub fn from_fields(columns: Vec<(String, String)>) -> Self {
        let year = lookup(&columns, fields::DATE)
            .map(|date| date.chars().take(4).collect())
            .unwrap_or_default();
        let casualties = CasualtyCounts::from_record(&columns);

        Self {
            year,
            fields: columns,
            casualties,
        }
    }

    /// Derived year (first four characters of `DATE`).
    #[must_use]
    pub fn year(&self) -> &str {
        &self.year
    }

    /// Raw value of the named column, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        lookup(&self.fields, name)
    }

    /// All columns in source order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Raw `WARD` value.
    #[must_use]
    pub fn ward(&self) -> Option<&str> {
        self.get(fields::WARD)
    }

    /// Parsed casualty counters.
    #[must_use]
    pub const fn casualties(&self) -> &CasualtyCounts {
        &self.casualties
    }

    /// Severity bucket for this record.
    #[must_use]
    pub fn severity(&self) -> SeverityBucket {
        self.casualties.severity()
    }

    /// Parses `(latitude, longitude)`.
    ///
    /// Returns `None` when either value is missing, blank, or not a finite
    /// number.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = fields::coordinate(self.get(fields::LATITUDE)?)?;
        let lng = fields::coordinate(self.get(fields::LONGITUDE)?)?;
        Some((lat, lng))
    }
}

fn lookup<'a>(fields: &'a [(String, String)], name: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Severity bucket a crash falls into, with precedence
/// `Fatal > Major > Minor > None`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum SeverityBucket {
    /// At least one fatality.
    Fatal,
    /// No fatality, at least one major injury.
    Major,
    /// Only minor injuries.
    Minor,
    /// No reported injuries.
    None,
}

impl SeverityBucket {
    /// Chart colour for this bucket.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Fatal => "#d73027",
            Self::Major => "#fc8d59",
            Self::Minor => "#fee08b",
            Self::None => "#91bfdb",
        }
    }

    /// Returns all variants in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Fatal, Self::Major, Self::Minor, Self::None]
    }
}
