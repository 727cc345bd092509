//! Filter state shared by the map and chart views.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Injury-severity filter mode.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum InjuryMode {
    /// No injury constraint.
    #[default]
    All,
    /// At least one major injury.
    High,
    /// Minor injuries only.
    Low,
    /// No injuries at all.
    None,
}

impl InjuryMode {
    /// Returns all variants in control order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::All, Self::High, Self::Low, Self::None]
    }

    /// Parses a mode name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInjuryModeError`] for anything other than `all`,
    /// `high`, `low` or `none`.
    pub fn parse(value: &str) -> Result<Self, InvalidInjuryModeError> {
        value.parse().map_err(|_| InvalidInjuryModeError {
            value: value.to_string(),
        })
    }
}

/// Error returned when an injury mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidInjuryModeError {
    /// The rejected value.
    pub value: String,
}

impl std::fmt::Display for InvalidInjuryModeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid injury mode '{}': expected all, high, low or none",
            self.value
        )
    }
}

impl std::error::Error for InvalidInjuryModeError {}

/// Whether a filter pass honours the selected year.
///
/// The per-year trend chart ignores the year so every year stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearScope {
    /// Apply the year constraint.
    Apply,
    /// Skip the year constraint.
    Ignore,
}

/// The complete set of control values.
///
/// A new value is built on every control change and handed to the filter
/// engine; nothing else holds filter state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Selected year, `None` for all years.
    pub year: Option<String>,
    /// Selected ward, `None` for all wards.
    pub ward: Option<String>,
    /// Injury-severity mode.
    pub injury: InjuryMode,
    /// Only crashes with at least one fatality.
    pub fatalities_only: bool,
    /// Only crashes involving pedestrians.
    pub pedestrians_only: bool,
    /// Only crashes involving bicyclists.
    pub bicyclists_only: bool,
}

impl FilterState {
    /// Returns a copy with the year replaced. Blank years clear it.
    #[must_use]
    pub fn with_year(mut self, year: Option<impl Into<String>>) -> Self {
        self.year = non_blank(year);
        self
    }

    /// Returns a copy with the ward replaced. Blank wards clear it.
    #[must_use]
    pub fn with_ward(mut self, ward: Option<impl Into<String>>) -> Self {
        self.ward = non_blank(ward);
        self
    }

    /// Returns a copy with the injury mode replaced.
    #[must_use]
    pub const fn with_injury(mut self, injury: InjuryMode) -> Self {
        self.injury = injury;
        self
    }

    /// Returns a copy with the fatalities toggle replaced.
    #[must_use]
    pub const fn with_fatalities_only(mut self, on: bool) -> Self {
        self.fatalities_only = on;
        self
    }

    /// Returns a copy with the pedestrian toggle replaced.
    #[must_use]
    pub const fn with_pedestrians_only(mut self, on: bool) -> Self {
        self.pedestrians_only = on;
        self
    }

    /// Returns a copy with the bicyclist toggle replaced.
    #[must_use]
    pub const fn with_bicyclists_only(mut self, on: bool) -> Self {
        self.bicyclists_only = on;
        self
    }
}

fn non_blank(value: Option<impl Into<String>>) -> Option<String> {
    value.map(Into::into).filter(|v| !v.trim().is_empty())
}
