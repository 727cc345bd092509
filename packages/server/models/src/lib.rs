#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the crash map server.
//!
//! These types are serialized to JSON for the REST API. Query parameters
//! arrive as loose strings and are converted into a
//! [`FilterState`] here, so handlers never see raw control values.

use crash_map_crash_models::{FilterState, InjuryMode, InvalidInjuryModeError};
use crash_map_geography_models::{Frame, LatLng};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is up.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Crash records loaded.
    pub records: usize,
    /// Ward boundaries loaded.
    pub boundaries: usize,
}

/// Values for the filter controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFilterOptions {
    /// Year select options, sorted.
    pub years: Vec<String>,
    /// Ward select options, sorted.
    pub wards: Vec<String>,
    /// Injury select options.
    pub injury_modes: Vec<InjuryMode>,
    /// Year selected on first load, if any.
    pub default_year: Option<String>,
    /// Crash records loaded.
    pub record_count: usize,
    /// Records dropped by the year exclusion.
    pub excluded_count: usize,
}

/// Filter controls as query parameters.
///
/// Blank strings mean "unset". Toggles are on for `true`, `1`, `on` or
/// `yes` (any case).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQueryParams {
    /// Selected year.
    pub year: Option<String>,
    /// Selected ward.
    pub ward: Option<String>,
    /// Injury mode: `all`, `high`, `low` or `none`.
    pub injury: Option<String>,
    /// Only crashes with fatalities.
    pub fatalities: Option<String>,
    /// Only crashes involving pedestrians.
    pub pedestrians: Option<String>,
    /// Only crashes involving bicyclists.
    pub bicyclists: Option<String>,
}

impl FilterQueryParams {
    /// Converts the parameters into a filter state.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInjuryModeError`] if `injury` is set to an unknown
    /// mode.
    pub fn to_filter_state(&self) -> Result<FilterState, InvalidInjuryModeError> {
        let injury = match self.injury.as_deref().map(str::trim) {
            None | Some("") => InjuryMode::All,
            Some(value) => InjuryMode::parse(value)?,
        };

        Ok(FilterState::default()
            .with_year(self.year.clone())
            .with_ward(self.ward.clone())
            .with_injury(injury)
            .with_fatalities_only(is_on(self.fatalities.as_deref()))
            .with_pedestrians_only(is_on(self.pedestrians.as_deref()))
            .with_bicyclists_only(is_on(self.bicyclists.as_deref())))
    }
}

fn is_on(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim();
        ["true", "1", "on", "yes"]
            .iter()
            .any(|on| v.eq_ignore_ascii_case(on))
    })
}

/// Query parameters for the clusters endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ZoomQueryParams {
    /// Map zoom level.
    pub zoom: Option<u8>,
}

/// A clicked map position.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PointQueryParams {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl From<PointQueryParams> for LatLng {
    fn from(params: PointQueryParams) -> Self {
        Self::new(params.lat, params.lng)
    }
}

/// An optional click position accompanying a ward selection.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ClickQueryParams {
    /// Latitude.
    pub lat: Option<f64>,
    /// Longitude.
    pub lng: Option<f64>,
}

impl ClickQueryParams {
    /// The click position, when both coordinates are present.
    #[must_use]
    pub fn point(self) -> Option<LatLng> {
        Some(LatLng::new(self.lat?, self.lng?))
    }
}

/// Result of selecting a ward on the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiWardSelection {
    /// The selected ward.
    pub ward: String,
    /// How the map should re-frame.
    pub frame: Option<Frame>,
    /// The filter state to request views with next.
    pub filter: FilterState,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// What went wrong.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> FilterQueryParams {
        let mut params = FilterQueryParams::default();
        for (key, value) in pairs {
            let value = Some((*value).to_string());
            match *key {
                "year" => params.year = value,
                "ward" => params.ward = value,
                "injury" => params.injury = value,
                "fatalities" => params.fatalities = value,
                "pedestrians" => params.pedestrians = value,
                "bicyclists" => params.bicyclists = value,
                _ => unreachable!(),
            }
        }
        params
    }

    #[test]
    fn empty_query_is_the_default_state() {
        assert_eq!(
            FilterQueryParams::default().to_filter_state().unwrap(),
            FilterState::default()
        );
    }

    #[test]
    fn converts_every_control() {
        let state = params(&[
            ("year", "2024"),
            ("ward", "Ward 3"),
            ("injury", "Low"),
            ("fatalities", "on"),
            ("pedestrians", "true"),
            ("bicyclists", "0"),
        ])
        .to_filter_state()
        .unwrap();

        assert_eq!(state.year.as_deref(), Some("2024"));
        assert_eq!(state.ward.as_deref(), Some("Ward 3"));
        assert_eq!(state.injury, InjuryMode::Low);
        assert!(state.fatalities_only);
        assert!(state.pedestrians_only);
        assert!(!state.bicyclists_only);
    }

    #[test]
    fn blank_values_are_unset() {
        let state = params(&[("year", ""), ("ward", " "), ("injury", "")])
            .to_filter_state()
            .unwrap();
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn unknown_injury_mode_is_rejected() {
        let err = params(&[("injury", "severe")]).to_filter_state().unwrap_err();
        assert_eq!(err.value, "severe");
    }

    #[test]
    fn click_needs_both_coordinates() {
        let half = ClickQueryParams {
            lat: Some(38.9),
            lng: None,
        };
        assert_eq!(half.point(), None);

        let full = ClickQueryParams {
            lat: Some(38.9),
            lng: Some(-77.0),
        };
        assert_eq!(full.point(), Some(LatLng::new(38.9, -77.0)));
    }

    #[test]
    fn selection_serializes_frame_tag() {
        let selection = ApiWardSelection {
            ward: "Ward 1".to_string(),
            frame: Some(Frame::Center {
                center: LatLng::new(38.9, -77.0),
            }),
            filter: FilterState::default().with_ward(Some("Ward 1")),
        };
        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(json["frame"]["type"], "center");
        assert_eq!(json["filter"]["ward"], "Ward 1");
    }
}
