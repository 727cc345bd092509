#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ward boundary polygons for the crash map.
//!
//! Parses the boundary `GeoJSON` into `geo` polygons, builds an R-tree
//! over their envelopes, and answers the two questions the boundary layer
//! asks: which ward is under a point, and how the map should frame a ward
//! once it is selected.

pub mod boundaries;

pub use boundaries::{WardBoundaries, WardBoundary, WardSelection};

use thiserror::Error;

/// Errors that can occur while reading boundary data.
#[derive(Debug, Error)]
pub enum GeoError {
    /// The document is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The document is valid `GeoJSON` but not usable as a boundary set.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
