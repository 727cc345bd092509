#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Render models for the crash map.
//!
//! Each renderer turns filtered records (or their aggregates) into a value
//! the browser shell can hand straight to Leaflet or drop into the page:
//! `GeoJSON` layers with popup content and styles, viewport instructions,
//! and chart models. Charts also draw themselves to standalone SVG through
//! `plotters`.

pub mod bar;
pub mod boundary;
pub mod clusters;
pub mod donut;
pub mod markers;
mod svg;

use serde::Serialize;

pub use bar::{BarChart, bar_chart};
pub use boundary::{BoundaryLayer, boundary_layer};
pub use clusters::{Cluster, grid_clusters};
pub use donut::{DonutChart, donut_chart};
pub use markers::{MarkerLayer, MarkerOptions, MarkerStyle, focus_view, marker_layer};

/// A custom Leaflet map pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pane {
    /// Pane name passed to `map.createPane`.
    pub name: &'static str,
    /// CSS z-index of the pane.
    pub z_index: u32,
}

/// Pane for ward polygons, below the default marker pane.
pub const POLYGON_PANE: Pane = Pane {
    name: "polygonsPane",
    z_index: 320,
};

/// Pane for crash markers, above everything but popups.
pub const MARKER_PANE: Pane = Pane {
    name: "markersPane",
    z_index: 650,
};
