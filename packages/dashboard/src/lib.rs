#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The crash map orchestrator.
//!
//! Loads the crash data and ward boundaries concurrently at startup, then
//! turns every new [`FilterState`](crash_map_crash_models::FilterState)
//! into the full set of [`DerivedViews`]: marker layer, severity donut and
//! yearly trend chart. [`Dashboard`] holds the current state and notifies
//! registered [`ViewObserver`]s; [`compute_views`] is the same pipeline
//! without any held state, for request/response callers.

pub mod load;
pub mod pipeline;
pub mod settings;
pub mod views;

pub use load::{LoadedData, load};
pub use pipeline::{Dashboard, ViewObserver};
pub use settings::Settings;
pub use views::{DerivedViews, ViewCounts, compute_views};

use thiserror::Error;

/// Errors that can occur while loading dashboard inputs.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Reading or parsing a data file failed.
    #[error(transparent)]
    Source(#[from] crash_map_source::SourceError),

    /// The boundary document is not usable.
    #[error(transparent)]
    Geo(#[from] crash_map_geography::GeoError),
}
