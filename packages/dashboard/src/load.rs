//! Concurrent startup load of crash data and ward boundaries.
//!
//! The two loads are independent: either may fail without affecting the
//! other, and a failure only leaves the corresponding layer empty.

use std::sync::Arc;

use crash_map_geography::WardBoundaries;
use crash_map_source::config::DataConfig;
use crash_map_source::progress::ProgressCallback;
use crash_map_source::{DataLocation, WorkingSet, loader};

use crate::DashboardError;

/// Everything loaded at startup. Read-only afterwards.
#[derive(Debug)]
pub struct LoadedData {
    /// Crash records and the year and ward universes.
    pub working_set: WorkingSet,
    /// Ward polygons.
    pub boundaries: WardBoundaries,
}

impl LoadedData {
    /// Wraps already-loaded inputs.
    #[must_use]
    pub const fn new(working_set: WorkingSet, boundaries: WardBoundaries) -> Self {
        Self {
            working_set,
            boundaries,
        }
    }
}

impl Default for LoadedData {
    fn default() -> Self {
        Self::new(WorkingSet::default(), WardBoundaries::new(Vec::new()))
    }
}

/// Fetches and parses the boundary document.
///
/// # Errors
///
/// Returns [`DashboardError`] if the document cannot be read or is not a
/// usable `GeoJSON` feature set.
pub async fn load_boundaries(
    location: &DataLocation,
    ward_property: &str,
    client: &reqwest::Client,
) -> Result<WardBoundaries, DashboardError> {
    let text = location.read_text(client).await?;
    let boundaries = WardBoundaries::from_geojson_str(&text, ward_property)?;
    log::info!("Loaded {} ward boundaries from {location}", boundaries.len());
    Ok(boundaries)
}

/// Loads both inputs concurrently.
///
/// Failures are logged and replaced with an empty working set or an empty
/// boundary set.
pub async fn load(
    config: &DataConfig,
    client: &reqwest::Client,
    progress: &Arc<dyn ProgressCallback>,
) -> LoadedData {
    let (crashes, boundaries) = tokio::join!(
        loader::load_working_set(&config.crashes, client, progress),
        load_boundaries(&config.boundaries, &config.ward_property, client),
    );

    let working_set = crashes.unwrap_or_else(|e| {
        log::error!("Failed to load crash data from {}: {e}", config.crashes);
        WorkingSet::default()
    });
    let boundaries = boundaries.unwrap_or_else(|e| {
        log::error!("Failed to load ward boundaries from {}: {e}", config.boundaries);
        WardBoundaries::new(Vec::new())
    });

    LoadedData::new(working_set, boundaries)
}
