//! Writes the views of one filter state to a directory.
//!
//! The output is what the map page would draw: the marker and ward layers
//! as `GeoJSON`, both charts as standalone SVG, and the full view bundle
//! as JSON.

use std::path::{Path, PathBuf};

use crash_map_crash_models::FilterState;
use crash_map_dashboard::{LoadedData, Settings, compute_views};
use crash_map_render::boundary_layer;
use thiserror::Error;

/// Errors that can occur while writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Creating the directory or writing a file failed.
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A layer could not be serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn write(path: PathBuf, contents: &str) -> Result<PathBuf, ExportError> {
    std::fs::write(&path, contents).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    log::debug!("Wrote {}", path.display());
    Ok(path)
}

/// Computes the views for `state` and writes them under `out_dir`.
///
/// Returns the written files in write order.
///
/// # Errors
///
/// Returns [`ExportError`] if the directory cannot be created or any file
/// cannot be written.
pub fn export_views(
    data: &LoadedData,
    settings: &Settings,
    state: &FilterState,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(out_dir).map_err(|source| ExportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let views = compute_views(data, state, settings);
    let wards = boundary_layer(&data.boundaries, state.ward.as_deref());

    let files = vec![
        write(
            out_dir.join("views.json"),
            &serde_json::to_string_pretty(&views)?,
        )?,
        write(
            out_dir.join("crashes.geojson"),
            &serde_json::to_string(&views.markers.data)?,
        )?,
        write(
            out_dir.join("wards.geojson"),
            &serde_json::to_string(&wards.data)?,
        )?,
        write(out_dir.join("severity.svg"), &views.donut.to_svg())?,
        write(out_dir.join("years.svg"), &views.bar.to_svg())?,
    ];

    log::info!(
        "Exported {} crashes ({} mapped) to {}",
        views.counts.map,
        views.counts.mapped,
        out_dir.display()
    );

    Ok(files)
}
