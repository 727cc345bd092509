//! Zoom-dependent grid clustering of crash markers.
//!
//! Points are binned into square cells whose side is the cluster radius
//! in screen pixels at the requested zoom. Each non-empty cell becomes one
//! cluster positioned at the mean of its points.

use std::collections::BTreeMap;

use crash_map_geography_models::{BoundingBox, LatLng};
use serde::Serialize;

/// Web-mercator tile size in pixels.
const TILE_SIZE: f64 = 256.0;

/// Highest zoom level clustering is computed for.
pub const MAX_ZOOM: u8 = 19;

/// A group of nearby markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// Mean position of the grouped points.
    pub center: LatLng,
    /// Number of grouped points.
    pub count: u64,
    /// Extent of the grouped points.
    pub bounds: BoundingBox,
}

#[derive(Default)]
struct Cell {
    lat_sum: f64,
    lng_sum: f64,
    count: u64,
    bounds: Option<BoundingBox>,
}

impl Cell {
    fn add(&mut self, point: LatLng) {
        self.lat_sum += point.lat;
        self.lng_sum += point.lng;
        self.count += 1;
        self.bounds = Some(match self.bounds {
            Some(b) => BoundingBox::new(
                b.west.min(point.lng),
                b.south.min(point.lat),
                b.east.max(point.lng),
                b.north.max(point.lat),
            ),
            None => BoundingBox::new(point.lng, point.lat, point.lng, point.lat),
        });
    }

    #[allow(clippy::cast_precision_loss)]
    fn into_cluster(self) -> Option<Cluster> {
        let bounds = self.bounds?;
        let n = self.count as f64;
        Some(Cluster {
            center: LatLng::new(self.lat_sum / n, self.lng_sum / n),
            count: self.count,
            bounds,
        })
    }
}

/// Width in degrees of one grid cell at `zoom`.
#[must_use]
pub fn cell_size(zoom: u8, radius_px: u32) -> f64 {
    let zoom = zoom.min(MAX_ZOOM);
    let degrees_per_pixel = 360.0 / (TILE_SIZE * f64::from(1u32 << zoom));
    f64::from(radius_px.max(1)) * degrees_per_pixel
}

/// Groups points into grid clusters, ordered south-west to north-east.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn grid_clusters(
    points: impl IntoIterator<Item = LatLng>,
    zoom: u8,
    radius_px: u32,
) -> Vec<Cluster> {
    let size = cell_size(zoom, radius_px);
    let mut cells: BTreeMap<(i64, i64), Cell> = BTreeMap::new();

    for point in points {
        let key = (
            (point.lat / size).floor() as i64,
            (point.lng / size).floor() as i64,
        );
        cells.entry(key).or_default().add(point);
    }

    cells.into_values().filter_map(Cell::into_cluster).collect()
}
