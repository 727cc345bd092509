//! Ward polygons with an R-tree for point lookups.

use crash_map_geography_models::{BoundingBox, Frame, LatLng};
use geo::{BoundingRect as _, Contains as _, MultiPolygon};
use geojson::{Feature, GeoJson, JsonObject};
use rstar::{AABB, RTree, RTreeObject};

use crate::GeoError;

/// One boundary feature.
#[derive(Debug, Clone)]
pub struct WardBoundary {
    /// Ward identifier read from the configured property, if present.
    pub ward: Option<String>,
    /// Polygon geometry.
    pub polygon: MultiPolygon<f64>,
    /// Extent of the polygon, `None` for an empty geometry.
    pub bounds: Option<BoundingBox>,
    /// Original geometry, kept for re-rendering.
    pub geometry: geojson::Geometry,
    /// Original feature properties.
    pub properties: JsonObject,
}

/// Result of selecting a ward on the boundary layer.
#[derive(Debug, Clone, PartialEq)]
pub struct WardSelection {
    /// The ward that becomes the new ward filter.
    pub ward: String,
    /// Where the map should move, if anywhere.
    pub frame: Option<Frame>,
}

/// R-tree entry pointing back into [`WardBoundaries::boundaries`].
struct IndexEntry {
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// All ward polygons, loaded once and read-only afterwards.
pub struct WardBoundaries {
    boundaries: Vec<WardBoundary>,
    tree: RTree<IndexEntry>,
}

impl std::fmt::Debug for WardBoundaries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WardBoundaries")
            .field("boundaries", &self.boundaries.len())
            .finish_non_exhaustive()
    }
}

impl WardBoundaries {
    /// Parses a `GeoJSON` document.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if the text is not `GeoJSON` or is a bare
    /// geometry rather than features.
    pub fn from_geojson_str(text: &str, ward_property: &str) -> Result<Self, GeoError> {
        Self::from_geojson(text.parse::<GeoJson>()?, ward_property)
    }

    /// Builds the boundary set from a parsed document.
    ///
    /// Features whose geometry is not a polygon or multipolygon are skipped
    /// with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Conversion`] if the document is a bare geometry.
    pub fn from_geojson(geojson: GeoJson, ward_property: &str) -> Result<Self, GeoError> {
        let features = match geojson {
            GeoJson::FeatureCollection(collection) => collection.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(_) => {
                return Err(GeoError::Conversion {
                    message: "expected a Feature or FeatureCollection".to_string(),
                });
            }
        };

        let boundaries: Vec<WardBoundary> = features
            .into_iter()
            .enumerate()
            .filter_map(|(i, feature)| {
                let boundary = to_boundary(feature, ward_property);
                if boundary.is_none() {
                    log::warn!("Skipping boundary feature {i}: not a polygon");
                }
                boundary
            })
            .collect();

        Ok(Self::new(boundaries))
    }

    /// Indexes an already-built set of boundaries.
    #[must_use]
    pub fn new(boundaries: Vec<WardBoundary>) -> Self {
        let entries = boundaries
            .iter()
            .enumerate()
            .filter_map(|(index, b)| {
                b.bounds.map(|bbox| IndexEntry {
                    index,
                    envelope: AABB::from_corners([bbox.west, bbox.south], [bbox.east, bbox.north]),
                })
            })
            .collect();

        let tree = RTree::bulk_load(entries);
        log::info!(
            "Indexed {} ward boundaries ({} with extents)",
            boundaries.len(),
            tree.size()
        );

        Self { boundaries, tree }
    }

    /// Every boundary in document order.
    #[must_use]
    pub fn boundaries(&self) -> &[WardBoundary] {
        &self.boundaries
    }

    /// Number of boundaries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// Whether there are no boundaries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Looks up a boundary by ward identifier.
    #[must_use]
    pub fn get(&self, ward: &str) -> Option<&WardBoundary> {
        self.boundaries
            .iter()
            .find(|b| b.ward.as_deref() == Some(ward))
    }

    /// The first boundary whose polygon contains `point`.
    #[must_use]
    pub fn ward_at(&self, point: LatLng) -> Option<&WardBoundary> {
        let geo_point = geo::Point::new(point.lng, point.lat);
        let query_env = AABB::from_point([point.lng, point.lat]);

        self.tree
            .locate_in_envelope_intersecting(&query_env)
            .map(|entry| &self.boundaries[entry.index])
            .find(|b| b.polygon.contains(&geo_point))
    }

    /// Selects the ward under a click.
    #[must_use]
    pub fn select_at(&self, click: LatLng) -> Option<WardSelection> {
        let boundary = self.ward_at(click)?;
        select(boundary, Some(click))
    }

    /// Selects a ward by identifier, framing its extent. A flat extent is
    /// centred on instead; a ward with no extent centres on the click.
    #[must_use]
    pub fn select_ward(&self, ward: &str, click: Option<LatLng>) -> Option<WardSelection> {
        select(self.get(ward)?, click)
    }
}

fn select(boundary: &WardBoundary, click: Option<LatLng>) -> Option<WardSelection> {
    let ward = boundary.ward.clone()?;
    let frame = match boundary.bounds {
        Some(bounds) if bounds.has_area() => Some(Frame::Bounds { bounds }),
        Some(bounds) => Some(Frame::Center {
            center: bounds.center(),
        }),
        None => click.map(|center| Frame::Center { center }),
    };

    Some(WardSelection { ward, frame })
}

fn to_boundary(feature: Feature, ward_property: &str) -> Option<WardBoundary> {
    let geometry = feature.geometry?;
    let polygon = match geo::Geometry::<f64>::try_from(geometry.clone()).ok()? {
        geo::Geometry::MultiPolygon(mp) => mp,
        geo::Geometry::Polygon(p) => MultiPolygon(vec![p]),
        _ => return None,
    };
    let properties = feature.properties.unwrap_or_default();
    let ward = properties.get(ward_property).and_then(ward_value);
    let bounds = polygon
        .bounding_rect()
        .map(|rect| BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y));

    Some(WardBoundary {
        ward,
        polygon,
        bounds,
        geometry,
        properties,
    })
}

fn ward_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WARDS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "WARD": 1, "NAME": "Ward 1" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-77.1, 38.9], [-77.0, 38.9], [-77.0, 39.0], [-77.1, 39.0], [-77.1, 38.9]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "WARD": "2" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[-77.0, 38.9], [-76.9, 38.9], [-76.9, 39.0], [-77.0, 39.0], [-77.0, 38.9]]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "WARD": "line" },
                "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] }
            }
        ]
    }"#;

    #[test]
    fn parses_polygons_and_skips_other_geometry() {
        let wards = WardBoundaries::from_geojson_str(WARDS, "WARD").unwrap();
        assert_eq!(wards.len(), 2);
        assert_eq!(wards.boundaries()[0].ward.as_deref(), Some("1"));
        assert_eq!(wards.boundaries()[1].ward.as_deref(), Some("2"));
    }

    #[test]
    fn finds_ward_under_point() {
        let wards = WardBoundaries::from_geojson_str(WARDS, "WARD").unwrap();
        let hit = wards.ward_at(LatLng::new(38.95, -76.95)).unwrap();
        assert_eq!(hit.ward.as_deref(), Some("2"));
        assert!(wards.ward_at(LatLng::new(40.0, -76.95)).is_none());
    }

    #[test]
    fn selection_frames_polygon_bounds() {
        let wards = WardBoundaries::from_geojson_str(WARDS, "WARD").unwrap();
        let selection = wards.select_at(LatLng::new(38.95, -77.05)).unwrap();
        assert_eq!(selection.ward, "1");
        assert_eq!(
            selection.frame,
            Some(Frame::Bounds {
                bounds: BoundingBox::new(-77.1, 38.9, -77.0, 39.0)
            })
        );
    }

    #[test]
    fn selection_without_bounds_centers_on_click() {
        let boundary = WardBoundary {
            ward: Some("7".to_string()),
            polygon: MultiPolygon(vec![]),
            bounds: None,
            geometry: geojson::Geometry::new(geojson::Value::MultiPolygon(vec![])),
            properties: JsonObject::new(),
        };
        let wards = WardBoundaries::new(vec![boundary]);
        let click = LatLng::new(38.9, -77.0);

        let selection = wards.select_ward("7", Some(click)).unwrap();

        assert_eq!(selection.frame, Some(Frame::Center { center: click }));
        assert!(wards.ward_at(click).is_none());
    }

    #[test]
    fn flat_ward_centers_on_its_extent() {
        let flat = r#"{"type":"Feature","properties":{"WARD":"8"},"geometry":{"type":"Polygon","coordinates":[[[-77.0,38.8],[-77.0,38.9],[-77.0,38.8]]]}}"#;
        let wards = WardBoundaries::from_geojson_str(flat, "WARD").unwrap();

        let selection = wards.select_ward("8", Some(LatLng::new(0.0, 0.0))).unwrap();

        let Some(Frame::Center { center }) = selection.frame else {
            panic!("expected a centre frame, got {:?}", selection.frame);
        };
        assert!((center.lat - 38.85).abs() < 1e-9);
        assert!((center.lng - -77.0).abs() < 1e-9);
    }

    #[test]
    fn missing_ward_property_is_not_selectable() {
        let wards = WardBoundaries::from_geojson_str(WARDS, "WARD_ID").unwrap();
        assert_eq!(wards.len(), 2);
        assert!(wards.select_at(LatLng::new(38.95, -77.05)).is_none());
    }

    #[test]
    fn bare_geometry_is_rejected() {
        let result = WardBoundaries::from_geojson_str(r#"{"type":"Point","coordinates":[0,0]}"#, "WARD");
        assert!(matches!(result, Err(GeoError::Conversion { .. })));
    }
}
