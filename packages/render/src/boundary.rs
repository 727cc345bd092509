//! Ward boundary layer with default and hover styles.

use crash_map_geography::WardBoundaries;
use geojson::{Feature, FeatureCollection};
use serde::Serialize;
use serde_json::json;

use crate::{POLYGON_PANE, Pane};

/// Leaflet path style for a ward outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    pub color: &'static str,
    pub weight: u32,
    pub fill: bool,
    pub fill_opacity: f64,
}

/// Style applied while the pointer is over a ward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightStyle {
    pub color: &'static str,
    pub weight: u32,
    /// Raise the hovered polygon above its neighbours.
    pub bring_to_front: bool,
}

/// Unfilled blue outline.
pub const DEFAULT_STYLE: PathStyle = PathStyle {
    color: "blue",
    weight: 2,
    fill: false,
    fill_opacity: 0.0,
};

/// Thick orange outline.
pub const HIGHLIGHT_STYLE: HighlightStyle = HighlightStyle {
    color: "#ff7800",
    weight: 4,
    bring_to_front: true,
};

/// The ward polygon layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryLayer {
    /// Pane the polygons are added to.
    pub pane: Pane,
    /// Style of every polygon at rest.
    pub style: PathStyle,
    /// Style reverted on mouse-out.
    pub highlight: HighlightStyle,
    /// Ward currently used as the ward filter.
    pub selected: Option<String>,
    /// One feature per ward polygon.
    pub data: FeatureCollection,
}

/// Builds the boundary layer.
///
/// Every feature keeps its original properties and gains `ward` (the
/// identifier used for click-to-filter, or null) and `selected`.
#[must_use]
pub fn boundary_layer(boundaries: &WardBoundaries, selected: Option<&str>) -> BoundaryLayer {
    let features = boundaries
        .boundaries()
        .iter()
        .map(|boundary| {
            let mut properties = boundary.properties.clone();
            let is_selected = selected.is_some() && boundary.ward.as_deref() == selected;
            properties.insert("ward".to_string(), json!(boundary.ward));
            properties.insert("selected".to_string(), json!(is_selected));

            Feature {
                bbox: boundary
                    .bounds
                    .map(|b| vec![b.west, b.south, b.east, b.north]),
                geometry: Some(boundary.geometry.clone()),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    BoundaryLayer {
        pane: POLYGON_PANE,
        style: DEFAULT_STYLE,
        highlight: HIGHLIGHT_STYLE,
        selected: selected.map(str::to_string),
        data: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
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
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-77.0, 38.9], [-76.9, 38.9], [-76.9, 39.0], [-77.0, 39.0], [-77.0, 38.9]]]
                }
            }
        ]
    }"#;

    #[test]
    fn layer_keeps_properties_and_marks_selection() {
        let wards = WardBoundaries::from_geojson_str(WARDS, "WARD").unwrap();

        let layer = boundary_layer(&wards, Some("1"));

        assert_eq!(layer.pane.z_index, 320);
        assert_eq!(layer.data.features.len(), 2);
        let first = layer.data.features[0].properties.as_ref().unwrap();
        assert_eq!(first["NAME"], "Ward 1");
        assert_eq!(first["ward"], "1");
        assert_eq!(first["selected"], true);
        let second = layer.data.features[1].properties.as_ref().unwrap();
        assert!(second["ward"].is_null());
        assert_eq!(second["selected"], false);
    }

    #[test]
    fn nothing_selected_without_a_ward_filter() {
        let wards = WardBoundaries::from_geojson_str(WARDS, "WARD").unwrap();
        let layer = boundary_layer(&wards, None);
        assert!(layer.data.features.iter().all(|f| {
            f.properties.as_ref().unwrap()["selected"] == false
        }));
    }

    #[test]
    fn styles_serialize_for_leaflet() {
        let style = serde_json::to_value(DEFAULT_STYLE).unwrap();
        assert_eq!(style, json!({ "color": "blue", "weight": 2, "fill": false, "fillOpacity": 0.0 }));

        let highlight = serde_json::to_value(HIGHLIGHT_STYLE).unwrap();
        assert_eq!(highlight["color"], "#ff7800");
        assert_eq!(highlight["weight"], 4);
    }
}
