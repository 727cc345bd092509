//! Crash marker layer and popup content.

use crash_map_crash_models::{CrashRecord, fields};
use crash_map_geography_models::{LatLng, MapView};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;
use serde_json::json;

use crate::{MARKER_PANE, Pane, svg};

/// Popup heading.
pub const POPUP_TITLE: &str = "Crash Details";

/// Zoom level used when a marker is selected.
pub const FOCUS_ZOOM: u8 = 18;

/// Fields listed first in every popup, in this order, when non-blank.
pub const ALWAYS_SHOWN: [&str; 5] = [
    fields::LATITUDE,
    fields::LONGITUDE,
    fields::DATE,
    fields::ADDRESS,
    fields::WARD,
];

/// Projected coordinates, never listed.
const NEVER_SHOWN: [&str; 2] = [fields::XCOORD, fields::YCOORD];

/// How each crash marker is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MarkerStyle {
    /// Image marker.
    #[serde(rename_all = "camelCase")]
    Icon {
        /// Image URL relative to the page.
        url: String,
        /// Icon size in pixels.
        size: [i32; 2],
        /// Pixel offset of the icon tip.
        anchor: [i32; 2],
        /// Pixel offset of the popup relative to the anchor.
        popup_anchor: [i32; 2],
    },
    /// Plain circle marker.
    Circle {
        /// Radius in pixels.
        radius: u32,
        /// Stroke and fill colour.
        color: String,
    },
}

impl MarkerStyle {
    /// The crash icon with its standard size and anchors.
    #[must_use]
    pub fn icon(url: impl Into<String>) -> Self {
        Self::Icon {
            url: url.into(),
            size: [40, 50],
            anchor: [15, 15],
            popup_anchor: [0, -15],
        }
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self::icon("img/crash.png")
    }
}

/// Marker presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerOptions {
    /// Marker appearance.
    pub style: MarkerStyle,
    /// Whether the client should group nearby markers.
    pub cluster: bool,
    /// Cluster radius in pixels.
    pub cluster_radius: u32,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self {
            style: MarkerStyle::default(),
            cluster: true,
            cluster_radius: 80,
        }
    }
}

/// One `FIELD: value` line of a popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailLine {
    pub field: String,
    pub value: String,
}

/// The crash marker layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerLayer {
    /// Pane the markers are added to.
    pub pane: Pane,
    /// Presentation settings.
    pub options: MarkerOptions,
    /// One point feature per mappable crash.
    pub data: FeatureCollection,
}

impl MarkerLayer {
    /// Number of markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.features.len()
    }

    /// Whether the layer has no markers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.features.is_empty()
    }

    /// Marker positions in layer order.
    pub fn positions(&self) -> impl Iterator<Item = LatLng> + '_ {
        self.data.features.iter().filter_map(|feature| {
            match feature.geometry.as_ref().map(|g| &g.value) {
                Some(Value::Point(p)) if p.len() >= 2 => Some(LatLng::new(p[1], p[0])),
                _ => None,
            }
        })
    }
}

/// Lines shown in a crash popup.
///
/// [`ALWAYS_SHOWN`] fields come first when non-blank. Every other column
/// follows in source order if its value is a nonzero number; blank, zero
/// and free-text values are left out.
#[must_use]
pub fn detail_lines(record: &CrashRecord) -> Vec<DetailLine> {
    let always = ALWAYS_SHOWN.iter().filter_map(|&field| {
        record
            .get(field)
            .filter(|value| !value.trim().is_empty())
            .map(|value| DetailLine {
                field: field.to_string(),
                value: value.to_string(),
            })
    });

    let numeric = record
        .fields()
        .filter(|(field, _)| !ALWAYS_SHOWN.contains(field) && !NEVER_SHOWN.contains(field))
        .filter(|(_, value)| fields::numeric_value(value).is_some_and(|n| n.abs() > 0.0))
        .map(|(field, value)| DetailLine {
            field: field.to_string(),
            value: value.to_string(),
        });

    always.chain(numeric).collect()
}

/// Popup HTML: a heading followed by `<br/>`-separated lines.
#[must_use]
pub fn popup_html(lines: &[DetailLine]) -> String {
    let body: Vec<String> = lines
        .iter()
        .map(|line| {
            format!(
                "<strong>{}:</strong> {}",
                svg::escape(&line.field),
                svg::escape(&line.value)
            )
        })
        .collect();

    format!("<h4>{POPUP_TITLE}</h4>{}", body.join("<br/>"))
}

/// Point feature for one crash, or `None` when it has no usable
/// coordinates.
#[must_use]
pub fn crash_feature(record: &CrashRecord) -> Option<Feature> {
    let (lat, lng) = record.coordinates()?;
    let lines = detail_lines(record);

    let details: Vec<serde_json::Value> = lines
        .iter()
        .map(|line| json!({ "field": line.field, "value": line.value }))
        .collect();

    let mut properties = JsonObject::new();
    properties.insert("title".to_string(), json!(POPUP_TITLE));
    properties.insert("details".to_string(), json!(details));
    properties.insert("popup".to_string(), json!(popup_html(&lines)));
    properties.insert("ward".to_string(), json!(record.ward()));
    properties.insert("year".to_string(), json!(record.year()));
    properties.insert("severity".to_string(), json!(record.severity().to_string()));

    Some(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![lng, lat]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Builds the marker layer for the map view.
///
/// Records without valid coordinates are dropped silently.
#[must_use]
pub fn marker_layer(records: &[&CrashRecord], options: &MarkerOptions) -> MarkerLayer {
    let features: Vec<Feature> = records.iter().filter_map(|r| crash_feature(r)).collect();

    let dropped = records.len() - features.len();
    if dropped > 0 {
        log::debug!("{dropped} of {} crashes have no coordinates", records.len());
    }

    MarkerLayer {
        pane: MARKER_PANE,
        options: options.clone(),
        data: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
    }
}

/// Close-up view centred on a selected marker.
#[must_use]
pub const fn focus_view(point: LatLng, zoom: u8) -> MapView {
    MapView {
        center: point,
        zoom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> CrashRecord {
        CrashRecord::from_fields(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    fn fields_of(lines: &[DetailLine]) -> Vec<&str> {
        lines.iter().map(|l| l.field.as_str()).collect()
    }

    #[test]
    fn popup_lists_fixed_fields_then_nonzero_numbers() {
        let crash = record(&[
            ("XCOORD", "397000.5"),
            ("FATAL_DRIVER", "0"),
            ("WARD", "Ward 6"),
            ("MAJORINJURIES_PEDESTRIAN", "2"),
            ("STREETSEGID", "abc"),
            ("ADDRESS", "1 M St"),
            ("LATITUDE", "38.9"),
            ("LONGITUDE", "-77.0"),
            ("DATE", "2024/01/01"),
            ("TOTAL_VEHICLES", " "),
            ("SPEEDING_INVOLVED", "1"),
        ]);

        let lines = detail_lines(&crash);

        assert_eq!(
            fields_of(&lines),
            [
                "LATITUDE",
                "LONGITUDE",
                "DATE",
                "ADDRESS",
                "WARD",
                "MAJORINJURIES_PEDESTRIAN",
                "SPEEDING_INVOLVED",
            ]
        );
    }

    #[test]
    fn blank_fixed_fields_are_omitted() {
        let crash = record(&[("LATITUDE", "38.9"), ("LONGITUDE", "-77"), ("ADDRESS", "  ")]);
        assert_eq!(fields_of(&detail_lines(&crash)), ["LATITUDE", "LONGITUDE"]);
    }

    #[test]
    fn popup_html_escapes_values() {
        let lines = vec![DetailLine {
            field: "ADDRESS".to_string(),
            value: "<b>Main & 1st</b>".to_string(),
        }];
        assert_eq!(
            popup_html(&lines),
            "<h4>Crash Details</h4><strong>ADDRESS:</strong> &lt;b&gt;Main &amp; 1st&lt;/b&gt;"
        );
    }

    #[test]
    fn unparsable_coordinates_are_not_mapped() {
        let good = record(&[("LATITUDE", "38.9"), ("LONGITUDE", "-77.0")]);
        let bad = record(&[("LATITUDE", "abc"), ("LONGITUDE", "-77.0")]);
        let blank = record(&[("LATITUDE", ""), ("LONGITUDE", "")]);

        let layer = marker_layer(&[&good, &bad, &blank], &MarkerOptions::default());

        assert_eq!(layer.len(), 1);
        assert_eq!(layer.positions().collect::<Vec<_>>(), [LatLng::new(38.9, -77.0)]);
        let geometry = layer.data.features[0].geometry.as_ref().unwrap();
        assert_eq!(geometry.value, Value::Point(vec![-77.0, 38.9]));
    }

    #[test]
    fn feature_carries_popup_and_ward() {
        let crash = record(&[
            ("DATE", "20240101"),
            ("WARD", "Ward 2"),
            ("LATITUDE", "38.9"),
            ("LONGITUDE", "-77.0"),
        ]);

        let feature = crash_feature(&crash).unwrap();
        let properties = feature.properties.unwrap();

        assert_eq!(properties["title"], "Crash Details");
        assert_eq!(properties["ward"], "Ward 2");
        assert_eq!(properties["year"], "2024");
        assert_eq!(properties["severity"], "None");
        assert_eq!(properties["details"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn focus_zooms_in_on_the_marker() {
        let view = focus_view(LatLng::new(38.9, -77.0), FOCUS_ZOOM);
        assert_eq!(view.zoom, 18);
        assert_eq!(view.center, LatLng::new(38.9, -77.0));
    }

    #[test]
    fn marker_style_serializes_for_leaflet() {
        let value = serde_json::to_value(MarkerStyle::default()).unwrap();
        assert_eq!(value["type"], "icon");
        assert_eq!(value["popupAnchor"], json!([0, -15]));
    }
}
