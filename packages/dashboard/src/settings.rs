//! Rendering settings derived from configuration.

use crash_map_geography_models::{LatLng, MapView};
use crash_map_render::{MarkerOptions, MarkerStyle};
use crash_map_source::CrashMapConfig;

/// Everything the view pipeline needs besides data and filter state.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// View the reset control returns to.
    pub original_view: MapView,
    /// Zoom used when a marker is selected.
    pub focus_zoom: u8,
    /// Marker presentation.
    pub markers: MarkerOptions,
    /// Chart width in pixels.
    pub chart_width: u32,
    /// Chart height in pixels.
    pub chart_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&CrashMapConfig::default())
    }
}

impl From<&CrashMapConfig> for Settings {
    fn from(config: &CrashMapConfig) -> Self {
        let map = &config.map;
        let style = if map.marker_icon.trim().is_empty() {
            MarkerStyle::Circle {
                radius: map.marker_radius,
                color: map.marker_color.clone(),
            }
        } else {
            MarkerStyle::icon(map.marker_icon.clone())
        };

        Self {
            original_view: MapView {
                center: LatLng::new(map.center_lat, map.center_lng),
                zoom: map.zoom,
            },
            focus_zoom: map.focus_zoom,
            markers: MarkerOptions {
                style,
                cluster: map.cluster,
                cluster_radius: map.cluster_radius,
            },
            chart_width: config.charts.width,
            chart_height: config.charts.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_center_on_dc() {
        let settings = Settings::default();
        assert_eq!(settings.original_view.center, LatLng::new(38.9072, -77.0369));
        assert_eq!(settings.original_view.zoom, 12);
        assert_eq!(settings.focus_zoom, 18);
        assert_eq!(settings.markers.style, MarkerStyle::icon("img/crash.png"));
    }

    #[test]
    fn empty_icon_falls_back_to_circles() {
        let mut config = CrashMapConfig::default();
        config.map.marker_icon = String::new();
        config.map.cluster = false;

        let settings = Settings::from(&config);

        assert!(matches!(settings.markers.style, MarkerStyle::Circle { radius: 6, .. }));
        assert!(!settings.markers.cluster);
    }
}
