//! TOML configuration.
//!
//! The default configuration is embedded at compile time via
//! [`include_str!`]. Every table and key is optional; anything missing
//! falls back to the embedded defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{DataLocation, SourceError};

/// Embedded default configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../crash_map.toml");

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "CRASH_MAP_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrashMapConfig {
    /// Input files.
    pub data: DataConfig,
    /// Map view and marker settings.
    pub map: MapConfig,
    /// Chart dimensions.
    pub charts: ChartConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
}

/// Input file locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Crash CSV.
    pub crashes: DataLocation,
    /// Ward boundary `GeoJSON`.
    pub boundaries: DataLocation,
    /// Boundary feature property holding the ward identifier.
    pub ward_property: String,
}

/// Map view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Latitude of the original view.
    pub center_lat: f64,
    /// Longitude of the original view.
    pub center_lng: f64,
    /// Zoom of the original view.
    pub zoom: u8,
    /// Zoom used when focusing a single crash.
    pub focus_zoom: u8,
    /// Whether markers are grouped into clusters.
    pub cluster: bool,
    /// Marker cluster radius in pixels.
    pub cluster_radius: u32,
    /// Marker icon image. An empty value draws plain circle markers.
    pub marker_icon: String,
    /// Circle marker radius in pixels.
    pub marker_radius: u32,
    /// Circle marker color.
    pub marker_color: String,
}

/// Chart canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Directory of static frontend files, served at `/`.
    pub static_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            crashes: DataLocation::from("data/Crashes_in_DC.csv"),
            boundaries: DataLocation::from("data/Wards_from_2022.geojson"),
            ward_property: "WARD".to_string(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: 38.9072,
            center_lng: -77.0369,
            zoom: 12,
            focus_zoom: 18,
            cluster: true,
            cluster_radius: 80,
            marker_icon: "img/crash.png".to_string(),
            marker_radius: 6,
            marker_color: "#3388ff".to_string(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            static_dir: PathBuf::from("app/dist"),
        }
    }
}

impl CrashMapConfig {
    /// Parses configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the text is not valid TOML or a
    /// key has the wrong type.
    pub fn parse(text: &str) -> Result<Self, SourceError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Loads configuration from `path`, else from [`CONFIG_ENV`], else
    /// from the embedded defaults, then applies the `BIND_ADDR` and `PORT`
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, SourceError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                Self::parse(&std::fs::read_to_string(&path)?)?
            }
            None => Self::parse(DEFAULT_CONFIG)?,
        };

        if let Ok(bind_addr) = std::env::var("BIND_ADDR") {
            config.server.bind_addr = bind_addr;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            config.server.port = port;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_matches_defaults() {
        let config = CrashMapConfig::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, CrashMapConfig::default());
    }

    #[test]
    fn missing_tables_fall_back_to_defaults() {
        let config = CrashMapConfig::parse(
            r#"
            [data]
            crashes = "https://example.com/crashes.csv"

            [server]
            port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(
            config.data.crashes,
            DataLocation::Url("https://example.com/crashes.csv".to_string())
        );
        assert_eq!(config.data.ward_property, "WARD");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_addr, "127.0.0.1");
        assert_eq!(config.map.focus_zoom, 18);
    }

    #[test]
    fn wrong_types_are_config_errors() {
        let result = CrashMapConfig::parse("[server]\nport = \"eighty\"\n");
        assert!(matches!(result, Err(SourceError::Config(_))));
    }

    #[test]
    fn loads_an_explicit_file() {
        let path = std::env::temp_dir().join("crash_map_config_test.toml");
        std::fs::write(&path, "[charts]\nwidth = 640\n").unwrap();

        let config = CrashMapConfig::load(Some(&path)).unwrap();

        assert_eq!(config.charts.width, 640);
        assert_eq!(config.charts.height, 300);
        std::fs::remove_file(path).ok();
    }
}
