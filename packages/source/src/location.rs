//! Where a static data file lives.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{SourceError, retry};

/// A data file on disk or behind an HTTP URL.
///
/// Parsed from a plain string: anything starting with `http://` or
/// `https://` is a URL, everything else is a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataLocation {
    /// Local file path.
    Path(PathBuf),
    /// Remote URL.
    Url(String),
}

impl DataLocation {
    /// Reads the whole file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read or the download
    /// fails after retries.
    pub async fn read_text(&self, client: &reqwest::Client) -> Result<String, SourceError> {
        match self {
            Self::Path(path) => {
                log::debug!("Reading {}", path.display());
                Ok(tokio::fs::read_to_string(path).await?)
            }
            Self::Url(url) => {
                log::debug!("Downloading {url}");
                retry::get_text(client, url, retry::Backoff::default()).await
            }
        }
    }
}

impl From<String> for DataLocation {
    fn from(value: String) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value)
        } else {
            Self::Path(PathBuf::from(value))
        }
    }
}

impl From<&str> for DataLocation {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<DataLocation> for String {
    fn from(value: DataLocation) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for DataLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_urls_and_paths() {
        assert_eq!(
            DataLocation::from("https://example.com/crash.csv"),
            DataLocation::Url("https://example.com/crash.csv".to_string())
        );
        assert_eq!(
            DataLocation::from("data/crash.csv"),
            DataLocation::Path(PathBuf::from("data/crash.csv"))
        );
    }

    #[tokio::test]
    async fn reads_local_files() {
        let path = std::env::temp_dir().join("crash_map_location_test.csv");
        tokio::fs::write(&path, "DATE\n2024\n").await.unwrap();

        let text = DataLocation::Path(path.clone())
            .read_text(&reqwest::Client::new())
            .await
            .unwrap();

        assert_eq!(text, "DATE\n2024\n");
        tokio::fs::remove_file(path).await.ok();
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let result = DataLocation::from("/nonexistent/crash_map/crash.csv")
            .read_text(&reqwest::Client::new())
            .await;
        assert!(matches!(result, Err(SourceError::Io(_))));
    }
}
