#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crash data loading and configuration.
//!
//! Reads the crash CSV and the raw boundary document from a
//! [`DataLocation`] (local file or HTTP URL), builds the [`WorkingSet`]
//! the rest of the system filters, and parses the TOML configuration.

pub mod config;
pub mod loader;
pub mod location;
pub mod progress;
pub mod retry;

pub use config::CrashMapConfig;
pub use loader::{DEFAULT_YEAR, EXCLUDED_YEAR, WorkingSet, WorkingSetSummary};
pub use location::DataLocation;

/// Errors that can occur while loading crash data or configuration.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration file is not valid TOML for [`CrashMapConfig`].
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The remote server answered with a non-success status.
    #[error("Fetch failed: {message}")]
    Fetch {
        /// Description of what went wrong.
        message: String,
    },
}
