#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregated count types consumed by the chart renderers.
//!
//! These are the `{category, count}` and `{year, count}` tuples the
//! severity and trend charts are drawn from. They are separate from the
//! filter engine so renderers and the HTTP layer can depend on them
//! without pulling in the engine.

use crash_map_crash_models::SeverityBucket;
use serde::{Deserialize, Serialize};

/// Number of filtered crashes in one severity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCount {
    /// Severity bucket.
    pub category: SeverityBucket,
    /// Number of crashes.
    pub count: u64,
}

/// Number of filtered crashes in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCount {
    /// Year label as it appears in the year universe.
    pub year: String,
    /// Number of crashes.
    pub count: u64,
}

/// Sum of all counts in a series.
#[must_use]
pub fn total<'a>(counts: impl IntoIterator<Item = &'a SeverityCount>) -> u64 {
    counts.into_iter().map(|c| c.count).sum()
}
