#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter engine and chart aggregations for crash records.
//!
//! [`filter`] evaluates a [`FilterState`](crash_map_crash_models::FilterState)
//! against the working set and produces the three scoped views the map and
//! charts are drawn from. [`aggregate`] turns those views into the count
//! series the chart renderers consume.

pub mod aggregate;
pub mod filter;

pub use aggregate::{severity_counts, year_counts};
pub use filter::{Clause, FilteredViews, filter_records, matches};
