//! Crash CSV loading and the in-memory working set.
//!
//! The loader parses every row into a [`CrashRecord`], drops the excluded
//! year, and derives the year and ward universes the filter controls are
//! populated from. Years sort numerically, wards as strings.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::io::Read;
use std::sync::Arc;

use crash_map_crash_models::{CrashRecord, fields};
use serde::Serialize;

use crate::progress::ProgressCallback;
use crate::{DataLocation, SourceError};

/// Year whose records are dropped from the working set.
///
/// The 2018 export is known to be incomplete.
pub const EXCLUDED_YEAR: &str = "2018";

/// Year selected by default when present in the data.
pub const DEFAULT_YEAR: &str = "2025";

/// Number of parsed rows between progress updates.
const PROGRESS_BATCH: u64 = 1_000;

/// All crash records after year exclusion, plus the derived universes.
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    records: Vec<CrashRecord>,
    years: Vec<String>,
    wards: Vec<String>,
    excluded: usize,
}

/// Serializable overview of a [`WorkingSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingSetSummary {
    /// Records kept.
    pub record_count: usize,
    /// Records dropped by the year exclusion.
    pub excluded_count: usize,
    /// Distinct years, sorted.
    pub years: Vec<String>,
    /// Distinct known wards, sorted.
    pub wards: Vec<String>,
    /// Year preselected in the year control.
    pub default_year: Option<String>,
}

impl WorkingSet {
    /// Builds the working set from freshly parsed records.
    #[must_use]
    pub fn from_records(records: Vec<CrashRecord>) -> Self {
        let total = records.len();
        let records: Vec<CrashRecord> = records
            .into_iter()
            .filter(|r| r.year() != EXCLUDED_YEAR)
            .collect();
        let excluded = total - records.len();

        let years: BTreeSet<&str> = records.iter().map(CrashRecord::year).collect();
        let wards: BTreeSet<&str> = records
            .iter()
            .filter_map(CrashRecord::ward)
            .filter(|ward| fields::is_known_ward(ward))
            .collect();

        let mut years: Vec<String> = years.into_iter().map(str::to_string).collect();
        years.sort_by(|a, b| compare_years(a, b));
        let wards = wards.into_iter().map(str::to_string).collect();

        Self {
            records,
            years,
            wards,
            excluded,
        }
    }

    /// Records in source order.
    #[must_use]
    pub fn records(&self) -> &[CrashRecord] {
        &self.records
    }

    /// Year universe, sorted as strings.
    #[must_use]
    pub fn years(&self) -> &[String] {
        &self.years
    }

    /// Ward universe, sorted as strings, sentinels removed.
    #[must_use]
    pub fn wards(&self) -> &[String] {
        &self.wards
    }

    /// Number of records dropped by [`EXCLUDED_YEAR`].
    #[must_use]
    pub const fn excluded_count(&self) -> usize {
        self.excluded
    }

    /// Number of records kept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// [`DEFAULT_YEAR`] if it is in the year universe.
    #[must_use]
    pub fn default_year(&self) -> Option<&str> {
        self.years
            .iter()
            .find(|y| *y == DEFAULT_YEAR)
            .map(String::as_str)
    }

    /// Overview for logging and the filter-options endpoint.
    #[must_use]
    pub fn summary(&self) -> WorkingSetSummary {
        WorkingSetSummary {
            record_count: self.records.len(),
            excluded_count: self.excluded,
            years: self.years.clone(),
            wards: self.wards.clone(),
            default_year: self.default_year().map(str::to_string),
        }
    }
}

/// Orders year labels by numeric value. Labels that are not integers sort
/// after all numeric ones, as strings.
fn compare_years(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Parses crash CSV text into records.
///
/// Rows may have fewer or more cells than the header; missing cells are
/// treated as empty and extra cells are ignored. Header names are
/// trimmed; values are kept as written.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the CSV is malformed.
pub fn parse_csv<R: Read>(
    reader: R,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<CrashRecord>, SourceError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let columns = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), row.get(i).unwrap_or("").to_owned()))
            .collect();
        records.push(CrashRecord::from_fields(columns));

        if records.len() as u64 % PROGRESS_BATCH == 0 {
            progress.inc(PROGRESS_BATCH);
        }
    }
    progress.inc(records.len() as u64 % PROGRESS_BATCH);

    Ok(records)
}

/// Loads and parses the crash CSV into a [`WorkingSet`].
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or parsed.
#[allow(clippy::future_not_send)]
pub async fn load_working_set(
    location: &DataLocation,
    client: &reqwest::Client,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<WorkingSet, SourceError> {
    progress.set_message(format!("Loading crashes from {location}"));
    let text = location.read_text(client).await?;
    progress.set_total(text.lines().count().saturating_sub(1) as u64);
    let records = parse_csv(text.as_bytes(), progress)?;
    let working_set = WorkingSet::from_records(records);

    log::info!(
        "Loaded {} crash records from {location} ({} from {EXCLUDED_YEAR} excluded, {} years, {} wards)",
        working_set.len(),
        working_set.excluded_count(),
        working_set.years().len(),
        working_set.wards().len()
    );
    progress.finish(format!("Loaded {} crash records", working_set.len()));

    Ok(working_set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::null_progress;

    const CSV: &str = "\
DATE , WARD,FATAL_DRIVER,LATITUDE,LONGITUDE
20240101,Ward 3,1,38.9,-77.0
20230505,Ward 3,0,abc,-77.0
20180704,Ward 1,0,38.9,-77.0
20250101,Unknown,0,38.9,-77.0
20250202,Ward 10,2
20220101,null,0,38.9,-77.0
";

    fn working_set() -> WorkingSet {
        WorkingSet::from_records(parse_csv(CSV.as_bytes(), &null_progress()).unwrap())
    }

    #[test]
    fn parses_rows_with_trimmed_headers() {
        let records = parse_csv(CSV.as_bytes(), &null_progress()).unwrap();
        assert_eq!(records.len(), 6);
        assert_eq!(records[0].get("DATE"), Some("20240101"));
        assert_eq!(records[0].year(), "2024");
        assert_eq!(records[4].get("LATITUDE"), Some(""));
    }

    #[test]
    fn excludes_2018_records() {
        let set = working_set();
        assert_eq!(set.len(), 5);
        assert_eq!(set.excluded_count(), 1);
        assert!(set.records().iter().all(|r| r.year() != EXCLUDED_YEAR));
    }

    #[test]
    fn year_universe_is_sorted_and_distinct() {
        assert_eq!(working_set().years(), ["2022", "2023", "2024", "2025"]);
    }

    #[test]
    fn years_sort_by_value_with_labels_last() {
        let csv = "DATE\n9/1/2020\n20240101\n999\n10000101\n20240101\n";
        let set = WorkingSet::from_records(parse_csv(csv.as_bytes(), &null_progress()).unwrap());

        assert_eq!(set.years(), ["999", "1000", "2024", "9/1/"]);
    }

    #[test]
    fn values_keep_their_padding() {
        let csv = "DATE, WARD \n20240101,Ward 3\n20240101, Ward 3 \n";
        let records = parse_csv(csv.as_bytes(), &null_progress()).unwrap();
        assert_eq!(records[1].ward(), Some(" Ward 3 "));

        let set = WorkingSet::from_records(records);
        assert_eq!(set.wards(), [" Ward 3 ", "Ward 3"]);
    }

    #[test]
    fn ward_universe_sorts_as_strings_and_drops_sentinels() {
        assert_eq!(working_set().wards(), ["Ward 10", "Ward 3"]);
    }

    #[test]
    fn default_year_is_2025_when_present() {
        assert_eq!(working_set().default_year(), Some(DEFAULT_YEAR));

        let without = WorkingSet::from_records(
            parse_csv("DATE\n20240101\n".as_bytes(), &null_progress()).unwrap(),
        );
        assert_eq!(without.default_year(), None);
    }

    #[test]
    fn empty_working_set_has_no_universes() {
        let set = WorkingSet::default();
        assert!(set.is_empty());
        assert!(set.years().is_empty());
        assert_eq!(set.summary().default_year, None);
    }

    #[tokio::test]
    async fn loads_from_a_file() {
        let path = std::env::temp_dir().join("crash_map_loader_test.csv");
        tokio::fs::write(&path, CSV).await.unwrap();

        let set = load_working_set(
            &DataLocation::Path(path.clone()),
            &reqwest::Client::new(),
            &null_progress(),
        )
        .await
        .unwrap();

        assert_eq!(set.len(), 5);
        tokio::fs::remove_file(path).await.ok();
    }
}
