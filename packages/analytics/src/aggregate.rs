//! Count aggregations for the severity and trend charts.

use std::collections::BTreeMap;

use crash_map_analytics_models::{SeverityCount, YearCount};
use crash_map_crash_models::{CrashRecord, SeverityBucket};

/// Buckets every record into exactly one severity bucket.
///
/// Always returns one entry per bucket in [`SeverityBucket::all`] order,
/// so the counts sum to `records.len()`.
#[must_use]
pub fn severity_counts(records: &[&CrashRecord]) -> Vec<SeverityCount> {
    let mut counts: BTreeMap<SeverityBucket, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.severity()).or_default() += 1;
    }

    SeverityBucket::all()
        .iter()
        .map(|&category| SeverityCount {
            category,
            count: counts.get(&category).copied().unwrap_or(0),
        })
        .collect()
}

/// Counts records per year for every year in `years`.
///
/// Years with no matching records still get a zero entry. Output follows
/// the order of `years`.
#[must_use]
pub fn year_counts<I, S>(records: &[&CrashRecord], years: I) -> Vec<YearCount>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.year()).or_default() += 1;
    }

    years
        .into_iter()
        .map(|year| {
            let year = year.as_ref();
            YearCount {
                year: year.to_string(),
                count: counts.get(year).copied().unwrap_or(0),
            }
        })
        .collect()
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

    #[test]
    fn severity_buckets_partition_records() {
        let records = [
            record(&[("FATAL_DRIVER", "1"), ("MAJORINJURIES_DRIVER", "1")]),
            record(&[("MAJORINJURIES_PEDESTRIAN", "1")]),
            record(&[("MINORINJURIES_BICYCLIST", "3")]),
            record(&[("MINORINJURIES_DRIVER", "1")]),
            record(&[]),
        ];
        let refs: Vec<&CrashRecord> = records.iter().collect();

        let counts = severity_counts(&refs);

        let pairs: Vec<(SeverityBucket, u64)> =
            counts.iter().map(|c| (c.category, c.count)).collect();
        assert_eq!(
            pairs,
            [
                (SeverityBucket::Fatal, 1),
                (SeverityBucket::Major, 1),
                (SeverityBucket::Minor, 2),
                (SeverityBucket::None, 1),
            ]
        );
        assert_eq!(
            crash_map_analytics_models::total(&counts),
            refs.len() as u64
        );
    }

    #[test]
    fn severity_counts_of_nothing_are_all_zero() {
        let counts = severity_counts(&[]);
        assert_eq!(counts.len(), 4);
        assert!(counts.iter().all(|c| c.count == 0));
    }

    #[test]
    fn every_known_year_gets_a_bar() {
        let records = [
            record(&[("DATE", "2021-01-01")]),
            record(&[("DATE", "2023-01-01")]),
            record(&[("DATE", "2023-02-01")]),
        ];
        let refs: Vec<&CrashRecord> = records.iter().collect();
        let years = ["2020", "2021", "2022", "2023"];

        let counts = year_counts(&refs, years);

        let pairs: Vec<(&str, u64)> = counts.iter().map(|c| (c.year.as_str(), c.count)).collect();
        assert_eq!(
            pairs,
            [("2020", 0), ("2021", 1), ("2022", 0), ("2023", 2)]
        );
    }

    #[test]
    fn empty_filtered_set_still_emits_every_year() {
        let counts = year_counts(&[], ["2019", "2020"]);
        assert_eq!(counts.len(), 2);
        assert!(counts.iter().all(|c| c.count == 0));
    }
}
