//! Composed filter predicate over crash records.
//!
//! A record passes when every [`Clause`] in [`Clause::ORDER`] passes.
//! Evaluation stops at the first failing clause. Filtering never mutates
//! a record and always preserves the working set's order.

use crash_map_crash_models::{CrashRecord, FilterState, InjuryMode, YearScope};

/// One predicate clause of the filter engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    /// Record year equals the selected year.
    Year,
    /// Record ward equals the selected ward.
    Ward,
    /// At least one fatality.
    Fatalities,
    /// At least one pedestrian involved.
    Pedestrians,
    /// At least one bicycle involved.
    Bicyclists,
    /// Injury counts fit the selected [`InjuryMode`].
    Injury,
}

impl Clause {
    /// Evaluation order.
    pub const ORDER: [Self; 6] = [
        Self::Year,
        Self::Ward,
        Self::Fatalities,
        Self::Pedestrians,
        Self::Bicyclists,
        Self::Injury,
    ];

    /// Whether `record` passes this clause. Clauses whose control is unset
    /// always pass.
    #[must_use]
    pub fn passes(self, record: &CrashRecord, state: &FilterState, scope: YearScope) -> bool {
        let casualties = record.casualties();

        match self {
            Self::Year => match (&state.year, scope) {
                (Some(year), YearScope::Apply) => record.year() == year,
                _ => true,
            },
            Self::Ward => state
                .ward
                .as_deref()
                .is_none_or(|ward| record.ward() == Some(ward)),
            Self::Fatalities => !state.fatalities_only || is_nonzero(casualties.fatal.total()),
            Self::Pedestrians => {
                !state.pedestrians_only || is_nonzero(casualties.total_pedestrians)
            }
            Self::Bicyclists => !state.bicyclists_only || is_nonzero(casualties.total_bicycles),
            Self::Injury => {
                let major = casualties.major.total();
                let minor = casualties.minor.total();
                match state.injury {
                    InjuryMode::All => true,
                    InjuryMode::High => major > 0.0,
                    InjuryMode::Low => !is_nonzero(major) && minor > 0.0,
                    InjuryMode::None => !is_nonzero(major) && !is_nonzero(minor),
                }
            }
        }
    }
}

#[allow(clippy::float_cmp)]
fn is_nonzero(value: f64) -> bool {
    value != 0.0
}

/// Whether `record` passes every clause.
#[must_use]
pub fn matches(record: &CrashRecord, state: &FilterState, scope: YearScope) -> bool {
    Clause::ORDER
        .iter()
        .all(|clause| clause.passes(record, state, scope))
}

/// Returns the records passing the filter, in their original order.
#[must_use]
pub fn filter_records<'a>(
    records: &'a [CrashRecord],
    state: &FilterState,
    scope: YearScope,
) -> Vec<&'a CrashRecord> {
    records
        .iter()
        .filter(|record| matches(record, state, scope))
        .collect()
}

/// The three differently-scoped filtered views drawn on every update.
#[derive(Debug, Clone)]
pub struct FilteredViews<'a> {
    /// Map markers (year applied).
    pub map: Vec<&'a CrashRecord>,
    /// Severity chart (year applied).
    pub donut: Vec<&'a CrashRecord>,
    /// Trend chart (year ignored).
    pub bar: Vec<&'a CrashRecord>,
}

impl<'a> FilteredViews<'a> {
    /// Filters `records` for each view.
    #[must_use]
    pub fn compute(records: &'a [CrashRecord], state: &FilterState) -> Self {
        let map = filter_records(records, state, YearScope::Apply);
        let donut = map.clone();
        let bar = if state.year.is_some() {
            filter_records(records, state, YearScope::Ignore)
        } else {
            map.clone()
        };

        log::debug!(
            "Filtered {} records: map={} donut={} bar={}",
            records.len(),
            map.len(),
            donut.len(),
            bar.len()
        );

        Self { map, donut, bar }
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

    fn dates(records: &[&CrashRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.get("DATE").unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn fatalities_only_keeps_fatal_records() {
        let records = vec![
            record(&[("DATE", "20240101"), ("WARD", "3"), ("FATAL_DRIVER", "1")]),
            record(&[("DATE", "20230505"), ("WARD", "3"), ("FATAL_DRIVER", "0")]),
        ];
        let state = FilterState::default().with_fatalities_only(true);

        let result = filter_records(&records, &state, YearScope::Apply);

        assert_eq!(dates(&result), ["20240101"]);
    }

    #[test]
    fn fatality_sum_spans_victim_categories() {
        let records = vec![
            record(&[("FATAL_PEDESTRIAN", "1")]),
            record(&[("FATAL_BICYCLIST", " 2 ")]),
            record(&[("FATAL_DRIVER", "x"), ("FATAL_PEDESTRIAN", "")]),
        ];
        let state = FilterState::default().with_fatalities_only(true);

        assert_eq!(filter_records(&records, &state, YearScope::Apply).len(), 2);
    }

    #[test]
    fn low_injury_mode() {
        let r = record(&[
            ("MAJORINJURIES_DRIVER", "0"),
            ("MINORINJURIES_PEDESTRIAN", "2"),
        ]);
        let low = FilterState::default().with_injury(InjuryMode::Low);
        let high = FilterState::default().with_injury(InjuryMode::High);

        assert!(matches(&r, &low, YearScope::Apply));
        assert!(!matches(&r, &high, YearScope::Apply));
    }

    #[test]
    fn none_injury_mode_requires_no_injuries() {
        let none = FilterState::default().with_injury(InjuryMode::None);
        assert!(matches(&record(&[]), &none, YearScope::Apply));
        assert!(!matches(
            &record(&[("MINORINJURIES_DRIVER", "1")]),
            &none,
            YearScope::Apply
        ));
        assert!(!matches(
            &record(&[("MAJORINJURIES_BICYCLIST", "1")]),
            &none,
            YearScope::Apply
        ));
    }

    #[test]
    fn pedestrian_clause_treats_missing_as_zero() {
        let state = FilterState::default().with_pedestrians_only(true);
        assert!(!matches(&record(&[]), &state, YearScope::Apply));
        assert!(matches(
            &record(&[("TOTAL_PEDESTRIANS", "1")]),
            &state,
            YearScope::Apply
        ));
    }

    #[test]
    fn bicyclist_clause_reads_total_bicycles_only() {
        let state = FilterState::default().with_bicyclists_only(true);
        assert!(matches(
            &record(&[("TOTAL_BICYCLES", "1")]),
            &state,
            YearScope::Apply
        ));
        // The misspelled TOTAL_PEDESTRIQUES column from older page builds is
        // not a bicyclist signal.
        assert!(!matches(
            &record(&[("TOTAL_PEDESTRIQUES", "4"), ("TOTAL_BICYCLES", "0")]),
            &state,
            YearScope::Apply
        ));
    }

    #[test]
    fn ignore_scope_skips_year_only() {
        let records = vec![
            record(&[("DATE", "2024-01-01"), ("WARD", "1")]),
            record(&[("DATE", "2023-01-01"), ("WARD", "1")]),
            record(&[("DATE", "2023-06-01"), ("WARD", "2")]),
        ];
        let state = FilterState::default()
            .with_year(Some("2024"))
            .with_ward(Some("1"));

        let views = FilteredViews::compute(&records, &state);

        assert_eq!(views.map.len(), 1);
        assert_eq!(views.donut.len(), 1);
        assert_eq!(dates(&views.bar), ["2024-01-01", "2023-01-01"]);
    }

    #[test]
    fn ward_round_trip_restores_unconstrained_result() {
        let records = vec![
            record(&[("WARD", "1"), ("TOTAL_PEDESTRIANS", "1")]),
            record(&[("WARD", "2"), ("TOTAL_PEDESTRIANS", "1")]),
            record(&[("WARD", "2")]),
        ];
        let base = FilterState::default().with_pedestrians_only(true);
        let before = filter_records(&records, &base, YearScope::Apply);

        let selected = base.clone().with_ward(Some("2"));
        assert_eq!(filter_records(&records, &selected, YearScope::Apply).len(), 1);

        let cleared = selected.with_ward(None::<String>);
        assert_eq!(cleared, base);
        assert_eq!(filter_records(&records, &cleared, YearScope::Apply), before);
    }

    #[test]
    fn filtering_preserves_order() {
        let records: Vec<CrashRecord> = (0..5)
            .map(|i| {
                let date = format!("202{i}0101");
                record(&[("DATE", date.as_str()), ("TOTAL_BICYCLES", "1")])
            })
            .collect();
        let state = FilterState::default().with_bicyclists_only(true);

        let result = filter_records(&records, &state, YearScope::Apply);

        assert_eq!(
            dates(&result),
            ["20200101", "20210101", "20220101", "20230101", "20240101"]
        );
    }
}
