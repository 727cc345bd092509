//! Filter state to rendered views.

use crash_map_analytics::{FilteredViews, severity_counts, year_counts};
use crash_map_analytics_models::{SeverityCount, YearCount};
use crash_map_crash_models::FilterState;
use crash_map_render::{BarChart, DonutChart, MarkerLayer, bar_chart, donut_chart, marker_layer};
use serde::Serialize;

use crate::{LoadedData, Settings};

/// Record counts behind each view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewCounts {
    /// Records passing the map filter.
    pub map: usize,
    /// Of those, records with a usable position.
    pub mapped: usize,
    /// Records in the severity chart.
    pub donut: usize,
    /// Records in the trend chart (year ignored).
    pub bar: usize,
}

/// Everything drawn for one filter state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedViews {
    /// State the views were computed from.
    pub filter: FilterState,
    pub counts: ViewCounts,
    pub markers: MarkerLayer,
    pub severity: Vec<SeverityCount>,
    pub years: Vec<YearCount>,
    pub donut: DonutChart,
    pub bar: BarChart,
}

/// Recomputes every view for `state`.
#[must_use]
pub fn compute_views(data: &LoadedData, state: &FilterState, settings: &Settings) -> DerivedViews {
    let working_set = &data.working_set;
    let filtered = FilteredViews::compute(working_set.records(), state);

    let markers = marker_layer(&filtered.map, &settings.markers);
    let severity = severity_counts(&filtered.donut);
    let years = year_counts(&filtered.bar, working_set.years());

    let donut = donut_chart(
        &severity,
        state.year.as_deref(),
        settings.chart_width,
        settings.chart_height,
    );
    let bar = bar_chart(&years, settings.chart_width, settings.chart_height);

    DerivedViews {
        filter: state.clone(),
        counts: ViewCounts {
            map: filtered.map.len(),
            mapped: markers.len(),
            donut: filtered.donut.len(),
            bar: filtered.bar.len(),
        },
        markers,
        severity,
        years,
        donut,
        bar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crash_map_crash_models::{CrashRecord, SeverityBucket};
    use crash_map_geography::WardBoundaries;
    use crash_map_source::WorkingSet;

    fn record(pairs: &[(&str, &str)]) -> CrashRecord {
        CrashRecord::from_fields(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    fn data() -> LoadedData {
        let records = vec![
            record(&[
                ("DATE", "20240101"),
                ("WARD", "Ward 3"),
                ("FATAL_DRIVER", "1"),
                ("LATITUDE", "38.9"),
                ("LONGITUDE", "-77.0"),
            ]),
            record(&[
                ("DATE", "20240505"),
                ("WARD", "Ward 3"),
                ("MINORINJURIES_DRIVER", "1"),
                ("LATITUDE", "abc"),
                ("LONGITUDE", "-77.0"),
            ]),
            record(&[("DATE", "20230505"), ("WARD", "Ward 1")]),
        ];
        LoadedData::new(WorkingSet::from_records(records), WardBoundaries::new(Vec::new()))
    }

    #[test]
    fn bad_coordinates_are_charted_but_not_mapped() {
        let state = FilterState::default().with_year(Some("2024"));

        let views = compute_views(&data(), &state, &Settings::default());

        assert_eq!(views.counts.map, 2);
        assert_eq!(views.counts.mapped, 1);
        assert_eq!(views.counts.donut, 2);
        let minor = views
            .severity
            .iter()
            .find(|c| c.category == SeverityBucket::Minor)
            .unwrap();
        assert_eq!(minor.count, 1);
    }

    #[test]
    fn trend_chart_ignores_the_year() {
        let state = FilterState::default().with_year(Some("2024"));

        let views = compute_views(&data(), &state, &Settings::default());

        let years: Vec<(&str, u64)> = views.years.iter().map(|y| (y.year.as_str(), y.count)).collect();
        assert_eq!(years, [("2023", 1), ("2024", 2)]);
        assert_eq!(views.bar.bars.len(), 2);
        assert_eq!(views.donut.title, "Crash Severity Distribution for 2024");
    }

    #[test]
    fn empty_working_set_still_renders() {
        let views = compute_views(&LoadedData::default(), &FilterState::default(), &Settings::default());
        assert!(views.markers.is_empty());
        assert!(views.years.is_empty());
        assert_eq!(views.severity.len(), 4);
    }
}
