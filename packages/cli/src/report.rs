//! Plain-text rendering of the working set and derived views.

use crash_map_crash_models::FilterState;
use crash_map_dashboard::DerivedViews;
use crash_map_source::WorkingSetSummary;

/// Widest text bar, in characters.
const BAR_WIDTH: u64 = 40;

/// Lines describing what was loaded.
#[must_use]
pub fn summary_lines(summary: &WorkingSetSummary, boundaries: usize) -> Vec<String> {
    vec![
        format!(
            "Crash records:   {} ({} excluded)",
            summary.record_count, summary.excluded_count
        ),
        format!("Ward boundaries: {boundaries}"),
        format!("Years:           {}", list_or_none(&summary.years)),
        format!("Wards:           {}", list_or_none(&summary.wards)),
        format!(
            "Default year:    {}",
            summary.default_year.as_deref().unwrap_or("(none)")
        ),
    ]
}

/// One-line description of a filter state.
#[must_use]
pub fn filter_line(state: &FilterState) -> String {
    format!(
        "year={} ward={} injury={} fatalities={} pedestrians={} bicyclists={}",
        state.year.as_deref().unwrap_or("(all)"),
        state.ward.as_deref().unwrap_or("(all)"),
        state.injury,
        on_off(state.fatalities_only),
        on_off(state.pedestrians_only),
        on_off(state.bicyclists_only),
    )
}

/// Lines describing every view of one filter state.
#[must_use]
pub fn views_lines(views: &DerivedViews) -> Vec<String> {
    let mut lines = vec![
        format!("Filter: {}", filter_line(&views.filter)),
        format!(
            "Crashes: {} ({} on the map)",
            views.counts.map, views.counts.mapped
        ),
        String::new(),
        views.donut.title.clone(),
    ];

    let severity_max = views.severity.iter().map(|c| c.count).max().unwrap_or(0);
    lines.extend(views.severity.iter().map(|c| {
        format!(
            "  {:<6} {:>7} {}",
            c.category.as_ref(),
            c.count,
            bar(c.count, severity_max)
        )
    }));

    lines.push(String::new());
    lines.push(views.bar.title.clone());

    let year_max = views.years.iter().map(|y| y.count).max().unwrap_or(0);
    if views.years.is_empty() {
        lines.push("  (no years)".to_string());
    }
    lines.extend(views.years.iter().map(|y| {
        let year = if y.year.is_empty() { "(blank)" } else { &y.year };
        format!("  {year:<6} {:>7} {}", y.count, bar(y.count, year_max))
    }));

    lines
}

/// Prints [`views_lines`].
pub fn print_views(views: &DerivedViews) {
    println!();
    for line in views_lines(views) {
        println!("{line}");
    }
    println!();
}

#[allow(clippy::cast_possible_truncation)]
fn bar(count: u64, max: u64) -> String {
    if max == 0 {
        return String::new();
    }
    let width = (count * BAR_WIDTH).div_ceil(max);
    "#".repeat(width as usize)
}

fn list_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}

const fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use crash_map_crash_models::{CrashRecord, InjuryMode};
    use crash_map_dashboard::{LoadedData, Settings, compute_views};
    use crash_map_geography::WardBoundaries;
    use crash_map_source::WorkingSet;

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
    fn bars_scale_to_the_largest_count() {
        assert_eq!(bar(10, 10).len(), 40);
        assert_eq!(bar(5, 10).len(), 20);
        assert_eq!(bar(1, 1000).len(), 1);
        assert_eq!(bar(0, 10), "");
        assert_eq!(bar(0, 0), "");
    }

    #[test]
    fn summary_lists_universes() {
        let working_set = WorkingSet::from_records(vec![
            record(&[("DATE", "20250101"), ("WARD", "Ward 2")]),
            record(&[("DATE", "20180101"), ("WARD", "Ward 2")]),
        ]);

        let lines = summary_lines(&working_set.summary(), 8);

        assert_eq!(lines[0], "Crash records:   1 (1 excluded)");
        assert_eq!(lines[1], "Ward boundaries: 8");
        assert_eq!(lines[3], "Wards:           Ward 2");
        assert_eq!(lines[4], "Default year:    2025");
    }

    #[test]
    fn filter_line_shows_unset_controls() {
        let state = FilterState::default()
            .with_ward(Some("Ward 1"))
            .with_injury(InjuryMode::Low)
            .with_fatalities_only(true);

        assert_eq!(
            filter_line(&state),
            "year=(all) ward=Ward 1 injury=low fatalities=on pedestrians=off bicyclists=off"
        );
    }

    #[test]
    fn views_report_counts_and_both_charts() {
        let data = LoadedData::new(
            WorkingSet::from_records(vec![
                record(&[("DATE", "20240101"), ("FATAL_DRIVER", "1")]),
                record(&[("DATE", "20250101")]),
            ]),
            WardBoundaries::new(Vec::new()),
        );
        let views = compute_views(&data, &FilterState::default(), &Settings::default());

        let lines = views_lines(&views);

        assert_eq!(lines[1], "Crashes: 2 (0 on the map)");
        assert_eq!(lines[3], "Crash Severity Distribution");
        assert!(lines[4].starts_with("  Fatal"));
        assert!(lines.iter().any(|l| l == "Crash Count by Year"));
        assert!(lines.iter().any(|l| l.starts_with("  2024")));
    }
}
