#![allow(clippy::module_name_repetitions)]

//! Interactive filter explorer.
//!
//! Drives a [`Dashboard`] from `dialoguer` menus: every control change
//! goes through [`Dashboard::apply`], and a [`ReportObserver`] prints the
//! recomputed views, the same way the map page redraws its layers and
//! charts.

use std::sync::Arc;

use crash_map_analytics::filter_records;
use crash_map_crash_models::{CrashRecord, InjuryMode, YearScope};
use crash_map_dashboard::{Dashboard, DerivedViews, LoadedData, Settings, ViewObserver};
use crash_map_geography_models::{Frame, LatLng};
use crash_map_render::markers::{POPUP_TITLE, detail_lines};
use dialoguer::{Input, Select};

use crate::report;

/// How many crashes "Show crashes" lists.
const CRASH_LIST_LIMIT: usize = 10;

const ALL_YEARS: &str = "(all years)";
const ALL_WARDS: &str = "(all wards)";

/// Prints the views after every change.
struct ReportObserver;

impl ViewObserver for ReportObserver {
    fn views_changed(&self, views: &DerivedViews) {
        report::print_views(views);
    }
}

enum ExploreAction {
    Year,
    Ward,
    Injury,
    Fatalities,
    Pedestrians,
    Bicyclists,
    ClickMap,
    ClearWard,
    ShowCrashes,
    Reset,
    Quit,
}

impl ExploreAction {
    const ALL: &[Self] = &[
        Self::Year,
        Self::Ward,
        Self::Injury,
        Self::Fatalities,
        Self::Pedestrians,
        Self::Bicyclists,
        Self::ClickMap,
        Self::ClearWard,
        Self::ShowCrashes,
        Self::Reset,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Year => "Select year",
            Self::Ward => "Select ward",
            Self::Injury => "Select injury severity",
            Self::Fatalities => "Toggle fatalities only",
            Self::Pedestrians => "Toggle pedestrians involved",
            Self::Bicyclists => "Toggle bicyclists involved",
            Self::ClickMap => "Click the map (select ward at a point)",
            Self::ClearWard => "Clear ward",
            Self::ShowCrashes => "Show crashes",
            Self::Reset => "Reset view and filters",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the explorer until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails (e.g. the terminal is not
/// interactive).
pub fn run(data: Arc<LoadedData>, settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let mut dashboard = Dashboard::new(data, settings);
    report::print_views(dashboard.views());
    dashboard.subscribe(Arc::new(ReportObserver));

    let labels: Vec<&str> = ExploreAction::ALL.iter().map(ExploreAction::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let state = dashboard.state().clone();

        match ExploreAction::ALL[idx] {
            ExploreAction::Year => {
                let year = select_optional(
                    "Year",
                    ALL_YEARS,
                    dashboard.data().working_set.years(),
                    state.year.as_deref(),
                )?;
                dashboard.apply(state.with_year(year));
            }
            ExploreAction::Ward => {
                let ward = select_optional(
                    "Ward",
                    ALL_WARDS,
                    dashboard.data().working_set.wards(),
                    state.ward.as_deref(),
                )?;
                dashboard.apply(state.with_ward(ward));
            }
            ExploreAction::Injury => {
                let modes = InjuryMode::all();
                let labels: Vec<String> = modes.iter().map(ToString::to_string).collect();
                let current = modes.iter().position(|m| *m == state.injury).unwrap_or(0);
                let idx = Select::new()
                    .with_prompt("Injury severity")
                    .items(&labels)
                    .default(current)
                    .interact()?;
                dashboard.apply(state.with_injury(modes[idx]));
            }
            ExploreAction::Fatalities => {
                let on = !state.fatalities_only;
                dashboard.apply(state.with_fatalities_only(on));
            }
            ExploreAction::Pedestrians => {
                let on = !state.pedestrians_only;
                dashboard.apply(state.with_pedestrians_only(on));
            }
            ExploreAction::Bicyclists => {
                let on = !state.bicyclists_only;
                dashboard.apply(state.with_bicyclists_only(on));
            }
            ExploreAction::ClickMap => {
                let point = prompt_point()?;
                match dashboard.select_ward_at(point) {
                    Some(selection) => {
                        println!("Selected {}", selection.ward);
                        if let Some(frame) = selection.frame {
                            println!("Map moves to {}", describe_frame(&frame));
                        }
                    }
                    None => println!("No ward at {}, {}", point.lat, point.lng),
                }
            }
            ExploreAction::ClearWard => {
                dashboard.clear_ward();
            }
            ExploreAction::ShowCrashes => show_crashes(&dashboard),
            ExploreAction::Reset => {
                let initial = Dashboard::initial_state(dashboard.data());
                println!("Map moves to {}", describe_frame(&dashboard.reset_view()));
                dashboard.apply(initial);
            }
            ExploreAction::Quit => break,
        }
    }

    Ok(())
}

/// Select with an "all" entry first. Returns `None` for the "all" entry.
fn select_optional(
    prompt: &str,
    all_label: &str,
    options: &[String],
    current: Option<&str>,
) -> Result<Option<String>, dialoguer::Error> {
    let labels: Vec<&str> = std::iter::once(all_label)
        .chain(options.iter().map(String::as_str))
        .collect();
    let default = current
        .and_then(|c| options.iter().position(|o| o == c))
        .map_or(0, |i| i + 1);

    let idx = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(default)
        .max_length(20)
        .interact()?;

    Ok(idx.checked_sub(1).map(|i| options[i].clone()))
}

fn prompt_point() -> Result<LatLng, dialoguer::Error> {
    let lat: f64 = Input::new().with_prompt("Latitude").interact_text()?;
    let lng: f64 = Input::new().with_prompt("Longitude").interact_text()?;
    Ok(LatLng::new(lat, lng))
}

fn show_crashes(dashboard: &Dashboard) {
    let records = filter_records(
        dashboard.data().working_set.records(),
        dashboard.state(),
        YearScope::Apply,
    );
    let listable = mappable(&records);

    for (record, point) in listable.iter().take(CRASH_LIST_LIMIT) {
        println!();
        println!("{POPUP_TITLE}");
        for line in detail_lines(record) {
            println!("  {}: {}", line.field, line.value);
        }
        let focus = dashboard.focus(*point);
        println!(
            "  (focus: {}, {} at zoom {})",
            focus.center.lat, focus.center.lng, focus.zoom
        );
    }

    if let Some(line) = more_line(listable.len()) {
        println!();
        println!("{line}");
    }
    println!();
}

/// Records that can be placed on the map, with their position.
fn mappable<'a>(records: &[&'a CrashRecord]) -> Vec<(&'a CrashRecord, LatLng)> {
    records
        .iter()
        .filter_map(|record| {
            let (lat, lng) = record.coordinates()?;
            Some((*record, LatLng::new(lat, lng)))
        })
        .collect()
}

/// Trailer for a crash list of `listable` entries cut at the limit.
fn more_line(listable: usize) -> Option<String> {
    listable
        .checked_sub(CRASH_LIST_LIMIT)
        .filter(|more| *more > 0)
        .map(|more| format!("... {more} more"))
}

fn describe_frame(frame: &Frame) -> String {
    match frame {
        Frame::Bounds { bounds } => format!(
            "bounds {}, {} to {}, {}",
            bounds.south, bounds.west, bounds.north, bounds.east
        ),
        Frame::Center { center } => format!("centre {}, {}", center.lat, center.lng),
        Frame::View { view } => format!(
            "{}, {} at zoom {}",
            view.center.lat, view.center.lng, view.zoom
        ),
    }
}
