//! Filter controls as command-line flags.

use clap::Args;
use crash_map_crash_models::{FilterState, InjuryMode};

/// The six filter controls.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Year to show (defaults to the default year when the data has it)
    #[arg(long)]
    pub year: Option<String>,
    /// Show every year instead of the default year
    #[arg(long, conflicts_with = "year")]
    pub all_years: bool,
    /// Ward to show
    #[arg(long)]
    pub ward: Option<String>,
    /// Injury severity: all, high, low or none
    #[arg(long, default_value_t = InjuryMode::All, value_parser = InjuryMode::parse)]
    pub injury: InjuryMode,
    /// Only crashes with fatalities
    #[arg(long)]
    pub fatalities: bool,
    /// Only crashes involving pedestrians
    #[arg(long)]
    pub pedestrians: bool,
    /// Only crashes involving bicyclists
    #[arg(long)]
    pub bicyclists: bool,
}

impl FilterArgs {
    /// Builds the filter state. Without `--year` or `--all-years` the year
    /// starts at `default_year`, like the map does on first load.
    #[must_use]
    pub fn to_filter_state(&self, default_year: Option<&str>) -> FilterState {
        let year = if self.all_years {
            None
        } else {
            self.year.clone().or_else(|| default_year.map(str::to_string))
        };

        FilterState::default()
            .with_year(year)
            .with_ward(self.ward.clone())
            .with_injury(self.injury)
            .with_fatalities_only(self.fatalities)
            .with_pedestrians_only(self.pedestrians)
            .with_bicyclists_only(self.bicyclists)
    }
}
