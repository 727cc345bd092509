//! Per-year trend bar chart.

use crash_map_analytics_models::YearCount;
use plotters::coord::ranged1d::Ranged;
use plotters::coord::types::RangedCoordu64;
use plotters::prelude::*;
use serde::Serialize;

use crate::svg;

/// Chart title.
pub const TITLE: &str = "Crash Count by Year";

/// X axis label.
pub const X_LABEL: &str = "Year";

/// Bar fill (steelblue).
const FILL: RGBColor = RGBColor(70, 130, 180);

/// Target number of y axis ticks.
const TICK_COUNT: usize = 10;

/// Pixels between neighbouring bars, split across both sides.
const BAR_GAP: u32 = 4;

const MARGIN: u32 = 20;
const X_LABEL_AREA: u32 = 40;
const Y_LABEL_AREA: u32 = 50;

/// One year's bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    pub year: String,
    pub count: u64,
    pub tooltip: String,
}

/// The trend chart model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub width: u32,
    pub height: u32,
    /// Upper end of the y domain, extended to a whole tick step.
    pub y_max: u64,
    pub y_ticks: Vec<u64>,
    pub bars: Vec<Bar>,
}

/// Builds the trend chart. One bar per entry of `counts`, in order.
#[must_use]
pub fn bar_chart(counts: &[YearCount], width: u32, height: u32) -> BarChart {
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0);
    let (y_max, y_ticks) = y_axis(max);

    let bars = counts
        .iter()
        .map(|c| Bar {
            year: c.year.clone(),
            count: c.count,
            tooltip: format!("Total crashes: {}", c.count),
        })
        .collect();

    BarChart {
        title: TITLE.to_string(),
        x_label: X_LABEL.to_string(),
        width,
        height,
        y_max,
        y_ticks,
        bars,
    }
}

impl BarChart {
    /// Renders a standalone SVG document with axes and a year label under
    /// each bar.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut buffer = String::new();
        if let Err(e) = self.draw(&mut buffer) {
            log::warn!("Failed to draw '{}': {e}", self.title);
        }
        svg::responsive(buffer, self.width, self.height)
    }

    fn draw(&self, buffer: &mut String) -> Result<(), Box<dyn std::error::Error>> {
        let root = SVGBackend::with_string(buffer, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let slots = u32::try_from(self.bars.len())?.max(1);

        let mut chart = ChartBuilder::on(&root)
            .margin(MARGIN)
            .caption(&self.title, ("sans-serif", 14).into_font())
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d((0..slots).into_segmented(), 0..self.y_max)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(self.bars.len() + 1)
            .y_labels(TICK_COUNT)
            .x_desc(self.x_label.as_str())
            .label_style(("sans-serif", 10).into_font())
            .x_label_formatter(&|x: &SegmentValue<u32>| self.year_label(x))
            .draw()?;

        chart.draw_series(self.bars.iter().zip(0u32..).map(|(bar, i)| {
            let mut rect = Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0),
                    (SegmentValue::Exact(i + 1), bar.count),
                ],
                FILL.filled(),
            );
            rect.set_margin(0, 0, BAR_GAP / 2, BAR_GAP / 2);
            rect
        }))?;

        root.present()?;
        Ok(())
    }

    fn year_label(&self, value: &SegmentValue<u32>) -> String {
        match value {
            SegmentValue::CenterOf(i) => usize::try_from(*i)
                .ok()
                .and_then(|i| self.bars.get(i))
                .map(|bar| bar.year.clone())
                .unwrap_or_default(),
            SegmentValue::Exact(_) | SegmentValue::Last => String::new(),
        }
    }
}

/// Domain end and tick values for counts up to `max`. An all-zero series
/// gets a unit domain.
fn y_axis(max: u64) -> (u64, Vec<u64>) {
    let max = max.max(1);
    let step = tick_step(max);
    let y_max = max.div_ceil(step) * step;
    let ticks = RangedCoordu64::from(0..y_max).key_points(TICK_COUNT);
    (y_max, ticks)
}

fn tick_step(max: u64) -> u64 {
    match RangedCoordu64::from(0..max).key_points(TICK_COUNT).as_slice() {
        [first, second, ..] => (second - first).max(1),
        _ => 1,
    }
}
