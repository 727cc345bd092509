//! Severity donut chart.
//!
//! Slices follow [`SeverityBucket::all`] order and are laid out clockwise
//! from twelve o'clock without sorting, so a bucket keeps its position as
//! counts change.

use std::f64::consts::{PI, TAU};

use crash_map_analytics_models::{SeverityCount, total};
use crash_map_crash_models::SeverityBucket;
use plotters::prelude::*;
use serde::Serialize;

use crate::svg;

/// Base chart title.
pub const TITLE: &str = "Crash Severity Distribution";

/// Space above the ring reserved for the title.
const TITLE_SPACE: u32 = 50;

/// Inner radius as a fraction of the chart radius.
const INNER: f64 = 0.5;
/// Outer radius as a fraction of the chart radius.
const OUTER: f64 = 0.8;
/// Outer radius of a hovered slice as a fraction of the chart radius.
const HOVER: f64 = 0.85;

const EPSILON: f64 = 1e-9;

/// Polygon vertices per full turn when drawing a ring.
const ARC_STEPS: f64 = 180.0;

const TITLE_COLOR: RGBColor = RGBColor(0x33, 0x33, 0x33);

/// One severity slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonutSlice {
    pub category: SeverityBucket,
    pub count: u64,
    pub color: &'static str,
    /// Clockwise from twelve o'clock, in radians.
    pub start_angle: f64,
    pub end_angle: f64,
    /// SVG path at rest. Empty for a zero-count slice.
    pub path: String,
    /// SVG path while hovered.
    pub hover_path: String,
    /// Tooltip lines.
    pub tooltip: Vec<String>,
}

/// The severity donut chart model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonutChart {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub radius: f64,
    pub slices: Vec<DonutSlice>,
}

/// Chart title, naming the selected year if there is one.
#[must_use]
pub fn title(year: Option<&str>) -> String {
    match year {
        Some(year) => format!("{TITLE} for {year}"),
        None => TITLE.to_string(),
    }
}

/// Builds the donut chart for a `width` x `height` ring area.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn donut_chart(counts: &[SeverityCount], year: Option<&str>, width: u32, height: u32) -> DonutChart {
    let radius = f64::from(width.min(height)) / 2.0;
    let total = total(counts);
    let scale = if total == 0 { 0.0 } else { TAU / total as f64 };

    let mut angle = 0.0;
    let slices = counts
        .iter()
        .map(|c| {
            let start_angle = angle;
            let end_angle = c.count as f64 * scale + start_angle;
            angle = end_angle;

            DonutSlice {
                category: c.category,
                count: c.count,
                color: c.category.color(),
                start_angle,
                end_angle,
                path: arc_path(radius * INNER, radius * OUTER, start_angle, end_angle),
                hover_path: arc_path(radius * INNER, radius * HOVER, start_angle, end_angle),
                tooltip: vec![
                    format!("Severity: {}", c.category),
                    format!("Total crashes: {}", c.count),
                ],
            }
        })
        .collect();

    DonutChart {
        title: title(year),
        width,
        height,
        radius,
        slices,
    }
}

impl DonutChart {
    /// Renders a standalone SVG document: the title above the ring, one
    /// filled sector per non-empty slice.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let full_height = self.height + TITLE_SPACE;
        let mut buffer = String::new();
        if let Err(e) = self.draw(&mut buffer, full_height) {
            log::warn!("Failed to draw '{}': {e}", self.title);
        }
        svg::responsive(buffer, self.width, full_height)
    }

    fn draw(&self, buffer: &mut String, full_height: u32) -> Result<(), Box<dyn std::error::Error>> {
        let root = SVGBackend::with_string(buffer, (self.width, full_height)).into_drawing_area();
        root.fill(&WHITE)?;

        let ring = root.titled(
            &self.title,
            ("sans-serif", 16).into_font().color(&TITLE_COLOR),
        )?;

        let (width, height) = ring.dim_in_pixel();
        let center = (f64::from(width) / 2.0, f64::from(height) / 2.0);

        for slice in &self.slices {
            if slice.path.is_empty() {
                continue;
            }
            let points = sector_points(
                center,
                self.radius * INNER,
                self.radius * OUTER,
                slice.start_angle,
                slice.end_angle,
            );
            ring.draw(&Polygon::new(points, rgb(slice.color).filled()))?;
        }

        root.present()?;
        Ok(())
    }
}

/// Parses a `#rrggbb` color. Malformed channels read as zero.
fn rgb(hex: &str) -> RGBColor {
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .unwrap_or(0)
    };
    RGBColor(channel(1), channel(3), channel(5))
}

/// Pixel outline of an annular sector around `center`, angles clockwise
/// from twelve o'clock. Outer arc first, then the inner arc back.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn sector_points(center: (f64, f64), inner: f64, outer: f64, start: f64, end: f64) -> Vec<(i32, i32)> {
    let steps = ((end - start) / TAU * ARC_STEPS).ceil().max(1.0) as usize;
    let at = |radius: f64, step: usize| {
        let angle = (end - start).mul_add(step as f64 / steps as f64, start);
        (
            radius.mul_add(angle.sin(), center.0).round() as i32,
            (-radius).mul_add(angle.cos(), center.1).round() as i32,
        )
    };

    (0..=steps)
        .map(|step| at(outer, step))
        .chain((0..=steps).rev().map(|step| at(inner, step)))
        .collect()
}

/// SVG path for an annular sector, angles clockwise from twelve o'clock.
#[must_use]
pub fn arc_path(inner: f64, outer: f64, start: f64, end: f64) -> String {
    let span = end - start;
    if span <= EPSILON {
        return String::new();
    }

    let (i, o) = (svg::num(inner), svg::num(outer));

    if span >= TAU - EPSILON {
        return format!(
            "M0,{neg_o}A{o},{o},0,1,1,0,{o}A{o},{o},0,1,1,0,{neg_o}M0,{neg_i}A{i},{i},0,1,0,0,{i}A{i},{i},0,1,0,0,{neg_i}Z",
            neg_o = svg::num(-outer),
            neg_i = svg::num(-inner),
        );
    }

    let large = u8::from(span > PI);
    let point = |r: f64, a: f64| format!("{},{}", svg::num(r * a.sin()), svg::num(-r * a.cos()));

    format!(
        "M{}A{o},{o},0,{large},1,{}L{}A{i},{i},0,{large},0,{}Z",
        point(outer, start),
        point(outer, end),
        point(inner, end),
        point(inner, start),
    )
}
