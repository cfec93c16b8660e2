//! Two-panel overview chart: total downloads on the left, stars on the right.
//!
//! Each panel is a line over a vertical gradient fill, with the last value
//! called out. The figure is drawn twice, over white and over black, and the
//! two renders are combined into an RGBA image so the saved PNG keeps a
//! transparent background.

use crate::error::{Result, StatsError};
use crate::models::Series;
use image::RgbaImage;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use std::fs;
use std::ops::Range;
use std::path::Path;
use tracing::{info, warn};

pub const DEFAULT_WIDTH: u32 = 1200;
pub const DEFAULT_HEIGHT: u32 = 500;

pub const DOWNLOADS_COLOR: RGBColor = RGBColor(0x00, 0x80, 0x80);
pub const STARS_COLOR: RGBColor = RGBColor(0x80, 0x00, 0x00);
const TITLE_COLOR: RGBColor = RGBColor(0x33, 0x33, 0x33);
const GRID_COLOR: RGBColor = RGBColor(0xb0, 0xb0, 0xb0);
const AXIS_COLOR: RGBColor = RGBColor(0x00, 0x00, 0x00);

const FILL_MAX_ALPHA: f64 = 0.5;
const GRID_ALPHA: f64 = 0.3;
const X_PADDING: f64 = 0.05;
const Y_PADDING: f64 = 0.10;
const GRID_DIVISIONS: usize = 5;
const TITLE_HEIGHT: u32 = 40;
const PANEL_MARGIN: u32 = 20;
const SECONDS_PER_DAY: f64 = 86_400.0;

type PlotArea<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

struct Panel<'a> {
    title: &'static str,
    color: RGBColor,
    series: &'a Series,
}

/// Renders the overview figure to a PNG file
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartRenderer {
    pub fn new() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    pub fn with_size(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Draw downloads (left) and stars (right) and write the image to `output`,
    /// creating its directory if needed.
    pub fn render(&self, stars: &Series, downloads: &Series, output: &Path) -> Result<()> {
        let panels = [
            Panel {
                title: "Total Downloads",
                color: DOWNLOADS_COLOR,
                series: downloads,
            },
            Panel {
                title: "Stars",
                color: STARS_COLOR,
                series: stars,
            },
        ];

        let over_white = self.draw_over(255, &panels)?;
        let over_black = self.draw_over(0, &panels)?;
        let image = composite_transparent(&over_white, &over_black, self.width, self.height)?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        image.save(output)?;

        info!(path = %output.display(), "Graph saved");
        Ok(())
    }

    fn draw_over(&self, background: u8, panels: &[Panel<'_>]) -> Result<Vec<u8>> {
        let mut buffer = vec![background; self.width as usize * self.height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height))
                .into_drawing_area();
            let areas = root.split_evenly((1, panels.len()));
            for (area, panel) in areas.iter().zip(panels) {
                draw_panel(area, panel)?;
            }
            root.present()?;
        }
        Ok(buffer)
    }
}

fn draw_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, panel: &Panel<'_>) -> Result<()> {
    let (title_area, body) = area.split_vertically(TITLE_HEIGHT);
    let title_style = ("sans-serif", 22)
        .into_font()
        .style(FontStyle::Bold)
        .color(&TITLE_COLOR);
    draw_centered_text(&title_area, panel.title, title_style);

    if panel.series.is_empty() {
        draw_centered_text(&body, "No Data", ("sans-serif", 16).into_font().color(&AXIS_COLOR));
        return Ok(());
    }

    let points = plot_points(panel.series);
    let (x_range, y_range) = axis_ranges(&points);
    let y_max = panel.series.max_count().unwrap_or(0) as f64;

    let mut chart = ChartBuilder::on(&body)
        .margin(PANEL_MARGIN)
        .build_cartesian_2d(x_range.clone(), y_range.clone())?;

    draw_grid(&mut chart, &x_range, &y_range)?;
    draw_gradient_fill(&chart, &points, y_max, y_range.end, panel.color)?;

    chart.draw_series(LineSeries::new(points.iter().copied(), panel.color.stroke_width(2)))?;

    // left and bottom spines only
    chart.draw_series(std::iter::once(PathElement::new(
        vec![
            (x_range.start, y_range.end),
            (x_range.start, 0.0),
            (x_range.end, 0.0),
        ],
        AXIS_COLOR.stroke_width(1),
    )))?;

    if let Some((_, last_count)) = panel.series.last() {
        annotate_last_point(&mut chart, &points, last_count, panel.color)?;
    }

    Ok(())
}

fn draw_grid<DB: DrawingBackend>(
    chart: &mut PlotArea<'_, DB>,
    x_range: &Range<f64>,
    y_range: &Range<f64>,
) -> Result<()> {
    let style = GRID_COLOR.mix(GRID_ALPHA).stroke_width(1);
    let steps = GRID_DIVISIONS as f64;

    for i in 1..GRID_DIVISIONS {
        let t = i as f64 / steps;
        let y = y_range.start + (y_range.end - y_range.start) * t;
        let x = x_range.start + (x_range.end - x_range.start) * t;

        chart.draw_series(DashedLineSeries::new(
            vec![(x_range.start, y), (x_range.end, y)],
            6,
            4,
            style,
        ))?;
        chart.draw_series(DashedLineSeries::new(
            vec![(x, y_range.start), (x, y_range.end)],
            6,
            4,
            style,
        ))?;
    }

    Ok(())
}

/// Fill the area under the curve pixel by pixel, with opacity growing from
/// zero at the baseline to [`FILL_MAX_ALPHA`] at the series maximum.
fn draw_gradient_fill<DB: DrawingBackend>(
    chart: &PlotArea<'_, DB>,
    points: &[(f64, f64)],
    y_max: f64,
    y_top: f64,
    color: RGBColor,
) -> Result<()> {
    let (Some(&(x_first, _)), Some(&(x_last, _))) = (points.first(), points.last()) else {
        return Ok(());
    };
    if y_max <= 0.0 || x_last <= x_first {
        return Ok(());
    }

    let plotting = chart.plotting_area();
    let (origin_x, origin_y) = {
        let (xs, ys) = plotting.get_pixel_range();
        (xs.start, ys.start)
    };
    let canvas = plotting.strip_coord_spec();

    let (left, baseline) = plotting.map_coordinate(&(x_first, 0.0));
    let (right, _) = plotting.map_coordinate(&(x_last, 0.0));
    let (_, ceiling) = plotting.map_coordinate(&(x_first, y_top));
    if right <= left || baseline <= ceiling {
        return Ok(());
    }

    for px in left..=right {
        let x = x_first + (px - left) as f64 / (right - left) as f64 * (x_last - x_first);
        let x = x.min(x_last);
        let Some(y) = interpolate(points, x) else {
            continue;
        };
        let (_, curve) = plotting.map_coordinate(&(x, y));

        for py in curve.max(ceiling)..baseline {
            let value = (baseline - py) as f64 / (baseline - ceiling) as f64 * y_top;
            let alpha = FILL_MAX_ALPHA * (value / y_max).clamp(0.0, 1.0);
            if alpha > 0.0 {
                canvas.draw_pixel((px - origin_x, py - origin_y), &color.mix(alpha))?;
            }
        }
    }

    Ok(())
}

fn annotate_last_point<DB: DrawingBackend>(
    chart: &mut PlotArea<'_, DB>,
    points: &[(f64, f64)],
    count: u64,
    color: RGBColor,
) -> Result<()> {
    let Some(&last) = points.last() else {
        return Ok(());
    };

    chart.draw_series(std::iter::once(Circle::new(last, 4, color.filled())))?;

    let style = ("sans-serif", 16)
        .into_font()
        .style(FontStyle::Bold)
        .color(&color)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    let label = EmptyElement::at(last) + Text::new(format_thousands(count), (0, -10), style);
    if let Err(e) = chart.draw_series(std::iter::once(label)) {
        warn!(error = %e, "Skipping last point label");
    }

    Ok(())
}

fn draw_centered_text<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
    style: TextStyle<'_>,
) {
    let (width, height) = area.dim_in_pixel();
    let style = style.pos(Pos::new(HPos::Center, VPos::Center));
    let position = ((width / 2) as i32, (height / 2) as i32);
    if let Err(e) = area.draw(&Text::new(text, position, style)) {
        warn!(error = %e, text, "Skipping chart text");
    }
}

fn plot_points(series: &Series) -> Vec<(f64, f64)> {
    series
        .iter()
        .map(|(date, count)| (date.timestamp() as f64, count as f64))
        .collect()
}

/// X spans the data plus 5% on the right, Y runs from 0 to 10% above the max.
/// A single instant gets a day of room on each side; an all-zero series a
/// ceiling of 1.
fn axis_ranges(points: &[(f64, f64)]) -> (Range<f64>, Range<f64>) {
    let x_start = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let x_end = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let y_max = points.iter().map(|p| p.1).fold(0.0, f64::max);

    let span = x_end - x_start;
    let x_range = if span > 0.0 {
        x_start..x_end + span * X_PADDING
    } else {
        x_start - SECONDS_PER_DAY..x_end + SECONDS_PER_DAY
    };

    let y_top = if y_max > 0.0 { y_max * (1.0 + Y_PADDING) } else { 1.0 };

    (x_range, 0.0..y_top)
}

/// Linear interpolation along a polyline with non-decreasing x.
fn interpolate(points: &[(f64, f64)], x: f64) -> Option<f64> {
    let first = points.first()?;
    let last = points.last()?;
    if x < first.0 || x > last.0 {
        return None;
    }

    let idx = points.partition_point(|p| p.0 <= x);
    if idx == points.len() {
        return Some(last.1);
    }

    let (x0, y0) = points[idx - 1];
    let (x1, y1) = points[idx];
    if x1 == x0 {
        return Some(y1);
    }
    Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}

/// `1234567` -> `"1,234,567"`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Recover colour and opacity from the same figure rendered over white and
/// over black: a pixel's opacity is how little it changed between the two.
pub fn composite_transparent(
    over_white: &[u8],
    over_black: &[u8],
    width: u32,
    height: u32,
) -> Result<RgbaImage> {
    let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);

    for (white, black) in over_white.chunks_exact(3).zip(over_black.chunks_exact(3)) {
        let spread: u32 = white
            .iter()
            .zip(black)
            .map(|(&w, &b)| u32::from(w.saturating_sub(b)))
            .sum();
        let alpha = 255 - (spread / 3).min(255);

        if alpha == 0 {
            rgba.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }

        for &channel in black {
            let straight = (u32::from(channel) * 255 + alpha / 2) / alpha;
            rgba.push(straight.min(255) as u8);
        }
        rgba.push(alpha as u8);
    }

    RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        StatsError::RenderError("image buffer does not match canvas size".to_string())
    })
}
