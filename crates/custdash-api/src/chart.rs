//! SVG line chart of a customer's daily totals

use custdash_config::ChartConfig;
use custdash_core::DailyTotal;
use plotters::prelude::*;
use rust_decimal::prelude::ToPrimitive;

use crate::error::ApiError;

const DEFAULT_LINE_COLOR: (u8, u8, u8) = (79, 70, 229);

fn chart_error<E: std::fmt::Display>(e: E) -> ApiError {
    ApiError::Chart { message: e.to_string() }
}

/// Y range with some headroom, always including zero
fn y_bounds(points: &[(i32, f64)]) -> (f64, f64) {
    let min = points.iter().map(|(_, y)| *y).fold(0.0_f64, f64::min);
    let max = points.iter().map(|(_, y)| *y).fold(0.0_f64, f64::max);
    let padding = (max - min).max(1.0) * 0.1;
    let low = if min < 0.0 { min - padding } else { 0.0 };
    (low, max + padding)
}

/// Render daily totals as an SVG document
///
/// Points are placed one per date in chronological order; the x axis is
/// labelled with the dates.
pub fn render_daily_chart(daily: &[DailyTotal], config: &ChartConfig) -> Result<String, ApiError> {
    let labels: Vec<String> = daily.iter().map(|d| d.date.format("%Y-%m-%d").to_string()).collect();
    let points: Vec<(i32, f64)> = daily
        .iter()
        .enumerate()
        .map(|(i, d)| (i as i32, d.amount.to_f64().unwrap_or(0.0)))
        .collect();
    let (y_min, y_max) = y_bounds(&points);
    let x_max = (points.len() as i32 - 1).max(1);

    let (r, g, b) = config.line_rgb().unwrap_or(DEFAULT_LINE_COLOR);
    let color = RGBColor(r, g, b);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (config.width, config.height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(0..x_max, y_min..y_max)
            .map_err(chart_error)?;

        let label_at = |i: &i32| {
            usize::try_from(*i)
                .ok()
                .and_then(|i| labels.get(i))
                .cloned()
                .unwrap_or_default()
        };

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Amount")
            .x_labels(labels.len().clamp(2, 8))
            .y_labels(6)
            .x_label_formatter(&label_at)
            .y_label_formatter(&|v| format!("{:.0}", v))
            .label_style(("sans-serif", 12, &RGBColor(75, 85, 99)))
            .axis_style(&RGBColor(200, 200, 200))
            .light_line_style(&RGBColor(245, 245, 245))
            .draw()
            .map_err(chart_error)?;

        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(chart_error)?;
        chart
            .draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }

    Ok(svg)
}
