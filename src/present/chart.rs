//! SVG line charts of the history and of the combined forecast view.

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::present::combined::CombinedView;
use chrono::{Duration, NaiveDateTime};
use plotters::prelude::*;
use std::fmt::Display;
use std::ops::Range;

const CHART_SIZE: (u32, u32) = (900, 500);
const ACTUAL_COLOR: RGBColor = BLUE;
const FORECAST_COLOR: RGBColor = RGBColor(255, 165, 0);
const SECONDS_PER_DAY: f64 = 86_400.0;

fn render_error<E: Display>(err: E) -> ForecastError {
    ForecastError::Render(err.to_string())
}

/// Days since the Unix epoch, used as the x coordinate.
fn day_number(ts: NaiveDateTime) -> f64 {
    (ts - NaiveDateTime::default()).num_seconds() as f64 / SECONDS_PER_DAY
}

fn day_label(x: &f64) -> String {
    Duration::try_seconds((x * SECONDS_PER_DAY).round() as i64)
        .and_then(|offset| NaiveDateTime::default().checked_add_signed(offset))
        .map(|ts| ts.format("%Y-%m").to_string())
        .unwrap_or_default()
}

/// Pad a range so that a single point or a flat line still has extent.
fn padded(min: f64, max: f64, fallback: f64) -> Range<f64> {
    if !(min.is_finite() && max.is_finite()) {
        return 0.0..1.0;
    }
    let span = max - min;
    let pad = if span > 0.0 { span * 0.05 } else { fallback };
    (min - pad)..(max + pad)
}

fn bounds(points: impl Iterator<Item = (f64, f64)>) -> (Range<f64>, Range<f64>) {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for (x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    let y_fallback = (y_max.abs() * 0.05).max(1.0);
    (padded(x_min, x_max, 15.0), padded(y_min, y_max, y_fallback))
}

/// Line chart of the cleaned historical series.
pub fn render_history_svg(series: &TimeSeries) -> Result<String> {
    let points: Vec<(f64, f64)> = series.iter().map(|(ts, v)| (day_number(ts), v)).collect();
    let (x_range, y_range) = bounds(points.iter().copied());

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(series.label(), ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_label_formatter(&day_label)
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(LineSeries::new(points, &ACTUAL_COLOR))
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
    }
    Ok(svg)
}

/// Actual (blue) and forecast (orange) lines on a shared time axis.
pub fn render_forecast_svg(view: &CombinedView, title: &str) -> Result<String> {
    let actual: Vec<(f64, f64)> = view
        .history()
        .iter()
        .filter_map(|row| row.actual.map(|v| (day_number(row.timestamp), v)))
        .collect();
    let forecast: Vec<(f64, f64)> = view
        .forecast()
        .iter()
        .filter_map(|row| row.forecast.map(|v| (day_number(row.timestamp), v)))
        .collect();
    let (x_range, y_range) = bounds(actual.iter().chain(&forecast).copied());

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_label_formatter(&day_label)
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(LineSeries::new(actual, &ACTUAL_COLOR))
            .map_err(render_error)?
            .label("Actual")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], ACTUAL_COLOR));

        chart
            .draw_series(LineSeries::new(forecast, &FORECAST_COLOR))
            .map_err(render_error)?
            .label("Forecast")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FORECAST_COLOR));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
    }
    Ok(svg)
}
