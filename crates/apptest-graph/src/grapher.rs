//! Response-time plots
//!
//! Plots carry no text: no tick labels, no captions. Titles are recorded in
//! the trace output only, so nothing here needs a font backend.

use crate::error::GraphError;
use crate::options::GraphOptions;
use crate::stats::{histogram, linear_fit, padded_range, quartiles};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

const SCATTER_COLOR: RGBColor = RGBColor(0x1f, 0x77, 0xb4);
const GRID_COLOR: RGBColor = RGBColor(0xdd, 0xdd, 0xdd);
const GRID_LINES: usize = 10;

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Renders response-time samples to PNG files
#[derive(Debug, Clone, Default)]
pub struct ResponseTimeGrapher {
    options: GraphOptions,
}

impl ResponseTimeGrapher {
    /// Create grapher
    #[inline]
    #[must_use]
    pub fn new(options: GraphOptions) -> Self {
        Self { options }
    }

    /// Rendering options
    #[inline]
    #[must_use]
    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    /// Scatter plot of samples over sample index, with trend line
    ///
    /// Returns the path of the written file.
    pub fn create_scatter_plot(
        &self,
        samples: &[f64],
        title: &str,
        filename: Option<&str>,
    ) -> Result<PathBuf, GraphError> {
        check_samples(samples)?;
        let path = self.output_path("response_times", filename)?;

        {
            let root = self.root(&path);
            root.fill(&WHITE)?;
            draw_scatter(&root, samples)?;
            root.present()?;
        }

        tracing::info!(
            title,
            path = %path.display(),
            samples = samples.len(),
            "wrote scatter plot"
        );
        Ok(path)
    }

    /// Scatter with trend on top, histogram and box plot below
    #[allow(clippy::cast_possible_wrap)]
    pub fn create_multi_plot(
        &self,
        samples: &[f64],
        title: &str,
        filename: Option<&str>,
    ) -> Result<PathBuf, GraphError> {
        check_samples(samples)?;
        let path = self.output_path("response_time_analysis", filename)?;

        {
            let root = self.root(&path);
            root.fill(&WHITE)?;
            let (upper, lower) = root.split_vertically((self.options.height / 2) as i32);
            let (left, right) = lower.split_horizontally((self.options.width / 2) as i32);

            draw_scatter(&upper, samples)?;
            draw_histogram(&left, samples, self.options.bins)?;
            draw_box_plot(&right, samples)?;
            root.present()?;
        }

        tracing::info!(
            title,
            path = %path.display(),
            samples = samples.len(),
            "wrote analysis plot"
        );
        Ok(path)
    }

    /// One line per named series, for comparing a metric across runs
    pub fn create_comparison_plot(
        &self,
        series: &[(String, Vec<f64>)],
        title: &str,
        filename: Option<&str>,
    ) -> Result<PathBuf, GraphError> {
        let all: Vec<f64> = series.iter().flat_map(|(_, s)| s.iter().copied()).collect();
        check_samples(&all)?;
        let path = self.output_path("metrics_comparison", filename)?;

        {
            let root = self.root(&path);
            root.fill(&WHITE)?;

            let longest = series.iter().map(|(_, s)| s.len()).max().unwrap_or(1);
            let (y_lo, y_hi) = padded_range(&all);
            let x_hi = x_extent(longest);
            let mut chart = ChartBuilder::on(&root)
                .margin(20)
                .build_cartesian_2d(0f64..x_hi, y_lo..y_hi)?;
            draw_grid(&mut chart, (0.0, x_hi), (y_lo, y_hi))?;

            for (i, (name, values)) in series.iter().enumerate() {
                tracing::debug!(series = %name, points = values.len(), "plotting series");
                let color = Palette99::pick(i);
                chart.draw_series(LineSeries::new(
                    indexed(values),
                    color.stroke_width(2),
                ))?;
                chart.draw_series(
                    indexed(values).map(|point| Circle::new(point, 3, color.filled())),
                )?;
            }
            root.present()?;
        }

        tracing::info!(
            title,
            path = %path.display(),
            series = series.len(),
            "wrote comparison plot"
        );
        Ok(path)
    }

    fn root<'a>(&self, path: &'a Path) -> DrawingArea<BitMapBackend<'a>, Shift> {
        BitMapBackend::new(path, (self.options.width, self.options.height)).into_drawing_area()
    }

    /// Resolve the file path, creating the output directory
    fn output_path(&self, metric: &str, filename: Option<&str>) -> Result<PathBuf, GraphError> {
        let dir = &self.options.output_dir;
        std::fs::create_dir_all(dir).map_err(|e| GraphError::io_error(dir, e))?;

        let mut name = filename.map_or_else(|| timestamped_name(metric), ToString::to_string);
        if !name.ends_with(".png") {
            name.push_str(".png");
        }
        Ok(dir.join(name))
    }
}

/// `<metric>_<YYYYmmdd_HHMMSS>`, the default file stem for a plot
#[must_use]
pub fn timestamped_name(metric: &str) -> String {
    format!("{metric}_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

/// Light grid plus a frame along the lower and left edges
fn draw_grid<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    (x_lo, x_hi): (f64, f64),
    (y_lo, y_hi): (f64, f64),
) -> Result<(), GraphError> {
    let step = |lo: f64, hi: f64, i: usize| lo + (hi - lo) * grid_fraction(i);

    for i in 1..GRID_LINES {
        let x = step(x_lo, x_hi, i);
        let y = step(y_lo, y_hi, i);
        chart.draw_series(LineSeries::new([(x, y_lo), (x, y_hi)], GRID_COLOR))?;
        chart.draw_series(LineSeries::new([(x_lo, y), (x_hi, y)], GRID_COLOR))?;
    }
    chart.draw_series(LineSeries::new(
        [(x_lo, y_hi), (x_lo, y_lo), (x_hi, y_lo)],
        BLACK.stroke_width(1),
    ))?;
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn grid_fraction(i: usize) -> f64 {
    i as f64 / GRID_LINES as f64
}

fn check_samples(samples: &[f64]) -> Result<(), GraphError> {
    if samples.is_empty() {
        return Err(GraphError::NoSamples);
    }
    match samples.iter().position(|s| !s.is_finite()) {
        Some(index) => Err(GraphError::NonFinite { index }),
        None => Ok(()),
    }
}

#[allow(clippy::cast_precision_loss)]
fn x_extent(len: usize) -> f64 {
    len.saturating_sub(1).max(1) as f64
}

#[allow(clippy::cast_precision_loss)]
fn indexed(values: &[f64]) -> impl Iterator<Item = (f64, f64)> + '_ {
    values.iter().enumerate().map(|(i, &v)| (i as f64, v))
}

fn draw_scatter<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    samples: &[f64],
) -> Result<(), GraphError> {
    let (y_lo, y_hi) = padded_range(samples);
    let x_max = x_extent(samples.len());

    let mut chart = ChartBuilder::on(area)
        .margin(15)
        .build_cartesian_2d(0f64..x_max, y_lo..y_hi)?;
    draw_grid(&mut chart, (0.0, x_max), (y_lo, y_hi))?;

    chart.draw_series(
        indexed(samples).map(|point| Circle::new(point, 3, SCATTER_COLOR.mix(0.6).filled())),
    )?;

    let (slope, intercept) = linear_fit(samples);
    chart.draw_series(LineSeries::new(
        [(0.0, intercept), (x_max, slope * x_max + intercept)],
        RED.stroke_width(2),
    ))?;
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn draw_histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    samples: &[f64],
    bins: usize,
) -> Result<(), GraphError> {
    let bins = histogram(samples, bins);
    let x_lo = bins.first().map_or(0.0, |b| b.0);
    let x_hi = bins.last().map_or(1.0, |b| b.1);
    let peak = bins.iter().map(|b| b.2).max().unwrap_or(1).max(1) as f64;

    let y_hi = peak * 1.1;
    let mut chart = ChartBuilder::on(area)
        .margin(15)
        .build_cartesian_2d(x_lo..x_hi, 0f64..y_hi)?;
    draw_grid(&mut chart, (x_lo, x_hi), (0.0, y_hi))?;

    chart.draw_series(bins.iter().map(|&(start, end, count)| {
        Rectangle::new(
            [(start, 0.0), (end, count as f64)],
            SCATTER_COLOR.mix(0.7).filled(),
        )
    }))?;
    Ok(())
}

fn draw_box_plot<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    samples: &[f64],
) -> Result<(), GraphError> {
    let q = quartiles(samples);
    let (y_lo, y_hi) = padded_range(samples);

    let mut chart = ChartBuilder::on(area)
        .margin(15)
        .build_cartesian_2d(0f64..2.0, y_lo..y_hi)?;
    draw_grid(&mut chart, (0.0, 2.0), (y_lo, y_hi))?;

    let line = BLACK.stroke_width(2);
    chart.draw_series(std::iter::once(Rectangle::new(
        [(0.7, q.q1), (1.3, q.q3)],
        SCATTER_COLOR.mix(0.3).filled(),
    )))?;
    chart.draw_series(std::iter::once(Rectangle::new([(0.7, q.q1), (1.3, q.q3)], line)))?;
    for segment in [
        [(0.7, q.median), (1.3, q.median)],
        [(1.0, q.min), (1.0, q.q1)],
        [(1.0, q.q3), (1.0, q.max)],
        [(0.85, q.min), (1.15, q.min)],
        [(0.85, q.max), (1.15, q.max)],
    ] {
        chart.draw_series(LineSeries::new(segment, line))?;
    }
    Ok(())
}
