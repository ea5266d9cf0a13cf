//! Sample statistics

use crate::error::MetricsError;
use serde::{Deserialize, Serialize};

/// Statistics over a set of timing samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    /// Number of samples
    pub count: usize,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// 50th percentile
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// 90th percentile
    pub percentile_90: f64,
    /// 95th percentile
    pub percentile_95: f64,
    /// 99th percentile
    pub percentile_99: f64,
}

/// [`MetricsResult`] rounded to two decimals, keyed for reports and plots
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormattedMetrics {
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Median
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// 90th percentile
    pub p90: f64,
    /// 95th percentile
    pub p95: f64,
    /// 99th percentile
    pub p99: f64,
}

/// Computes and formats sample statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Calculate statistics over `samples`
    #[allow(clippy::cast_precision_loss)]
    pub fn calculate(samples: &[f64]) -> Result<MetricsResult, MetricsError> {
        if samples.is_empty() {
            return Err(MetricsError::Empty);
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(MetricsError::NonFinite { index });
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let variance = sorted.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / count as f64;

        Ok(MetricsResult {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            median: percentile(&sorted, 50.0)?,
            std_dev: variance.sqrt(),
            percentile_90: percentile(&sorted, 90.0)?,
            percentile_95: percentile(&sorted, 95.0)?,
            percentile_99: percentile(&sorted, 99.0)?,
        })
    }

    /// Round every statistic to two decimals
    #[must_use]
    pub fn format(metrics: &MetricsResult) -> FormattedMetrics {
        FormattedMetrics {
            min: round2(metrics.min),
            max: round2(metrics.max),
            mean: round2(metrics.mean),
            median: round2(metrics.median),
            std_dev: round2(metrics.std_dev),
            p90: round2(metrics.percentile_90),
            p95: round2(metrics.percentile_95),
            p99: round2(metrics.percentile_99),
        }
    }

    /// Calculate and format in one step
    pub fn process(samples: &[f64]) -> Result<FormattedMetrics, MetricsError> {
        Self::calculate(samples).map(|metrics| Self::format(&metrics))
    }
}

/// Percentile of already sorted samples, interpolating linearly between
/// the two closest ranks
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn percentile(sorted: &[f64], p: f64) -> Result<f64, MetricsError> {
    if sorted.is_empty() {
        return Err(MetricsError::Empty);
    }
    if !(0.0..=100.0).contains(&p) {
        return Err(MetricsError::InvalidPercentile(p));
    }

    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
