//! Error types for metric calculation

/// Metric calculation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricsError {
    /// No samples to compute over
    #[error("cannot calculate metrics for empty dataset")]
    Empty,

    /// A sample was NaN or infinite
    #[error("sample {index} is not a finite number")]
    NonFinite {
        /// Position of the offending sample
        index: usize,
    },

    /// Percentile outside 0..=100
    #[error("percentile must be in range 0..=100, got {0}")]
    InvalidPercentile(f64),
}
