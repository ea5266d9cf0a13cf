//! AppTest Metrics
//!
//! Pure statistics over stage results. Nothing here keeps state; every
//! call recomputes from its full input.
//!
//! - [`MetricsCalculator`]: min/max/mean/median/std-dev/percentiles over samples
//! - [`summarize`]: success/failure counts and timing aggregates for a result mapping
//! - [`extract_response_times`]: pull a `response_times` sample array out of stage output

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod calculator;
mod error;
mod summary;

pub use calculator::{percentile, FormattedMetrics, MetricsCalculator, MetricsResult};
pub use error::MetricsError;
pub use summary::{
    classify, extract_response_times, summarize, summarize_runs, timing_of, ResultSummary,
    StageOutcome, RESPONSE_TIMES_KEY, TIMING_KEY,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
