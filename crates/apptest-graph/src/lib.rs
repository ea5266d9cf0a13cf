//! AppTest Graphs
//!
//! Renders response-time samples to PNG files.
//!
//! - scatter plot with least-squares trend line
//! - analysis plot: scatter on top, histogram and box plot below
//! - comparison plot: one line per series, for metrics across runs
//!
//! Files land in a single output directory (default `graphs/`) named
//! `<metric>_<YYYYmmdd_HHMMSS>.png` unless a filename is given. Plots carry
//! no text, so rendering works without any font installed.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod grapher;
mod options;
mod stats;

pub use error::GraphError;
pub use grapher::{timestamped_name, ResponseTimeGrapher};
pub use options::GraphOptions;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
