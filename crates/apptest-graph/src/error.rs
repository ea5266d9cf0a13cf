//! Error types for graph rendering

use plotters::drawing::DrawingAreaErrorKind;
use std::path::PathBuf;

/// Graph rendering errors
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Nothing to plot
    #[error("no response times provided for plotting")]
    NoSamples,

    /// Sample was NaN or infinite
    #[error("sample {index} is not a finite number")]
    NonFinite {
        /// Position of the offending sample
        index: usize,
    },

    /// Output directory could not be created
    #[error("io error preparing {path}: {source}")]
    Io {
        /// Directory or file involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Plotting backend failed (includes the final PNG write)
    #[error("drawing failed: {0}")]
    Draw(String),
}

impl GraphError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl<E> From<DrawingAreaErrorKind<E>> for GraphError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Self::Draw(err.to_string())
    }
}
