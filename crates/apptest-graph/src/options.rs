//! Rendering options

use std::path::PathBuf;

/// Where and how large graphs are rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphOptions {
    /// Directory PNG files are written to
    pub output_dir: PathBuf,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Histogram bin count
    pub bins: usize,
}

impl GraphOptions {
    /// Default options writing to `output_dir`
    #[inline]
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// With image size
    #[inline]
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// With histogram bin count
    #[inline]
    #[must_use]
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins.max(1);
        self
    }
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("graphs"),
            width: 1500,
            height: 1000,
            bins: 30,
        }
    }
}
