//! Error types for test lookup and execution

use apptest_stage::StageError;

/// Test lookup and execution errors
#[derive(Debug, thiserror::Error)]
pub enum TestError {
    /// No variant registered under the key
    #[error("unknown test type: {key}. available types are: {}", available.join(", "))]
    UnknownTestType {
        /// Requested key
        key: String,
        /// Keys that are registered
        available: Vec<String>,
    },

    /// No execution strategy registered under the key
    #[error("no execution strategy found for test type: {0}")]
    UnknownStrategy(String),

    /// Strategy did not supply a value the variant requires
    #[error("{test_type} test requires context key '{key}'")]
    MissingContext {
        /// Variant that rejected the context
        test_type: String,
        /// Missing key
        key: String,
    },

    /// A stage failed
    #[error(transparent)]
    Stage(#[from] StageError),
}

impl TestError {
    /// Check if the error came from a lookup rather than from running stages
    #[inline]
    #[must_use]
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::UnknownTestType { .. } | Self::UnknownStrategy(_))
    }
}
