//! Error types for AppTest Core
//!
//! Provides error handling for:
//! - App and stage-collection lookup
//! - Test type / strategy lookup and stage failures (wrapped [`TestError`])
//! - Configuration loading

use apptest_registry::TestError;
use apptest_stage::StageError;
use std::path::PathBuf;

/// Facade errors
#[derive(Debug, thiserror::Error)]
pub enum FacadeError {
    /// App was never registered
    #[error("app not registered: {0}")]
    UnknownApp(String),

    /// App is registered but has no stages for the requested test type
    #[error("app '{app}' has no stage collection for test type '{test_type}'")]
    NoStageCollection {
        /// App name
        app: String,
        /// Requested test type
        test_type: String,
    },

    /// Lookup or execution of one test failed
    #[error("{test_type} test for {app} failed: {source}")]
    Test {
        /// App name
        app: String,
        /// Test type
        test_type: String,
        /// Underlying failure
        #[source]
        source: TestError,
    },
}

impl FacadeError {
    /// Wrap a test error with its app and test type
    pub fn test(app: impl Into<String>, test_type: impl Into<String>, source: TestError) -> Self {
        Self::Test {
            app: app.into(),
            test_type: test_type.into(),
            source,
        }
    }

    /// Check if the failure is a registration problem rather than a stage failure
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::UnknownApp(_) | Self::NoStageCollection { .. } => true,
            Self::Test { source, .. } => source.is_lookup(),
        }
    }

    /// Stage failure underneath, if any
    #[must_use]
    pub fn stage_error(&self) -> Option<&StageError> {
        match self {
            Self::Test {
                source: TestError::Stage(e),
                ..
            } => Some(e),
            _ => None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::HarnessConfig`]
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// App enables a test type with no built-in stage collection
    #[error("app '{app}' enables unknown test type '{test_type}'")]
    UnknownTestType {
        /// App name
        app: String,
        /// Test type
        test_type: String,
    },

    /// Built-in stage collection could not be assembled
    #[error("stage collection error: {0}")]
    Stage(#[from] StageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facade_error_display() {
        let err = FacadeError::NoStageCollection {
            app: "A".to_string(),
            test_type: "replay".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "app 'A' has no stage collection for test type 'replay'"
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn facade_error_classifies_lookup() {
        let lookup = FacadeError::test("A", "soak", TestError::UnknownStrategy("soak".into()));
        assert!(lookup.is_configuration());
        assert!(lookup.stage_error().is_none());

        let stage = FacadeError::test(
            "A",
            "performance",
            TestError::Stage(StageError::DuplicateStage("connect".into())),
        );
        assert!(!stage.is_configuration());
        assert!(stage.stage_error().is_some());
    }
}
