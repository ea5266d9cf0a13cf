//! Error types for stage construction and execution

/// Error raised by a stage action or a custom input binding
///
/// Actions own their failure types; the sequencer carries them through
/// untouched.
pub type ActionError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Stage errors
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// Two stages in one collection share a name
    #[error("duplicate stage name in collection: '{0}'")]
    DuplicateStage(String),

    /// Binding asked for a context key the strategy did not supply
    #[error("stage '{stage}' expects context key '{key}' which was not supplied")]
    MissingContext {
        /// Stage being bound
        stage: String,
        /// Missing context key
        key: String,
    },

    /// Custom binding function failed
    #[error("input binding for stage '{stage}' failed: {source}")]
    BindingFailed {
        /// Stage being bound
        stage: String,
        /// Underlying failure
        #[source]
        source: ActionError,
    },

    /// The stage action itself failed
    #[error("stage '{stage}' failed: {source}")]
    ActionFailed {
        /// Failing stage
        stage: String,
        /// Error returned by the action
        #[source]
        source: ActionError,
    },
}

impl StageError {
    /// Name of the stage the error is attributed to
    #[must_use]
    pub fn stage(&self) -> &str {
        match self {
            Self::DuplicateStage(stage)
            | Self::MissingContext { stage, .. }
            | Self::BindingFailed { stage, .. }
            | Self::ActionFailed { stage, .. } => stage,
        }
    }

    /// Error returned by the failing action, if the action was reached
    #[must_use]
    pub fn action_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::ActionFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
