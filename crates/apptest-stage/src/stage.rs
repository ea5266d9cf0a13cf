//! Stage definition and input bindings
//!
//! A [`Stage`] never inspects its neighbours. What it receives is decided
//! by its [`InputBinding`], fixed when the stage is constructed.

use crate::error::{ActionError, StageError};
use crate::sequence::{ResultMapping, RunContext};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Callable body of a stage
pub type StageAction = Arc<dyn Fn(Value) -> Result<Value, ActionError> + Send + Sync>;

/// Caller-supplied input binding function
pub type BindingFn = Arc<dyn Fn(&BindingScope<'_>) -> Result<Value, ActionError> + Send + Sync>;

/// Everything a binding may draw on when a stage is about to run
#[derive(Debug, Clone, Copy)]
pub struct BindingScope<'a> {
    /// Application under test
    pub app_name: &'a str,
    /// Auxiliary values supplied by the execution strategy
    pub context: &'a RunContext,
    /// Outputs of the stages that already ran, in order
    pub results: &'a ResultMapping,
}

impl BindingScope<'_> {
    /// Output of the most recent stage, if any ran
    #[inline]
    #[must_use]
    pub fn previous_output(&self) -> Option<&Value> {
        self.results.last().map(|(_, value)| value)
    }

    /// Accumulated results rendered as an ordered JSON object
    #[must_use]
    pub fn results_object(&self) -> Value {
        Value::Object(
            self.results
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        )
    }
}

/// How a stage obtains its input
#[derive(Clone, Default)]
pub enum InputBinding {
    /// The application name
    AppName,
    /// A value from the run context
    Context(String),
    /// All results collected so far, as a JSON object
    #[default]
    PreviousResults,
    /// Output of the preceding stage (`null` for the first stage)
    PreviousOutput,
    /// A constant value
    Literal(Value),
    /// Arbitrary function of the binding scope
    Custom(BindingFn),
}

impl InputBinding {
    /// Bind to a run-context key
    #[inline]
    #[must_use]
    pub fn context(key: impl Into<String>) -> Self {
        Self::Context(key.into())
    }

    /// Bind through a custom function
    #[must_use]
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&BindingScope<'_>) -> Result<Value, ActionError> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Evaluate the binding for `stage`
    pub fn resolve(&self, stage: &str, scope: &BindingScope<'_>) -> Result<Value, StageError> {
        match self {
            Self::AppName => Ok(Value::String(scope.app_name.to_string())),
            Self::Context(key) => {
                scope
                    .context
                    .get(key)
                    .cloned()
                    .ok_or_else(|| StageError::MissingContext {
                        stage: stage.to_string(),
                        key: key.clone(),
                    })
            }
            Self::PreviousResults => Ok(scope.results_object()),
            Self::PreviousOutput => Ok(scope.previous_output().cloned().unwrap_or(Value::Null)),
            Self::Literal(value) => Ok(value.clone()),
            Self::Custom(f) => f(scope).map_err(|source| StageError::BindingFailed {
                stage: stage.to_string(),
                source,
            }),
        }
    }
}

impl fmt::Debug for InputBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AppName => f.write_str("AppName"),
            Self::Context(key) => f.debug_tuple("Context").field(key).finish(),
            Self::PreviousResults => f.write_str("PreviousResults"),
            Self::PreviousOutput => f.write_str("PreviousOutput"),
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A named unit of test work
///
/// Immutable once built; cloning shares the action.
#[derive(Clone)]
pub struct Stage {
    name: String,
    binding: InputBinding,
    action: StageAction,
}

impl Stage {
    /// Create a stage bound to the previous results
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn(Value) -> Result<Value, ActionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            binding: InputBinding::default(),
            action: Arc::new(action),
        }
    }

    /// Create a stage whose action cannot fail
    pub fn infallible<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self::new(name, move |input| Ok(action(input)))
    }

    /// Set the input binding
    #[inline]
    #[must_use]
    pub fn with_binding(mut self, binding: InputBinding) -> Self {
        self.binding = binding;
        self
    }

    /// Stage name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input binding
    #[inline]
    #[must_use]
    pub fn binding(&self) -> &InputBinding {
        &self.binding
    }

    /// Resolve this stage's input from the scope
    pub fn resolve_input(&self, scope: &BindingScope<'_>) -> Result<Value, StageError> {
        self.binding.resolve(&self.name, scope)
    }

    /// Run the action on `input`
    ///
    /// Failures are attributed to this stage; the action's own error is kept
    /// as the source.
    pub fn execute(&self, input: Value) -> Result<Value, StageError> {
        (self.action)(input).map_err(|source| StageError::ActionFailed {
            stage: self.name.clone(),
            source,
        })
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.name)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}
