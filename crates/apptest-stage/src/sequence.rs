//! Stage sequencing
//!
//! [`run_stages`] walks a collection in order, binds each stage's input,
//! and records its output under the stage name.

use crate::collection::StageCollection;
use crate::error::StageError;
use crate::stage::BindingScope;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stage name → output, in execution order
pub type ResultMapping = IndexMap<String, Value>;

/// Auxiliary values an execution strategy hands to a test run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunContext {
    values: IndexMap<String, Value>,
}

impl RunContext {
    /// Create empty context
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value
    #[inline]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Insert a value, returning the one it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    /// Get a value
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Check if a key is present
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Fill in keys from `defaults` that are not already set
    pub fn merge_defaults(&mut self, defaults: &RunContext) {
        for (key, value) in &defaults.values {
            self.values
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if context is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, Value)> for RunContext {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Run every stage in order, feeding each its bound input
///
/// The first failure stops the sequence and is returned as-is; results of
/// stages that already ran are dropped with it.
pub fn run_stages(
    app_name: &str,
    stages: &StageCollection,
    context: &RunContext,
) -> Result<ResultMapping, StageError> {
    let mut results = ResultMapping::with_capacity(stages.len());

    for stage in stages {
        let input = stage.resolve_input(&BindingScope {
            app_name,
            context,
            results: &results,
        })?;

        tracing::debug!(app = app_name, stage = stage.name(), "executing stage");
        let output = match stage.execute(input) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(app = app_name, stage = stage.name(), "stage failed: {}", e);
                return Err(e);
            }
        };
        results.insert(stage.name().to_string(), output);
    }

    Ok(results)
}
