//! Ordered stage collections

use crate::error::StageError;
use crate::stage::Stage;
use std::collections::HashSet;
use std::sync::Arc;

/// Ordered, uniquely named sequence of stages
///
/// Order is execution order. Clones share the underlying stages, so a
/// collection registered with several apps is referenced, not copied.
#[derive(Debug, Clone, Default)]
pub struct StageCollection {
    stages: Arc<[Stage]>,
}

impl StageCollection {
    /// Build a collection, rejecting duplicate stage names
    pub fn new(stages: Vec<Stage>) -> Result<Self, StageError> {
        let mut seen = HashSet::with_capacity(stages.len());
        for stage in &stages {
            if !seen.insert(stage.name()) {
                return Err(StageError::DuplicateStage(stage.name().to_string()));
            }
        }
        Ok(Self {
            stages: stages.into(),
        })
    }

    /// Empty collection
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Stage names in execution order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.stages.iter().map(Stage::name).collect()
    }

    /// Look up a stage by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.name() == name)
    }

    /// Check if a stage with this name exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of stages
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Check if collection is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Iterate in execution order
    pub fn iter(&self) -> std::slice::Iter<'_, Stage> {
        self.stages.iter()
    }

    /// Whether two handles point at the same stages
    #[inline]
    #[must_use]
    pub fn shares_stages_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.stages, &other.stages)
    }
}

impl TryFrom<Vec<Stage>> for StageCollection {
    type Error = StageError;

    fn try_from(stages: Vec<Stage>) -> Result<Self, Self::Error> {
        Self::new(stages)
    }
}

impl<'a> IntoIterator for &'a StageCollection {
    type Item = &'a Stage;
    type IntoIter = std::slice::Iter<'a, Stage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
