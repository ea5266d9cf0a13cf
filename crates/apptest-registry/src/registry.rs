//! Strategy registry
//!
//! Provides [`StrategyRegistry`] for looking up execution strategies by
//! test type.

use crate::error::TestError;
use crate::strategy::{
    ExecutionStrategy, PerformanceExecutionStrategy, RecoveryExecutionStrategy,
    ReplayExecutionStrategy,
};
use crate::{PERFORMANCE, RECOVERY, REPLAY};
use indexmap::IndexMap;
use std::sync::Arc;

/// Registry of execution strategies keyed by test type
#[derive(Debug, Default, Clone)]
pub struct StrategyRegistry {
    strategies: IndexMap<String, Arc<dyn ExecutionStrategy>>,
}

impl StrategyRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create registry with built-in strategies
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_strategy(REPLAY, ReplayExecutionStrategy::new());
        registry.register_strategy(PERFORMANCE, PerformanceExecutionStrategy::new());
        registry.register_strategy(RECOVERY, RecoveryExecutionStrategy::new());
        registry
    }

    /// Register a strategy, replacing any previous one for the key
    pub fn register_strategy<S>(&mut self, key: impl Into<String>, strategy: S)
    where
        S: ExecutionStrategy + 'static,
    {
        self.register_shared(key, Arc::new(strategy));
    }

    /// Register an already shared strategy
    pub fn register_shared(
        &mut self,
        key: impl Into<String>,
        strategy: Arc<dyn ExecutionStrategy>,
    ) {
        self.strategies.insert(key.into(), strategy);
    }

    /// Get strategy for a test type
    pub fn get_strategy(&self, key: &str) -> Result<&dyn ExecutionStrategy, TestError> {
        self.strategies
            .get(key)
            .map(|strategy| strategy.as_ref())
            .ok_or_else(|| TestError::UnknownStrategy(key.to_string()))
    }

    /// Check if strategy exists
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.strategies.contains_key(key)
    }

    /// Remove strategy
    #[inline]
    pub fn remove(&mut self, key: &str) -> bool {
        self.strategies.shift_remove(key).is_some()
    }

    /// Registered keys in registration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.strategies.keys().map(String::as_str).collect()
    }

    /// Get number of registered strategies
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::ContextStrategy;
    use apptest_stage::RunContext;

    #[test]
    fn registry_new_empty() {
        let registry = StrategyRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn registry_with_defaults() {
        let registry = StrategyRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["replay", "performance", "recovery"]);
        assert_eq!(registry.get_strategy("replay").unwrap().name(), "replay");
    }

    #[test]
    fn registry_get_unknown() {
        let registry = StrategyRegistry::with_defaults();
        let err = registry.get_strategy("new_test").unwrap_err();
        assert!(matches!(err, TestError::UnknownStrategy(ref key) if key == "new_test"));
    }

    #[test]
    fn registry_register_replaces() {
        let mut registry = StrategyRegistry::with_defaults();
        registry.register_strategy("performance", ContextStrategy::new(RunContext::new()));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get_strategy("performance").unwrap().name(), "context");
    }

    #[test]
    fn registry_remove() {
        let mut registry = StrategyRegistry::with_defaults();
        assert!(registry.remove("recovery"));
        assert!(!registry.contains("recovery"));
    }
}
