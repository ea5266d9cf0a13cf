//! Test type registry
//!
//! Provides [`TestRegistry`] mapping test-type keys to variant factories.

use crate::error::TestError;
use crate::variant::{PerformanceTest, RecoveryTest, ReplayTest, TestVariant};
use crate::{PERFORMANCE, RECOVERY, REPLAY};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Builds a fresh variant instance
pub type TestFactory = Arc<dyn Fn() -> Box<dyn TestVariant> + Send + Sync>;

/// Registry of test variants keyed by test type
///
/// Registering an existing key replaces the previous factory.
#[derive(Clone, Default)]
pub struct TestRegistry {
    factories: IndexMap<String, TestFactory>,
}

impl TestRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create registry with the built-in variants
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_default::<ReplayTest>(REPLAY);
        registry.register_default::<PerformanceTest>(PERFORMANCE);
        registry.register_default::<RecoveryTest>(RECOVERY);
        registry
    }

    /// Register a variant factory
    pub fn register<F>(&mut self, key: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn TestVariant> + Send + Sync + 'static,
    {
        let key = key.into();
        if self.factories.insert(key.clone(), Arc::new(factory)).is_some() {
            tracing::debug!(test_type = %key, "replaced registered test variant");
        }
    }

    /// Register a variant type built with `Default`
    pub fn register_default<T>(&mut self, key: impl Into<String>)
    where
        T: TestVariant + Default + 'static,
    {
        self.register(key, || Box::new(T::default()));
    }

    /// Remove a test type
    #[inline]
    pub fn unregister(&mut self, key: &str) -> bool {
        self.factories.shift_remove(key).is_some()
    }

    /// Check if test type exists
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Registered keys in registration order
    #[must_use]
    pub fn registered_types(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Get number of registered test types
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Instantiate the variant registered under `key`
    pub fn create(&self, key: &str) -> Result<Box<dyn TestVariant>, TestError> {
        self.factories
            .get(key)
            .map(|factory| factory())
            .ok_or_else(|| TestError::UnknownTestType {
                key: key.to_string(),
                available: self.factories.keys().cloned().collect(),
            })
    }
}

impl fmt::Debug for TestRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestRegistry")
            .field("types", &self.registered_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct SoakTest;

    impl TestVariant for SoakTest {
        fn name(&self) -> &'static str {
            "soak"
        }
    }

    #[test]
    fn registry_new_empty() {
        let registry = TestRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn registry_with_defaults() {
        let registry = TestRegistry::with_defaults();
        assert_eq!(registry.registered_types(), vec!["replay", "performance", "recovery"]);
        assert_eq!(registry.create("recovery").unwrap().name(), "recovery");
    }

    #[test]
    fn registry_create_unknown() {
        let registry = TestRegistry::with_defaults();
        let err = registry.create("soak").unwrap_err();
        match err {
            TestError::UnknownTestType { key, available } => {
                assert_eq!(key, "soak");
                assert_eq!(available.len(), 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn registry_last_write_wins() {
        let mut registry = TestRegistry::with_defaults();
        registry.register_default::<SoakTest>("performance");

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.create("performance").unwrap().name(), "soak");
    }

    #[test]
    fn registry_unregister() {
        let mut registry = TestRegistry::with_defaults();
        assert!(registry.unregister("replay"));
        assert!(!registry.unregister("replay"));
        assert!(!registry.contains("replay"));
        assert_eq!(registry.registered_types(), vec!["performance", "recovery"]);
    }
}
