//! App test facade
//!
//! The single entry point for callers: register apps with their stage
//! collections, then run everything.
//!
//! # Workflow
//! 1. `register_app` stores app name → (test type → stage collection)
//! 2. `run_all_tests` checks every test type resolves to a variant and a strategy
//! 3. each app/test-type pair runs in registration order, one after another
//! 4. results come back as app → test type → stage → output

use crate::error::FacadeError;
use apptest_registry::{StrategyRegistry, TestRegistry};
use apptest_stage::{ResultMapping, StageCollection};
use indexmap::IndexMap;

/// Test type → stage collection for one app
pub type AppStages = IndexMap<String, StageCollection>;

/// Test type → result mapping for one app
pub type AppResults = IndexMap<String, ResultMapping>;

/// App name → per-test-type results
pub type RunResults = IndexMap<String, AppResults>;

/// Registers apps and runs their tests
///
/// Owns its registries, so independent facades can coexist in one process.
#[derive(Debug, Default)]
pub struct AppTestFacade {
    apps: IndexMap<String, AppStages>,
    tests: TestRegistry,
    strategies: StrategyRegistry,
}

impl AppTestFacade {
    /// Create facade over the given registries
    #[inline]
    #[must_use]
    pub fn new(tests: TestRegistry, strategies: StrategyRegistry) -> Self {
        Self {
            apps: IndexMap::new(),
            tests,
            strategies,
        }
    }

    /// Create facade with the built-in test types and strategies
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(TestRegistry::with_defaults(), StrategyRegistry::with_defaults())
    }

    /// Register an app, replacing any previous registration under `name`
    pub fn register_app<I, K>(&mut self, name: impl Into<String>, test_stages: I)
    where
        I: IntoIterator<Item = (K, StageCollection)>,
        K: Into<String>,
    {
        let name = name.into();
        let stages: AppStages = test_stages
            .into_iter()
            .map(|(test_type, collection)| (test_type.into(), collection))
            .collect();

        tracing::info!(app = %name, test_types = stages.len(), "registered app");
        if self.apps.insert(name.clone(), stages).is_some() {
            tracing::debug!(app = %name, "replaced previous registration");
        }
    }

    /// Test type registry
    #[inline]
    #[must_use]
    pub fn tests(&self) -> &TestRegistry {
        &self.tests
    }

    /// Mutable test type registry
    #[inline]
    pub fn tests_mut(&mut self) -> &mut TestRegistry {
        &mut self.tests
    }

    /// Strategy registry
    #[inline]
    #[must_use]
    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    /// Mutable strategy registry
    #[inline]
    pub fn strategies_mut(&mut self) -> &mut StrategyRegistry {
        &mut self.strategies
    }

    /// Registered app names in registration order
    #[must_use]
    pub fn app_names(&self) -> Vec<&str> {
        self.apps.keys().map(String::as_str).collect()
    }

    /// Registered apps with their stage collections, in registration order
    pub fn apps(&self) -> impl Iterator<Item = (&str, &AppStages)> {
        self.apps.iter().map(|(name, stages)| (name.as_str(), stages))
    }

    /// Stage collections registered for an app
    #[inline]
    #[must_use]
    pub fn app(&self, name: &str) -> Option<&AppStages> {
        self.apps.get(name)
    }

    /// Check if app is registered
    #[inline]
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.apps.contains_key(name)
    }

    /// Number of registered apps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// Check if no apps are registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Check that every registered test type resolves to a variant and a strategy
    pub fn validate(&self) -> Result<(), FacadeError> {
        for (app, stages) in &self.apps {
            for test_type in stages.keys() {
                self.tests
                    .create(test_type)
                    .map_err(|e| FacadeError::test(app, test_type, e))?;
                self.strategies
                    .get_strategy(test_type)
                    .map_err(|e| FacadeError::test(app, test_type, e))?;
            }
        }
        Ok(())
    }

    /// Run one test type for one app
    pub fn run_test(&self, app: &str, test_type: &str) -> Result<ResultMapping, FacadeError> {
        let stages = self
            .apps
            .get(app)
            .ok_or_else(|| FacadeError::UnknownApp(app.to_string()))?
            .get(test_type)
            .ok_or_else(|| FacadeError::NoStageCollection {
                app: app.to_string(),
                test_type: test_type.to_string(),
            })?;

        let test = self
            .tests
            .create(test_type)
            .map_err(|e| FacadeError::test(app, test_type, e))?;
        let strategy = self
            .strategies
            .get_strategy(test_type)
            .map_err(|e| FacadeError::test(app, test_type, e))?;

        tracing::info!(app, test_type, "=== running {} test ===", test_type.to_uppercase());
        let results = strategy
            .execute(test.as_ref(), app, stages)
            .map_err(|e| {
                tracing::error!(app, test_type, "error executing test: {}", e);
                FacadeError::test(app, test_type, e)
            })?;

        for (stage, result) in &results {
            tracing::debug!(app, test_type, stage = %stage, %result, "stage result");
        }
        tracing::info!(app, test_type, stages = results.len(), "test completed");
        Ok(results)
    }

    /// Run every registered test type for one app
    pub fn run_app(&self, app: &str) -> Result<AppResults, FacadeError> {
        let stages = self
            .apps
            .get(app)
            .ok_or_else(|| FacadeError::UnknownApp(app.to_string()))?;

        stages
            .keys()
            .map(|test_type| {
                let results = self.run_test(app, test_type)?;
                Ok::<_, FacadeError>((test_type.clone(), results))
            })
            .collect()
    }

    /// Run every registered test for every registered app
    ///
    /// Lookups are checked for all apps before anything runs; the first
    /// stage failure then aborts the whole run.
    pub fn run_all_tests(&self) -> Result<RunResults, FacadeError> {
        self.validate()?;

        self.apps
            .keys()
            .map(|app| Ok::<_, FacadeError>((app.clone(), self.run_app(app)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apptest_stage::{InputBinding, Stage};
    use serde_json::json;

    fn collection() -> StageCollection {
        StageCollection::new(vec![
            Stage::infallible("connect", |_| json!(true)).with_binding(InputBinding::AppName)
        ])
        .unwrap()
    }

    #[test]
    fn facade_creation() {
        let facade = AppTestFacade::with_defaults();
        assert!(facade.is_empty());
        assert_eq!(facade.tests().len(), 3);
        assert_eq!(facade.strategies().len(), 3);
    }

    #[test]
    fn register_app_overwrites() {
        let mut facade = AppTestFacade::with_defaults();
        facade.register_app("A", [("performance", collection())]);
        facade.register_app("A", [("recovery", collection())]);

        assert_eq!(facade.len(), 1);
        let stages = facade.app("A").unwrap();
        assert!(stages.contains_key("recovery"));
        assert!(!stages.contains_key("performance"));
    }

    #[test]
    fn register_app_shares_collection() {
        let shared = collection();
        let mut facade = AppTestFacade::with_defaults();
        facade.register_app("A", [("recovery", shared.clone())]);
        assert!(facade.app("A").unwrap()["recovery"].shares_stages_with(&shared));
    }

    #[test]
    fn run_all_tests_empty() {
        let facade = AppTestFacade::with_defaults();
        assert!(facade.run_all_tests().unwrap().is_empty());
    }

    #[test]
    fn run_test_unknown_app() {
        let facade = AppTestFacade::with_defaults();
        assert!(matches!(
            facade.run_test("ghost", "performance"),
            Err(FacadeError::UnknownApp(_))
        ));
    }

    #[test]
    fn validate_reports_missing_strategy() {
        let mut facade = AppTestFacade::with_defaults();
        facade.strategies_mut().remove("recovery");
        facade.register_app("A", [("recovery", collection())]);

        let err = facade.validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("no execution strategy"));
    }
}
