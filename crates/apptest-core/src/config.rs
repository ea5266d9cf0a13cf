//! Harness configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no
//! file at all) yields one app, `MyApp`, with all three built-in tests.
//!
//! ```toml
//! output_dir = "graphs"
//! sample_count = 100
//! log_level = "info"
//! replay_log_path = "app.log"
//!
//! [batch_data]
//! data = [1, 2, 3]
//!
//! [[apps]]
//! name = "Checkout"
//! tests = ["performance", "recovery"]
//! ```

use crate::error::ConfigError;
use crate::facade::AppTestFacade;
use crate::stages::{stages_for, StageSettings};
use apptest_graph::GraphOptions;
use apptest_registry::{
    default_batch_data, default_fault, PerformanceExecutionStrategy, RecoveryExecutionStrategy,
    ReplayExecutionStrategy, StrategyRegistry, TestRegistry, PERFORMANCE, RECOVERY, REPLAY,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// One app and the test types enabled for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// App name
    pub name: String,
    /// Enabled test types, run in this order
    #[serde(default = "all_test_types")]
    pub tests: Vec<String>,
}

impl AppConfig {
    /// App with all built-in test types
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: all_test_types(),
        }
    }

    /// With enabled test types
    #[must_use]
    pub fn with_tests<I, S>(mut self, tests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tests = tests.into_iter().map(Into::into).collect();
        self
    }
}

fn all_test_types() -> Vec<String> {
    [REPLAY, PERFORMANCE, RECOVERY].map(String::from).to_vec()
}

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory graphs are written to
    pub output_dir: PathBuf,
    /// Simulated samples per batch or log read
    pub sample_count: usize,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit logs as JSON lines
    pub json_logs: bool,
    /// Payload for performance and replay runs
    pub batch_data: Value,
    /// Recorded log replayed by replay runs
    pub replay_log_path: String,
    /// Fault descriptor for recovery runs
    pub recovery_fault: Value,
    /// Apps to register
    pub apps: Vec<AppConfig>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("graphs"),
            sample_count: 100,
            log_level: "info".to_string(),
            json_logs: false,
            batch_data: default_batch_data(),
            replay_log_path: "app.log".to_string(),
            recovery_fault: default_fault(),
            apps: vec![AppConfig::new("MyApp")],
        }
    }
}

impl HarnessConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Keep only the named apps, in the given order
    ///
    /// Names with no configured app get all built-in tests.
    #[must_use]
    pub fn with_only_apps<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.apps = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.apps
                    .iter()
                    .find(|app| app.name == name)
                    .cloned()
                    .unwrap_or_else(|| AppConfig::new(name))
            })
            .collect();
        self
    }

    /// Settings for the built-in stages
    #[must_use]
    pub fn stage_settings(&self) -> StageSettings {
        StageSettings::new(&self.output_dir)
            .with_graph(GraphOptions::new(&self.output_dir))
            .with_sample_count(self.sample_count)
    }

    /// Strategies carrying this configuration's payloads
    #[must_use]
    pub fn strategies(&self) -> StrategyRegistry {
        let mut registry = StrategyRegistry::new();
        registry.register_strategy(
            REPLAY,
            ReplayExecutionStrategy::new()
                .with_log_path(self.replay_log_path.clone())
                .with_batch_data(self.batch_data.clone()),
        );
        registry.register_strategy(
            PERFORMANCE,
            PerformanceExecutionStrategy::new().with_batch_data(self.batch_data.clone()),
        );
        registry.register_strategy(
            RECOVERY,
            RecoveryExecutionStrategy::new().with_fault(self.recovery_fault.clone()),
        );
        registry
    }

    /// Facade with every configured app registered against the built-in stages
    pub fn build_facade(&self) -> Result<AppTestFacade, ConfigError> {
        let settings = self.stage_settings();
        let mut facade = AppTestFacade::new(TestRegistry::with_defaults(), self.strategies());

        for app in &self.apps {
            let collections = app
                .tests
                .iter()
                .map(|test_type| {
                    let stages = stages_for(test_type, &settings).ok_or_else(|| {
                        ConfigError::UnknownTestType {
                            app: app.name.clone(),
                            test_type: test_type.clone(),
                        }
                    })??;
                    Ok::<_, ConfigError>((test_type.clone(), stages))
                })
                .collect::<Result<Vec<_>, ConfigError>>()?;
            facade.register_app(app.name.clone(), collections);
        }

        Ok(facade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(HarnessConfig::from_toml_str("").unwrap(), HarnessConfig::default());
    }

    #[test]
    fn parses_apps_and_payloads() {
        let config = HarnessConfig::from_toml_str(
            r#"
            sample_count = 10
            replay_log_path = "recorded.log"

            [batch_data]
            data = [4, 5]

            [[apps]]
            name = "Checkout"
            tests = ["performance"]

            [[apps]]
            name = "Search"
            "#,
        )
        .unwrap();

        assert_eq!(config.sample_count, 10);
        assert_eq!(config.batch_data, json!({ "data": [4, 5] }));
        assert_eq!(config.apps[0], AppConfig::new("Checkout").with_tests(["performance"]));
        assert_eq!(config.apps[1].tests, all_test_types());
        assert_eq!(config.output_dir, PathBuf::from("graphs"));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = HarnessConfig::from_toml_str("sample_count = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_missing_file() {
        let err = HarnessConfig::load("/nonexistent/apptest.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn with_only_apps_keeps_order() {
        let config = HarnessConfig::default().with_only_apps(&["B", "MyApp"]);
        let names: Vec<_> = config.apps.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["B", "MyApp"]);
    }

    #[test]
    fn build_facade_registers_apps() {
        let facade = HarnessConfig::default().build_facade().unwrap();
        assert_eq!(facade.app_names(), vec!["MyApp"]);
        let stages = facade.app("MyApp").unwrap();
        assert_eq!(
            stages.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["replay", "performance", "recovery"]
        );
    }

    #[test]
    fn build_facade_rejects_unknown_test() {
        let mut config = HarnessConfig::default();
        config.apps = vec![AppConfig::new("A").with_tests(["soak"])];
        let err = config.build_facade().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownTestType { ref test_type, .. } if test_type == "soak"
        ));
    }

    #[test]
    fn recovery_fault_reaches_inject_fault() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = HarnessConfig::from_toml_str(
            r#"
            sample_count = 10

            [recovery_fault]
            kind = "disk_full"
            path = "/var/data"

            [[apps]]
            name = "Checkout"
            tests = ["recovery"]
            "#,
        )
        .unwrap();
        config.output_dir = dir.path().to_path_buf();

        let results = config.build_facade().unwrap().run_all_tests().unwrap();
        let recovery = &results["Checkout"]["recovery"];
        assert_eq!(
            recovery["inject_fault"],
            json!({ "status": "success", "fault": { "kind": "disk_full", "path": "/var/data" } })
        );
        assert_eq!(recovery["create_graphs"]["status"], json!("success"));
    }
}
