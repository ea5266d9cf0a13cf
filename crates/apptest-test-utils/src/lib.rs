//! Testing utilities for AppTest workspace
//!
//! Shared stages, collections, and facade fixtures.

#![allow(missing_docs)]

use apptest_core::{AppTestFacade, StageSettings};
use apptest_graph::GraphOptions;
use apptest_registry::{StrategyRegistry, TestRegistry};
use apptest_stage::{InputBinding, Stage, StageCollection};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Stage that returns its input unchanged
pub fn echo_stage(name: &str, binding: InputBinding) -> Stage {
    Stage::infallible(name, |input| input).with_binding(binding)
}

/// Stage that always fails with `message`
pub fn failing_stage(name: &str, message: &'static str) -> Stage {
    Stage::new(name, move |_| Err(message.into()))
}

/// Stage returning a fixed payload
pub fn constant_stage(name: &str, value: Value) -> Stage {
    Stage::infallible(name, move |_| value.clone())
}

/// Records the name of every stage that ran, in order
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage that appends its name to the log, then returns `value`
    pub fn stage(&self, name: &str, value: Value) -> Stage {
        let log = Arc::clone(&self.0);
        let recorded = name.to_string();
        Stage::infallible(name, move |_| {
            log.lock().unwrap().push(recorded.clone());
            value.clone()
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// `connect` output for the Svc fixture
pub fn svc_connect_output(app: &str) -> Value {
    json!({ "connected": app })
}

/// `calculate_metrics` output for the Svc fixture
pub fn svc_metrics_output() -> Value {
    json!({ "status": "success", "metrics": { "mean": 0.25 }, "elapsed_secs": 0.25 })
}

/// `connect` (bound to the app name) then `calculate_metrics`
pub fn svc_collection() -> StageCollection {
    StageCollection::new(vec![
        Stage::infallible("connect", |app| {
            svc_connect_output(app.as_str().unwrap_or_default())
        })
        .with_binding(InputBinding::AppName),
        constant_stage("calculate_metrics", svc_metrics_output()),
    ])
    .unwrap()
}

/// Facade with only the performance test type and strategy
pub fn performance_only_facade() -> AppTestFacade {
    let mut tests = TestRegistry::new();
    tests.register_default::<apptest_registry::PerformanceTest>("performance");
    let mut strategies = StrategyRegistry::new();
    strategies.register_strategy(
        "performance",
        apptest_registry::PerformanceExecutionStrategy::new(),
    );
    AppTestFacade::new(tests, strategies)
}

/// Built-in stage settings writing small graphs under `dir`
pub fn small_settings(dir: &std::path::Path) -> StageSettings {
    StageSettings::new(dir)
        .with_sample_count(25)
        .with_graph(GraphOptions::new(dir).with_size(320, 240).with_bins(10))
}
