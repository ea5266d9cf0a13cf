//! Execution strategies
//!
//! A strategy binds configuration to a run: it assembles the auxiliary
//! context a [`TestVariant`] needs and delegates to its `run`.

use crate::error::TestError;
use crate::variant::TestVariant;
use apptest_stage::{ResultMapping, RunContext, StageCollection};
use serde_json::{json, Value};

/// Batch payload sent when none is configured
#[must_use]
pub fn default_batch_data() -> Value {
    json!({ "data": [1, 2, 3] })
}

/// Fault descriptor used when none is configured
#[must_use]
pub fn default_fault() -> Value {
    json!({ "kind": "process_restart" })
}

/// Supplies a test variant with its auxiliary context
pub trait ExecutionStrategy: Send + Sync + std::fmt::Debug {
    /// Strategy name (for debugging)
    fn name(&self) -> &'static str;

    /// Context handed to the variant
    fn context(&self) -> RunContext;

    /// Run `test` over `stages` with this strategy's context
    fn execute(
        &self,
        test: &dyn TestVariant,
        app_name: &str,
        stages: &StageCollection,
    ) -> Result<ResultMapping, TestError> {
        tracing::debug!(
            app = app_name,
            strategy = self.name(),
            test = test.name(),
            "executing with strategy"
        );
        test.run(app_name, stages, &self.context())
    }
}

/// Supplies `batch_data`
#[derive(Debug, Clone)]
pub struct PerformanceExecutionStrategy {
    batch_data: Value,
}

impl PerformanceExecutionStrategy {
    /// Create strategy with the default batch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            batch_data: default_batch_data(),
        }
    }

    /// Set batch payload
    #[inline]
    #[must_use]
    pub fn with_batch_data(mut self, batch_data: Value) -> Self {
        self.batch_data = batch_data;
        self
    }
}

impl Default for PerformanceExecutionStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionStrategy for PerformanceExecutionStrategy {
    fn name(&self) -> &'static str {
        "performance"
    }

    fn context(&self) -> RunContext {
        RunContext::new().with("batch_data", self.batch_data.clone())
    }
}

/// Supplies the recorded `log_path` and the `batch_data` to inject
#[derive(Debug, Clone)]
pub struct ReplayExecutionStrategy {
    log_path: String,
    batch_data: Value,
}

impl ReplayExecutionStrategy {
    /// Create strategy replaying `app.log`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            log_path: "app.log".to_string(),
            batch_data: default_batch_data(),
        }
    }

    /// Set recorded log path
    #[inline]
    #[must_use]
    pub fn with_log_path(mut self, log_path: impl Into<String>) -> Self {
        self.log_path = log_path.into();
        self
    }

    /// Set batch payload
    #[inline]
    #[must_use]
    pub fn with_batch_data(mut self, batch_data: Value) -> Self {
        self.batch_data = batch_data;
        self
    }
}

impl Default for ReplayExecutionStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionStrategy for ReplayExecutionStrategy {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn context(&self) -> RunContext {
        RunContext::new()
            .with("log_path", Value::String(self.log_path.clone()))
            .with("batch_data", self.batch_data.clone())
    }
}

/// Supplies a `fault` descriptor
#[derive(Debug, Clone)]
pub struct RecoveryExecutionStrategy {
    fault: Value,
}

impl RecoveryExecutionStrategy {
    /// Create strategy with the default fault
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            fault: default_fault(),
        }
    }

    /// Set fault descriptor
    #[inline]
    #[must_use]
    pub fn with_fault(mut self, fault: Value) -> Self {
        self.fault = fault;
        self
    }
}

impl Default for RecoveryExecutionStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionStrategy for RecoveryExecutionStrategy {
    fn name(&self) -> &'static str {
        "recovery"
    }

    fn context(&self) -> RunContext {
        RunContext::new().with("fault", self.fault.clone())
    }
}

/// Strategy carrying an arbitrary fixed context
///
/// Lets new test types be wired up without writing a strategy type.
#[derive(Debug, Clone, Default)]
pub struct ContextStrategy {
    context: RunContext,
}

impl ContextStrategy {
    /// Create strategy with the given context
    #[inline]
    #[must_use]
    pub fn new(context: RunContext) -> Self {
        Self { context }
    }
}

impl ExecutionStrategy for ContextStrategy {
    fn name(&self) -> &'static str {
        "context"
    }

    fn context(&self) -> RunContext {
        self.context.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{PerformanceTest, ReplayTest};
    use apptest_stage::{InputBinding, Stage};
    use pretty_assertions::assert_eq;

    fn echo(name: &str, binding: InputBinding) -> Stage {
        Stage::infallible(name, |v| v).with_binding(binding)
    }

    #[test]
    fn replay_strategy_supplies_log_and_batch() {
        let stages = StageCollection::new(vec![
            echo("connect", InputBinding::AppName),
            echo("get_log", InputBinding::context("log_path")),
            echo("inject_data", InputBinding::context("batch_data")),
        ])
        .unwrap();

        let strategy = ReplayExecutionStrategy::new().with_log_path("recorded.log");
        let results = strategy.execute(&ReplayTest, "Svc", &stages).unwrap();

        assert_eq!(results["get_log"], json!("recorded.log"));
        assert_eq!(results["inject_data"], default_batch_data());
    }

    #[test]
    fn performance_strategy_custom_batch() {
        let stages =
            StageCollection::new(vec![echo("send_batch", InputBinding::context("batch_data"))])
                .unwrap();
        let strategy = PerformanceExecutionStrategy::new().with_batch_data(json!({ "data": [9] }));

        let results = strategy.execute(&PerformanceTest, "Svc", &stages).unwrap();
        assert_eq!(results["send_batch"], json!({ "data": [9] }));
    }

    #[test]
    fn recovery_strategy_supplies_fault() {
        let context = RecoveryExecutionStrategy::new().context();
        assert_eq!(context.get("fault"), Some(&default_fault()));
    }

    #[test]
    fn mismatched_strategy_is_rejected_by_variant() {
        let strategy = RecoveryExecutionStrategy::new();
        let err = strategy
            .execute(&PerformanceTest, "Svc", &StageCollection::empty())
            .unwrap_err();
        assert!(matches!(err, TestError::MissingContext { .. }));
    }

    #[test]
    fn context_strategy_passes_through() {
        let strategy = ContextStrategy::new(RunContext::new().with("threshold", json!(0.5)));
        assert_eq!(strategy.context().get("threshold"), Some(&json!(0.5)));
    }
}
