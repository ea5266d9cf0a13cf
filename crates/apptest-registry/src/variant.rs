//! Test variants
//!
//! A variant decides what context a run needs and then sequences the
//! stages. The sequencing itself is shared; variants differ in the
//! context they demand and default.

use crate::error::TestError;
use crate::strategy::default_fault;
use apptest_stage::{run_stages, ResultMapping, RunContext, StageCollection};
use serde_json::Value;

/// Log path used by the recovery test when the strategy supplies none
pub const DEFAULT_RECOVERY_LOG: &str = "dummy_recovery_log.txt";

/// One kind of test over a stage collection
///
/// Variants hold no shared state; a fresh instance is created per run.
pub trait TestVariant: Send + Sync + std::fmt::Debug {
    /// Variant name (for logging)
    fn name(&self) -> &'static str;

    /// Context keys the execution strategy must supply
    fn required_context(&self) -> &[&'static str] {
        &[]
    }

    /// Context values used when the strategy leaves them out
    fn default_context(&self) -> RunContext {
        RunContext::new()
    }

    /// Run the stages for `app_name`
    fn run(
        &self,
        app_name: &str,
        stages: &StageCollection,
        context: &RunContext,
    ) -> Result<ResultMapping, TestError> {
        let context = prepare_context(self, context)?;
        tracing::info!(
            app = app_name,
            test = self.name(),
            stages = stages.len(),
            "running test"
        );
        Ok(run_stages(app_name, stages, &context)?)
    }
}

/// Check required keys and fill in defaults
pub fn prepare_context<V: TestVariant + ?Sized>(
    variant: &V,
    context: &RunContext,
) -> Result<RunContext, TestError> {
    let mut prepared = context.clone();
    prepared.merge_defaults(&variant.default_context());

    if let Some(key) = variant
        .required_context()
        .iter()
        .find(|key| !prepared.contains_key(key))
    {
        return Err(TestError::MissingContext {
            test_type: variant.name().to_string(),
            key: (*key).to_string(),
        });
    }

    Ok(prepared)
}

/// Sends a batch and measures the responses
#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceTest;

impl TestVariant for PerformanceTest {
    fn name(&self) -> &'static str {
        "performance"
    }

    fn required_context(&self) -> &[&'static str] {
        &["batch_data"]
    }
}

/// Replays a recorded log and injects its data
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayTest;

impl TestVariant for ReplayTest {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn required_context(&self) -> &[&'static str] {
        &["log_path", "batch_data"]
    }
}

/// Injects a fault, then reads the recovery log
///
/// Both `fault` and `recovery_log` fall back to defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveryTest;

impl TestVariant for RecoveryTest {
    fn name(&self) -> &'static str {
        "recovery"
    }

    fn default_context(&self) -> RunContext {
        RunContext::new()
            .with("fault", default_fault())
            .with("recovery_log", Value::String(DEFAULT_RECOVERY_LOG.to_string()))
    }
}
