//! AppTest Registries
//!
//! Pluggable test behaviour for stage collections.
//!
//! # Core Concepts
//!
//! - [`TestVariant`]: sequences a stage collection for one kind of test
//! - [`TestRegistry`]: test-type key → variant factory
//! - [`ExecutionStrategy`]: supplies a variant with its auxiliary context
//! - [`StrategyRegistry`]: test-type key → strategy
//!
//! Built-in keys are `performance`, `replay` and `recovery`.
//!
//! # Example
//!
//! ```rust,ignore
//! use apptest_registry::{StrategyRegistry, TestRegistry};
//!
//! let tests = TestRegistry::with_defaults();
//! let strategies = StrategyRegistry::with_defaults();
//!
//! let variant = tests.create("performance")?;
//! let strategy = strategies.get_strategy("performance")?;
//! let results = strategy.execute(variant.as_ref(), "Svc", &stages)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod registry;
mod strategy;
mod test_registry;
mod variant;

pub use error::TestError;
pub use registry::StrategyRegistry;
pub use strategy::{
    default_batch_data, default_fault, ContextStrategy, ExecutionStrategy,
    PerformanceExecutionStrategy, RecoveryExecutionStrategy, ReplayExecutionStrategy,
};
pub use test_registry::{TestFactory, TestRegistry};
pub use variant::{
    prepare_context, PerformanceTest, RecoveryTest, ReplayTest, TestVariant,
    DEFAULT_RECOVERY_LOG,
};

/// Key of the built-in performance test
pub const PERFORMANCE: &str = "performance";
/// Key of the built-in replay test
pub const REPLAY: &str = "replay";
/// Key of the built-in recovery test
pub const RECOVERY: &str = "recovery";

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
