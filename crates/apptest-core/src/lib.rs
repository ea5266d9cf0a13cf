//! AppTest Core
//!
//! The facade over stages, registries, metrics and graphs:
//! - Registers apps with a stage collection per test type
//! - Resolves each test type to a variant and an execution strategy
//! - Runs everything sequentially and collects results
//! - Summarizes results into a [`RunReport`]
//!
//! # Example
//!
//! ```rust,ignore
//! use apptest_core::{stages, AppTestFacade, StageSettings};
//!
//! let settings = StageSettings::new("graphs");
//! let mut facade = AppTestFacade::with_defaults();
//! facade.register_app("MyApp", [("performance", stages::performance_stages(&settings)?)]);
//!
//! let results = facade.run_all_tests()?;
//! println!("{}", results["MyApp"]["performance"]["calculate_metrics"]);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod facade;
pub mod report;
pub mod stages;

pub use config::{AppConfig, HarnessConfig};
pub use error::{ConfigError, FacadeError};
pub use facade::{AppResults, AppStages, AppTestFacade, RunResults};
pub use report::{AppReport, RunReport, TestReport};
pub use stages::StageSettings;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for writing test plans
    pub use crate::{AppTestFacade, HarnessConfig, RunReport, StageSettings};
    pub use apptest_registry::{ExecutionStrategy, StrategyRegistry, TestRegistry, TestVariant};
    pub use apptest_stage::{InputBinding, ResultMapping, RunContext, Stage, StageCollection};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
