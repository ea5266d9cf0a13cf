//! AppTest Stages
//!
//! The smallest unit of a test plan: a named, callable step with a single
//! input and a JSON result payload.
//!
//! # Core Concepts
//!
//! - [`Stage`]: named action plus the [`InputBinding`] that decides its input
//! - [`StageCollection`]: shared, ordered sequence of uniquely named stages
//! - [`RunContext`]: auxiliary values supplied by an execution strategy
//! - [`ResultMapping`]: stage name → output, in execution order
//! - [`run_stages`]: the sequencing loop every test variant is built on
//!
//! # Example
//!
//! ```rust,ignore
//! use apptest_stage::{run_stages, InputBinding, RunContext, Stage, StageCollection};
//! use serde_json::json;
//!
//! let stages = StageCollection::new(vec![
//!     Stage::new("connect", |_| Ok(json!(true))).with_binding(InputBinding::AppName),
//!     Stage::new("send_batch", |batch| Ok(json!({ "status": "success", "sent": batch })))
//!         .with_binding(InputBinding::context("batch_data")),
//! ])?;
//!
//! let context = RunContext::new().with("batch_data", json!({ "data": [1, 2, 3] }));
//! let results = run_stages("Svc", &stages, &context)?;
//! assert_eq!(results.keys().collect::<Vec<_>>(), ["connect", "send_batch"]);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod collection;
mod error;
mod sequence;
mod stage;

pub use collection::StageCollection;
pub use error::{ActionError, StageError};
pub use sequence::{run_stages, ResultMapping, RunContext};
pub use stage::{BindingFn, BindingScope, InputBinding, Stage, StageAction};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
