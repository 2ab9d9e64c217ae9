//! petcheck-core: Contracts, assertions and verdict logic
//!
//! This crate holds everything about a pet store API check that does not touch
//! the network: the response contracts, the assertion helpers scenarios use,
//! the report format and the pass/fail verdict.

pub mod checks;
pub mod config;
pub mod exchange;
pub mod generator;
pub mod models;
pub mod report;
pub mod schema;
pub mod verdict;

pub use config::{Config, ConfigError, IdStrategy};
pub use exchange::Exchange;
pub use generator::to_http_file;
pub use report::{Outcome, ScenarioResult, SuiteReport};
pub use schema::{InventoryVariant, SchemaError, SchemaLoadError, SchemaName, SchemaSet};
pub use verdict::{
    Failure, FailureKind, RequestSnapshot, ResponseSnapshot, Verdict, VerdictStatus,
};
