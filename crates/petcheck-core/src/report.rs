//! Suite report: the machine-readable result of one run
//!
//! Written as `results.json` and printed with `--output json`. The JSON Schema
//! of this format is exported by `petcheck schema`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::verdict::Failure;

/// Outcome of a single scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
}

/// Result of running one scenario
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioResult {
    /// Stable scenario name, e.g. `get_pet_by_id`
    pub name: String,
    /// Feature group: `pet` or `store`
    pub feature: String,
    /// Human-readable title
    pub title: String,
    pub outcome: Outcome,
    /// Titles of the steps that were entered, in order
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub elapsed_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
}

impl ScenarioResult {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }
}

/// Top-level report for a suite run
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SuiteReport {
    /// Base URL the suite ran against
    pub base_url: String,
    /// Scenarios executed
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    /// Scenarios selected but not run (stop-on-failure)
    #[serde(default)]
    pub skipped: u64,
    pub results: Vec<ScenarioResult>,
}

impl SuiteReport {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Append a result and update the counters.
    pub fn record(&mut self, result: ScenarioResult) {
        self.total += 1;
        if result.passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
    }

    /// Failed results, in execution order
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.results.iter().filter(|r| !r.passed())
    }
}

/// Generate JSON Schema for the report format.
#[must_use]
pub fn generate_schema() -> String {
    let schema = schemars::schema_for!(SuiteReport);
    serde_json::to_string_pretty(&schema).expect("schema serialization should not fail")
}
