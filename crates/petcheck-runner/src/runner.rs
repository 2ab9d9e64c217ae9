//! Sequential suite execution

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tracing::{info, info_span, warn};

use petcheck_core::{
    Config, Failure, FailureKind, Outcome, ScenarioResult, SchemaSet, SuiteReport,
};

use crate::RunnerError;
use crate::client::{HttpTransport, PetStore, Transport};
use crate::ids::IdAllocator;
use crate::scenarios::{self, Scenario, SuiteContext};

/// Transport, contracts and id allocator built from a config.
pub struct SuiteSetup {
    pub transport: HttpTransport,
    pub schemas: SchemaSet,
    pub ids: IdAllocator,
}

impl SuiteSetup {
    /// # Errors
    ///
    /// Returns error if a contract override cannot be loaded or the HTTP
    /// client fails to build.
    pub fn from_config(config: &Config) -> Result<Self, RunnerError> {
        Ok(Self {
            transport: HttpTransport::from_config(config)?,
            schemas: SchemaSet::from_config(config)?,
            ids: IdAllocator::new(config.ids),
        })
    }

    #[must_use]
    pub fn runner(&self) -> SuiteRunner<'_> {
        SuiteRunner::new(&self.transport, &self.schemas, &self.ids)
    }
}

/// Runs the scenario catalogue one scenario at a time.
pub struct SuiteRunner<'a> {
    transport: &'a dyn Transport,
    schemas: &'a SchemaSet,
    ids: &'a IdAllocator,
    /// Substring on scenario name, or a feature name
    filter: Option<String>,
    /// Stop on first failed scenario
    stop_on_failure: bool,
}

impl<'a> SuiteRunner<'a> {
    #[must_use]
    pub fn new(transport: &'a dyn Transport, schemas: &'a SchemaSet, ids: &'a IdAllocator) -> Self {
        Self {
            transport,
            schemas,
            ids,
            filter: None,
            stop_on_failure: false,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter.filter(|f| !f.is_empty());
        self
    }

    #[must_use]
    pub fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Scenarios this runner would execute, in order.
    #[must_use]
    pub fn selected(&self) -> Vec<Scenario> {
        scenarios::all()
            .into_iter()
            .filter(|s| self.filter.as_deref().is_none_or(|f| s.matches(f)))
            .collect()
    }

    pub fn run(&self) -> SuiteReport {
        self.run_scenarios(&self.selected())
    }

    fn run_scenarios(&self, selected: &[Scenario]) -> SuiteReport {
        let mut report = SuiteReport::new(self.transport.base_url());

        info!(
            scenarios = selected.len(),
            base_url = self.transport.base_url(),
            "running suite"
        );

        for (idx, scenario) in selected.iter().enumerate() {
            let result = self.run_one(scenario);
            let failed = !result.passed();
            report.record(result);

            if failed && self.stop_on_failure {
                report.skipped = u64::try_from(selected.len() - idx - 1).unwrap_or(u64::MAX);
                warn!(skipped = report.skipped, "stopping after first failure");
                break;
            }
        }

        report
    }

    fn run_one(&self, scenario: &Scenario) -> ScenarioResult {
        let span = info_span!("scenario", name = scenario.name);
        let _enter = span.enter();

        let ctx = SuiteContext::new(PetStore::new(self.transport), self.schemas, self.ids);
        let start = Instant::now();
        // A panicking scenario fails alone; its fixtures are dropped while unwinding
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (scenario.run)(&ctx)))
            .unwrap_or_else(|payload| Err(panic_failure(payload.as_ref())));
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let (outcome, failure) = match outcome {
            Ok(()) => {
                info!(elapsed_ms, "passed");
                (Outcome::Passed, None)
            }
            Err(failure) => {
                info!(elapsed_ms, kind = ?failure.kind, message = %failure.message, "failed");
                (Outcome::Failed, Some(failure))
            }
        };

        ScenarioResult {
            name: scenario.name.to_string(),
            feature: scenario.feature.to_string(),
            title: scenario.title.to_string(),
            outcome,
            steps: ctx.take_steps(),
            elapsed_ms,
            failure,
        }
    }
}

fn panic_failure(payload: &(dyn Any + Send)) -> Failure {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    Failure::new(FailureKind::Panic, format!("scenario panicked: {message}"))
}
