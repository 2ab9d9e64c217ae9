//! Runs the full catalogue against a real service.
//!
//! Ignored by default. Point `PETCHECK_BASE_URL` at a pet store and run with
//! `--ignored`.

use petcheck_core::{Config, Verdict, VerdictStatus};
use petcheck_runner::SuiteSetup;

#[test]
#[ignore = "needs a reachable pet store service"]
fn catalogue_passes_against_live_service() {
    let mut config = Config::default().with_env();
    config.timeout_secs = Some(30);

    let setup = SuiteSetup::from_config(&config).unwrap();
    let report = setup.runner().run();

    let failures: Vec<_> = report
        .failures()
        .map(|r| format!("{}: {:?}", r.name, r.failure))
        .collect();
    assert!(failures.is_empty(), "failed scenarios: {failures:#?}");
    assert_eq!(Verdict::from_report(&report).status, VerdictStatus::Pass);
}

#[test]
#[ignore = "needs a reachable pet store service"]
fn store_feature_alone() {
    let config = Config::default().with_env();
    let setup = SuiteSetup::from_config(&config).unwrap();
    let report = setup.runner().with_filter(Some("store".to_string())).run();

    assert_eq!(report.total, 5);
    assert!(report.results.iter().all(|r| r.feature == "store"));
}
