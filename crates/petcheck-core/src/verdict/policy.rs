//! Verdict - turns a suite report into pass/fail and an exit code

use crate::report::SuiteReport;

/// Final verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub exit_code: i32,
    pub reason: String,
}

impl Verdict {
    /// PASS requires at least one scenario and **all** scenarios passed.
    #[must_use]
    pub fn from_report(report: &SuiteReport) -> Self {
        let status = if report.total > 0 && report.failed == 0 {
            VerdictStatus::Pass
        } else {
            VerdictStatus::Fail
        };

        let reason = if report.total == 0 {
            "No scenarios were run".to_string()
        } else if status == VerdictStatus::Pass {
            format!("All {} scenarios passed", report.total)
        } else {
            let mut parts = vec![format!(
                "{} of {} scenarios failed",
                report.failed, report.total
            )];
            if report.skipped > 0 {
                parts.push(format!("{} skipped after first failure", report.skipped));
            }
            parts.join("; ")
        };

        Self {
            status,
            exit_code: status.exit_code(),
            reason,
        }
    }
}

/// Pass or fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictStatus {
    Pass,
    Fail,
}

impl VerdictStatus {
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Pass => 0,
            Self::Fail => 1,
        }
    }
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Outcome, ScenarioResult};
    use crate::verdict::{Failure, FailureKind};

    fn result(outcome: Outcome) -> ScenarioResult {
        ScenarioResult {
            name: "add_new_pet".into(),
            feature: "pet".into(),
            title: "Add a new pet".into(),
            outcome,
            steps: vec![],
            elapsed_ms: 0,
            failure: (outcome == Outcome::Failed)
                .then(|| Failure::new(FailureKind::FieldMismatch, "name differs")),
        }
    }

    #[test]
    fn all_passed_is_pass() {
        let mut report = SuiteReport::new("http://localhost");
        report.record(result(Outcome::Passed));
        report.record(result(Outcome::Passed));

        let v = Verdict::from_report(&report);
        assert_eq!(v.status, VerdictStatus::Pass);
        assert_eq!(v.exit_code, 0);
        assert_eq!(v.reason, "All 2 scenarios passed");
    }

    #[test]
    fn any_failure_is_fail() {
        let mut report = SuiteReport::new("http://localhost");
        report.record(result(Outcome::Passed));
        report.record(result(Outcome::Failed));

        let v = Verdict::from_report(&report);
        assert_eq!(v.status, VerdictStatus::Fail);
        assert_eq!(v.exit_code, 1);
        assert_eq!(v.reason, "1 of 2 scenarios failed");
    }

    #[test]
    fn empty_run_is_fail() {
        let report = SuiteReport::new("http://localhost");
        let v = Verdict::from_report(&report);
        assert_eq!(v.status, VerdictStatus::Fail);
        assert_eq!(v.reason, "No scenarios were run");
    }

    #[test]
    fn skipped_count_in_reason() {
        let mut report = SuiteReport::new("http://localhost");
        report.record(result(Outcome::Failed));
        report.skipped = 4;
        let v = Verdict::from_report(&report);
        assert_eq!(v.reason, "1 of 1 scenarios failed; 4 skipped after first failure");
    }

    #[test]
    fn display_status() {
        assert_eq!(VerdictStatus::Pass.to_string(), "PASS");
        assert_eq!(VerdictStatus::Fail.to_string(), "FAIL");
    }
}
