//! Verdict module - failure representation and pass/fail policy

mod failure;
mod policy;

pub use failure::{Failure, FailureKind, RequestSnapshot, ResponseSnapshot};
pub use policy::{Verdict, VerdictStatus};
