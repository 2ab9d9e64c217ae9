//! petcheck-runner: executes the pet store scenario catalogue
//!
//! Sends requests through a [`Transport`] (reqwest in production), manages
//! fixture lifetimes and collects a [`petcheck_core::SuiteReport`].

pub mod client;
pub mod fixtures;
pub mod ids;
pub mod runner;
pub mod scenarios;

#[cfg(test)]
mod fake;

pub use client::{ApiRequest, HttpTransport, Method, PetStore, Transport, TransportError};
pub use fixtures::{Fixture, ResourceKind};
pub use ids::IdAllocator;
pub use runner::{SuiteRunner, SuiteSetup};
pub use scenarios::{Feature, Scenario, SuiteContext};

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error(transparent)]
    Schema(#[from] petcheck_core::SchemaLoadError),
}
