//! Failure types and structured representation

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What kind of check a scenario failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Status code differs from the expected one
    StatusMismatch,
    /// Raw body text differs from the expected literal
    BodyMismatch,
    /// Body could not be parsed as JSON
    MalformedJson,
    /// Body does not satisfy its contract
    SchemaViolation,
    /// A response field differs from the request payload
    FieldMismatch,
    /// A fixture could not create its resource
    FixtureSetup,
    /// Request never produced a response (connection, DNS, timeout)
    Transport,
    /// The scenario body panicked
    Panic,
}

impl FailureKind {
    /// Human-readable description
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::StatusMismatch => "Unexpected status code",
            Self::BodyMismatch => "Unexpected response text",
            Self::MalformedJson => "Response is not valid JSON",
            Self::SchemaViolation => "Response does not match schema",
            Self::FieldMismatch => "Response field differs from payload",
            Self::FixtureSetup => "Fixture setup failed",
            Self::Transport => "Request failed before a response arrived",
            Self::Panic => "Scenario panicked",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Snapshot of HTTP request for reproduction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RequestSnapshot {
    pub method: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Snapshot of HTTP response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResponseSnapshot {
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub latency_ms: u64,
}

/// A failed check, with the exchange that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Failure {
    pub kind: FailureKind,
    /// Assertion message, names the field or value involved
    pub message: String,
    /// Request that led to the failure (if one was sent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestSnapshot>,
    /// Response received (if any)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSnapshot>,
}

impl Failure {
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            request: None,
            response: None,
        }
    }

    #[must_use]
    pub fn with_request(mut self, request: RequestSnapshot) -> Self {
        self.request = Some(request);
        self
    }

    #[must_use]
    pub fn with_response(mut self, response: ResponseSnapshot) -> Self {
        self.response = Some(response);
        self
    }

    /// Status code of the captured response, if any
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status_code)
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Failure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FailureKind::SchemaViolation).unwrap();
        assert_eq!(json, "\"schema_violation\"");
    }

    #[test]
    fn failure_display_includes_kind_and_message() {
        let f = Failure::new(FailureKind::StatusMismatch, "expected 200, got 404");
        assert_eq!(
            f.to_string(),
            "Unexpected status code: expected 200, got 404"
        );
    }

    #[test]
    fn failure_without_snapshots_skips_them() {
        let f = Failure::new(FailureKind::Transport, "connection refused");
        let v = serde_json::to_value(&f).unwrap();
        assert!(v.get("request").is_none());
        assert!(v.get("response").is_none());
        assert!(f.status_code().is_none());
    }

    #[test]
    fn failure_roundtrip_with_snapshots() {
        let f = Failure::new(FailureKind::BodyMismatch, "text differs")
            .with_request(RequestSnapshot {
                method: "GET".into(),
                url: "http://localhost/api/v3/pet/9999".into(),
                headers: HashMap::new(),
                body: None,
            })
            .with_response(ResponseSnapshot {
                status_code: 404,
                headers: HashMap::new(),
                body: "Not found".into(),
                latency_ms: 12,
            });
        let json = serde_json::to_string(&f).unwrap();
        let back: Failure = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
        assert_eq!(back.status_code(), Some(404));
    }
}
