//! One request/response pair as seen by the suite

use serde::{Deserialize, Serialize};

use crate::verdict::{Failure, FailureKind, RequestSnapshot, ResponseSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub request: RequestSnapshot,
    pub response: ResponseSnapshot,
}

impl Exchange {
    #[must_use]
    pub fn status(&self) -> u16 {
        self.response.status_code
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.response.body
    }

    /// "METHOD url" label for logs and messages
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.request.method, self.request.url)
    }

    /// Build a failure carrying this exchange for reproduction.
    #[must_use]
    pub fn fail(&self, kind: FailureKind, message: impl Into<String>) -> Failure {
        Failure::new(kind, message)
            .with_request(self.request.clone())
            .with_response(self.response.clone())
    }
}
