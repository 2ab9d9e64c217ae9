//! HTTP layer: the `Transport` seam, its reqwest implementation and the
//! endpoint wrapper scenarios call.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, warn};

use petcheck_core::{Config, Exchange, Failure, FailureKind, RequestSnapshot, ResponseSnapshot};

use crate::RunnerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request relative to the base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the base URL, starting with `/`
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            body: Some(body),
        }
    }

    /// Snapshot of this request as sent to `base_url`.
    #[must_use]
    pub fn snapshot(&self, base_url: &str, headers: &HashMap<String, String>) -> RequestSnapshot {
        let mut headers = headers.clone();
        if self.body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        RequestSnapshot {
            method: self.method.as_str().to_string(),
            url: format!("{base_url}{}", self.path),
            headers,
            body: self.body.as_ref().map(Value::to_string),
        }
    }
}

/// The request never produced a response.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{method} {url}: {message}", method = .request.method, url = .request.url)]
pub struct TransportError {
    pub request: RequestSnapshot,
    pub message: String,
}

impl From<TransportError> for Failure {
    fn from(e: TransportError) -> Self {
        Failure::new(FailureKind::Transport, e.to_string()).with_request(e.request)
    }
}

/// Sends one request and captures the exchange.
pub trait Transport {
    /// Base URL every request path is appended to
    fn base_url(&self) -> &str;

    /// # Errors
    ///
    /// Returns error if no response was received.
    fn send(&self, request: &ApiRequest) -> Result<Exchange, TransportError>;
}

/// `Transport` over a blocking reqwest client.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
    headers: HashMap<String, String>,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn from_config(config: &Config) -> Result<Self, RunnerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()
            .map_err(|e| RunnerError::Http(e.to_string()))?;

        let headers = config
            .headers
            .iter()
            .filter(|(name, value)| {
                let valid = reqwest::header::HeaderName::from_bytes(name.as_bytes()).is_ok()
                    && reqwest::header::HeaderValue::from_str(value).is_ok();
                if !valid {
                    warn!(header = %name, "skipping header that is not valid HTTP");
                }
                valid
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Ok(Self {
            client,
            base_url: config.normalized_base_url().to_string(),
            headers,
        })
    }
}

impl Transport for HttpTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn send(&self, request: &ApiRequest) -> Result<Exchange, TransportError> {
        let snapshot = request.snapshot(&self.base_url, &self.headers);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut req = self.client.request(method, &snapshot.url);
        for (k, v) in &self.headers {
            req = req.header(k, v);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let start = Instant::now();
        let resp = match req.send() {
            Ok(r) => r,
            Err(e) => {
                return Err(TransportError {
                    request: snapshot,
                    message: e.to_string(),
                });
            }
        };

        let status_code = resp.status().as_u16();
        let headers: HashMap<String, String> = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|s| (k.as_str().to_string(), s.to_string()))
            })
            .collect();
        let body = match resp.text() {
            Ok(b) => b,
            Err(e) => {
                return Err(TransportError {
                    request: snapshot,
                    message: format!("reading body: {e}"),
                });
            }
        };
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        debug!(
            method = %request.method,
            url = %snapshot.url,
            status = status_code,
            latency_ms,
            "exchange"
        );

        Ok(Exchange {
            request: snapshot,
            response: ResponseSnapshot {
                status_code,
                headers,
                body,
                latency_ms,
            },
        })
    }
}

/// One method per pet store endpoint.
#[derive(Clone, Copy)]
pub struct PetStore<'a> {
    transport: &'a dyn Transport,
}

impl<'a> PetStore<'a> {
    #[must_use]
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// `POST /pet`
    pub fn add_pet(&self, pet: &Value) -> Result<Exchange, TransportError> {
        self.transport.send(&ApiRequest::post("/pet", pet.clone()))
    }

    /// `PUT /pet`
    pub fn update_pet(&self, pet: &Value) -> Result<Exchange, TransportError> {
        self.transport.send(&ApiRequest::put("/pet", pet.clone()))
    }

    /// `GET /pet/{id}`
    pub fn get_pet(&self, id: impl fmt::Display) -> Result<Exchange, TransportError> {
        self.transport.send(&ApiRequest::get(format!("/pet/{id}")))
    }

    /// `DELETE /pet/{id}`
    pub fn delete_pet(&self, id: impl fmt::Display) -> Result<Exchange, TransportError> {
        self.transport.send(&ApiRequest::delete(format!("/pet/{id}")))
    }

    /// `POST /store/order`
    pub fn place_order(&self, order: &Value) -> Result<Exchange, TransportError> {
        self.transport
            .send(&ApiRequest::post("/store/order", order.clone()))
    }

    /// `GET /store/order/{id}`
    pub fn get_order(&self, id: impl fmt::Display) -> Result<Exchange, TransportError> {
        self.transport
            .send(&ApiRequest::get(format!("/store/order/{id}")))
    }

    /// `DELETE /store/order/{id}`
    pub fn delete_order(&self, id: impl fmt::Display) -> Result<Exchange, TransportError> {
        self.transport
            .send(&ApiRequest::delete(format!("/store/order/{id}")))
    }

    /// `GET /store/inventory`
    pub fn get_inventory(&self) -> Result<Exchange, TransportError> {
        self.transport.send(&ApiRequest::get("/store/inventory"))
    }
}
