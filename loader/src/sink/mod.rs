//! Record sinks.
//!
//! A sink takes one serialized record and returns the raw status and body of
//! the response. [`HttpSink`] posts to the products collection; tests provide
//! their own [`RecordSink`] implementations.

use std::time::Duration;

use crate::config::{Settings, USER_AGENT};
use crate::error::{SinkError, SinkResult};

/// Raw outcome of one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkResponse {
    pub status: u16,
    pub body: String,
}

impl SinkResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status. Informational only; callers never branch on it.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Destination for serialized product records.
#[allow(async_fn_in_trait)]
pub trait RecordSink {
    /// Send one JSON payload and return the full response, whatever its status.
    async fn send(&self, payload: &str) -> SinkResult<SinkResponse>;
}

/// HTTP sink: one `POST` with a JSON body per record.
#[derive(Clone)]
pub struct HttpSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSink {
    /// Create a sink for an endpoint with a request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> SinkResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(SinkError::Client)?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Create a sink for the configured endpoint.
    pub fn from_settings(settings: &Settings) -> SinkResult<Self> {
        Self::new(settings.endpoint.clone(), settings.timeout)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RecordSink for HttpSink {
    async fn send(&self, payload: &str) -> SinkResult<SinkResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .body(payload.to_owned())
            .send()
            .await
            .map_err(SinkError::Transport)?;

        let status = response.status().as_u16();
        tracing::debug!(status, "response received");

        let body = response.text().await.map_err(SinkError::Body)?;

        Ok(SinkResponse { status, body })
    }
}
