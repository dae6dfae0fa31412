//! HTTP client for the restaurant REST backend.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("backend request timed out after {0} seconds")]
    Timeout(u64),

    #[error("backend request failed: {0}")]
    Request(String),
}

/// Status and decoded body of a backend reply.
///
/// Empty bodies decode to `Null`, non-JSON bodies to a string.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: u16,
    pub body: Value,
}

impl BackendResponse {
    /// The backend's `error` field, or `fallback` when absent.
    pub fn error_message(&self, fallback: &str) -> String {
        self.body
            .get("error")
            .and_then(|e| e.as_str())
            .filter(|e| !e.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

/// Client shared by all restaurant tools.
pub struct BackendClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl BackendClient {
    /// Create a client for `base_url` (e.g. `http://localhost:3000/api`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base_url =
            Url::parse(base_url).map_err(|e| BackendError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mesa/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build `{base}/{segments...}`, escaping each segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get(&self, segments: &[&str]) -> Result<BackendResponse, BackendError> {
        let url = self.endpoint(segments)?;
        self.send(self.client.get(url)).await
    }

    pub async fn post(
        &self,
        segments: &[&str],
        body: Option<&Value>,
    ) -> Result<BackendResponse, BackendError> {
        let url = self.endpoint(segments)?;
        let builder = self.client.post(url);
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };
        self.send(builder).await
    }

    pub async fn patch(&self, segments: &[&str], body: &Value) -> Result<BackendResponse, BackendError> {
        let url = self.endpoint(segments)?;
        self.send(self.client.patch(url).json(body)).await
    }

    async fn send(&self, builder: RequestBuilder) -> Result<BackendResponse, BackendError> {
        let response = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| self.map_error(e))?;

        debug!("Backend responded {} ({} bytes)", status, text.len());

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        Ok(BackendResponse { status, body })
    }

    fn map_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout(self.timeout.as_secs())
        } else {
            BackendError::Request(e.to_string())
        }
    }
}
