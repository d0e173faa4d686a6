//! Cloud (Gemini-compatible) backend client.

#![allow(clippy::missing_errors_doc)]

use std::time::Duration;

use reqwest::Client;

use super::types::{BackendKind, CloudErrorResponse, CloudRequest, CloudResponse, Generation, ModelOptions};
use crate::config::SecretString;
use crate::error::BackendError;
use crate::metrics::Timer;

/// Client for the hosted text-generation API.
#[derive(Debug, Clone)]
pub struct CloudBackend {
    client: Client,
    endpoint: String,
    api_key: SecretString,
    timeout_ms: u64,
}

impl CloudBackend {
    /// Create a cloud backend client.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: SecretString,
        timeout_ms: u64,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| BackendError::Network {
                backend: BackendKind::Cloud,
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            timeout_ms,
        })
    }

    /// The configured endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Model id taken from the endpoint path (`.../models/{id}:generateContent`).
    #[must_use]
    pub fn model_id(&self) -> &str {
        model_from_endpoint(&self.endpoint)
    }

    /// Generate text for `prompt`.
    ///
    /// Any non-2xx answer is a hard failure carrying the upstream status and
    /// the `error.message` of the body (or the raw body).
    pub async fn generate(
        &self,
        prompt: &str,
        options: ModelOptions,
    ) -> Result<Generation, BackendError> {
        let timer = Timer::start();

        tracing::debug!(
            backend = %BackendKind::Cloud,
            url = %self.endpoint,
            model = %self.model_id(),
            timeout_ms = self.timeout_ms,
            "Starting cloud generation"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.expose())])
            .json(&CloudRequest::from_prompt(prompt, options))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout {
                        backend: BackendKind::Cloud,
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    // reqwest errors include the URL, which carries the key.
                    BackendError::Network {
                        backend: BackendKind::Cloud,
                        message: e.without_url().to_string(),
                    }
                }
            })?;

        let status = response.status();
        tracing::debug!(
            backend = %BackendKind::Cloud,
            status = status.as_u16(),
            elapsed_ms = timer.elapsed_ms(),
            "Cloud response received"
        );

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<CloudErrorResponse>(&text)
                .map(|body| body.error.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or(text);
            return Err(BackendError::Status {
                backend: BackendKind::Cloud,
                status: status.as_u16(),
                message,
            });
        }

        let body: CloudResponse =
            response
                .json()
                .await
                .map_err(|e| BackendError::UnexpectedResponse {
                    backend: BackendKind::Cloud,
                    message: format!("Failed to parse response: {}", e.without_url()),
                })?;

        let text = body
            .first_text()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| BackendError::UnexpectedResponse {
                backend: BackendKind::Cloud,
                message: "No content in response".to_string(),
            })?
            .to_string();

        Ok(Generation {
            text,
            source: BackendKind::Cloud,
            model_id: self.model_id().to_string(),
        })
    }
}

fn model_from_endpoint(endpoint: &str) -> &str {
    let path = endpoint.split('?').next().unwrap_or(endpoint);
    let tail = path.rsplit('/').next().unwrap_or(path);
    let model = tail.split(':').next().unwrap_or(tail);
    if model.is_empty() {
        "cloud"
    } else {
        model
    }
}
