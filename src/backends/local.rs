//! Local (Ollama-compatible) backend client.
//!
//! Two HTTP clients are kept: a probe client with the short probe timeout
//! for `GET /tags`, and a generation client with the long generation
//! timeout for `POST /generate`. Every call races against the request's
//! [`CancellationToken`]; dropping the in-flight future aborts the
//! connection.

#![allow(clippy::missing_errors_doc)]

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tokio_util::sync::CancellationToken;

use super::types::{
    BackendKind, Generation, LocalErrorResponse, LocalGenerateRequest, LocalGenerateResponse,
    LocalTagsResponse, ModelOptions,
};
use crate::error::BackendError;
use crate::metrics::Timer;

/// Client for a local inference server.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    probe_client: Client,
    client: Client,
    model: String,
    probe_timeout_ms: u64,
    generation_timeout_ms: u64,
}

impl LocalBackend {
    /// Create a local backend client.
    pub fn new(
        model: impl Into<String>,
        probe_timeout_ms: u64,
        generation_timeout_ms: u64,
    ) -> Result<Self, BackendError> {
        Ok(Self {
            probe_client: build_client(probe_timeout_ms)?,
            client: build_client(generation_timeout_ms)?,
            model: model.into(),
            probe_timeout_ms,
            generation_timeout_ms,
        })
    }

    /// Model id used for generation.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// List model names installed at `base_url`.
    pub async fn list_models(
        &self,
        base_url: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, BackendError> {
        let url = format!("{base_url}/tags");
        let timeout_ms = self.probe_timeout_ms;

        let tags: LocalTagsResponse = with_cancel(cancel, async {
            let response = self
                .probe_client
                .get(&url)
                .send()
                .await
                .map_err(|e| send_error(&e, timeout_ms))?;

            let status = response.status();
            if !status.is_success() {
                return Err(BackendError::Status {
                    backend: BackendKind::Local,
                    status: status.as_u16(),
                    message: response.text().await.unwrap_or_default(),
                });
            }

            response
                .json()
                .await
                .map_err(|e| BackendError::UnexpectedResponse {
                    backend: BackendKind::Local,
                    message: format!("Failed to parse model list: {e}"),
                })
        })
        .await?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Probe one candidate: it must answer and list at least one model.
    ///
    /// Returns the number of models found.
    pub async fn probe(
        &self,
        base_url: &str,
        cancel: &CancellationToken,
    ) -> Result<usize, BackendError> {
        let timer = Timer::start();
        let models = self.list_models(base_url, cancel).await?;

        tracing::debug!(
            backend = %BackendKind::Local,
            url = %base_url,
            models = models.len(),
            elapsed_ms = timer.elapsed_ms(),
            "Local probe answered"
        );

        if models.is_empty() {
            return Err(BackendError::NoModels {
                url: base_url.to_string(),
            });
        }
        Ok(models.len())
    }

    /// Generate text at `base_url`.
    pub async fn generate(
        &self,
        base_url: &str,
        prompt: &str,
        options: ModelOptions,
        cancel: &CancellationToken,
    ) -> Result<Generation, BackendError> {
        let url = format!("{base_url}/generate");
        let timeout_ms = self.generation_timeout_ms;
        let body = LocalGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: options.into(),
        };

        tracing::debug!(
            backend = %BackendKind::Local,
            url = %url,
            model = %self.model,
            timeout_ms,
            "Starting local generation"
        );

        let response: LocalGenerateResponse = with_cancel(cancel, async {
            let response = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| send_error(&e, timeout_ms))?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<LocalErrorResponse>(&text)
                    .map_or(text, |body| body.error);
                return Err(BackendError::Status {
                    backend: BackendKind::Local,
                    status: status.as_u16(),
                    message,
                });
            }

            response
                .json()
                .await
                .map_err(|e| BackendError::UnexpectedResponse {
                    backend: BackendKind::Local,
                    message: format!("Failed to parse response: {e}"),
                })
        })
        .await?;

        if response.response.trim().is_empty() {
            return Err(BackendError::UnexpectedResponse {
                backend: BackendKind::Local,
                message: "Empty response".to_string(),
            });
        }

        Ok(Generation {
            text: response.response,
            source: BackendKind::Local,
            model_id: response.model.unwrap_or_else(|| self.model.clone()),
        })
    }
}

fn build_client(timeout_ms: u64) -> Result<Client, BackendError> {
    Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .map_err(|e| BackendError::Network {
            backend: BackendKind::Local,
            message: format!("Failed to create HTTP client: {e}"),
        })
}

fn send_error(e: &reqwest::Error, timeout_ms: u64) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout {
            backend: BackendKind::Local,
            timeout_ms,
        }
    } else {
        BackendError::Network {
            backend: BackendKind::Local,
            message: e.to_string(),
        }
    }
}

/// Run `fut` unless `cancel` fires first.
async fn with_cancel<T, F>(cancel: &CancellationToken, fut: F) -> Result<T, BackendError>
where
    F: Future<Output = Result<T, BackendError>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(BackendError::Cancelled),
        result = fut => result,
    }
}
