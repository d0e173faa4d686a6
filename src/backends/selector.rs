//! Local-first backend selection with cloud fallback.
//!
//! Per request:
//!
//! ```text
//! PROBE_LOCAL --ok--> CALL_LOCAL --ok--> DONE
//!      |                  |
//!      +--fail------------+--fail--> CALL_CLOUD --ok--> DONE
//!                                         +----fail--> FAILED
//! ```
//!
//! Cancellation during the local phase ends the request as cancelled and
//! never reaches the cloud. The cloud call itself is not cancellable.
//!
//! The adopted local URL is sticky: later requests probe it first and only
//! walk the ranked candidate list again after it fails.

#![allow(clippy::missing_errors_doc)]

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::cloud::CloudBackend;
use super::local::LocalBackend;
use super::types::{BackendKind, Generation, GenerationRequest};
use crate::config::Config;
use crate::error::{BackendError, GenerationError};
use crate::metrics::{FallbackEvent, MetricEvent, MetricsCollector, Timer};
use crate::traits::GenerationBackend;

/// Chooses between the local and cloud backends for each request.
#[derive(Debug)]
pub struct BackendSelector {
    local: LocalBackend,
    candidates: Vec<String>,
    active: RwLock<Option<usize>>,
    cloud: Option<CloudBackend>,
    metrics: Arc<MetricsCollector>,
}

impl BackendSelector {
    /// Create a selector over ranked local candidates and an optional cloud backend.
    #[must_use]
    pub fn new(local: LocalBackend, candidates: Vec<String>, cloud: Option<CloudBackend>) -> Self {
        Self {
            local,
            candidates,
            active: RwLock::new(None),
            cloud,
            metrics: Arc::new(MetricsCollector::new()),
        }
    }

    /// Build both backends from configuration.
    ///
    /// The cloud backend is only created when an API key is configured.
    pub fn from_config(config: &Config) -> Result<Self, BackendError> {
        let local = LocalBackend::new(
            &config.local_model,
            config.probe_timeout_ms,
            config.generation_timeout_ms,
        )?;
        let cloud = config
            .cloud_api_key
            .as_ref()
            .filter(|key| !key.expose().is_empty())
            .map(|key| {
                CloudBackend::new(&config.cloud_endpoint, key.clone(), config.generation_timeout_ms)
            })
            .transpose()?;

        if cloud.is_none() {
            tracing::info!("No cloud API key configured, local failures will be terminal");
        }

        Ok(Self::new(local, config.local_urls.clone(), cloud))
    }

    /// The metrics collector.
    #[must_use]
    pub fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.metrics
    }

    /// Ranked local candidate base URLs.
    #[must_use]
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// The local backend client.
    #[must_use]
    pub const fn local(&self) -> &LocalBackend {
        &self.local
    }

    /// True if a cloud fallback is configured.
    #[must_use]
    pub const fn has_cloud(&self) -> bool {
        self.cloud.is_some()
    }

    /// The currently adopted local base URL, if any.
    #[must_use]
    pub fn active_url(&self) -> Option<String> {
        self.active_index()
            .and_then(|index| self.candidates.get(index).cloned())
    }

    fn active_index(&self) -> Option<usize> {
        match self.active.read() {
            Ok(guard) => *guard,
            Err(poison_error) => *poison_error.into_inner(),
        }
    }

    fn set_active(&self, index: Option<usize>) {
        match self.active.write() {
            Ok(mut guard) => *guard = index,
            Err(poison_error) => *poison_error.into_inner() = index,
        }
    }

    /// Probe order: the sticky candidate first, then the rest by rank.
    fn probe_order(&self) -> Vec<usize> {
        let sticky = self
            .active_index()
            .filter(|index| *index < self.candidates.len());
        sticky
            .into_iter()
            .chain((0..self.candidates.len()).filter(|index| Some(*index) != sticky))
            .collect()
    }

    /// Find a usable local base URL, adopting the first that passes the probe.
    pub async fn resolve_local(&self, cancel: &CancellationToken) -> Result<String, BackendError> {
        for index in self.probe_order() {
            if cancel.is_cancelled() {
                return Err(BackendError::Cancelled);
            }
            let url = &self.candidates[index];

            match self.local.probe(url, cancel).await {
                Ok(models) => {
                    if self.active_index() != Some(index) {
                        tracing::info!(
                            backend = %BackendKind::Local,
                            url = %url,
                            models,
                            "Adopted local backend"
                        );
                    }
                    self.set_active(Some(index));
                    return Ok(url.clone());
                }
                Err(BackendError::Cancelled) => return Err(BackendError::Cancelled),
                Err(e) => {
                    tracing::debug!(
                        backend = %BackendKind::Local,
                        url = %url,
                        error = %e,
                        "Local candidate failed probe"
                    );
                }
            }
        }

        self.set_active(None);
        Err(BackendError::ProbeFailed {
            attempted: self.candidates.len(),
        })
    }

    /// Probe, then generate locally. Clears the sticky URL on failure.
    async fn generate_local(&self, request: &GenerationRequest) -> Result<Generation, BackendError> {
        let url = self.resolve_local(&request.cancel).await?;
        let result = self
            .local
            .generate(&url, &request.prompt, request.options, &request.cancel)
            .await;

        if matches!(&result, Err(e) if !e.is_cancelled()) {
            self.set_active(None);
        }
        result
    }

    /// Run one full local-then-cloud traversal.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Generation, GenerationError> {
        let timer = Timer::start();
        let local_error = match self.generate_local(request).await {
            Ok(generation) => {
                self.metrics
                    .record(MetricEvent::new(BackendKind::Local, timer.elapsed_ms(), true));
                return Ok(generation);
            }
            Err(BackendError::Cancelled) => {
                tracing::info!(backend = %BackendKind::Local, "Generation cancelled");
                return Err(GenerationError::Cancelled);
            }
            Err(e) => e,
        };

        self.metrics
            .record(MetricEvent::new(BackendKind::Local, timer.elapsed_ms(), false));

        if request.cancel.is_cancelled() {
            tracing::info!("Generation cancelled before cloud fallback");
            return Err(GenerationError::Cancelled);
        }

        let Some(cloud) = &self.cloud else {
            tracing::warn!(
                backend = %BackendKind::Local,
                error = %local_error,
                "Local backend failed and no cloud fallback is configured"
            );
            return Err(local_error.into());
        };

        tracing::warn!(
            backend = %BackendKind::Local,
            error = %local_error,
            "Local backend failed, falling back to cloud"
        );
        self.metrics.record_fallback(FallbackEvent::new(
            BackendKind::Local,
            BackendKind::Cloud,
            local_error.to_string(),
        ));

        let timer = Timer::start();
        match cloud.generate(&request.prompt, request.options).await {
            Ok(generation) => {
                self.metrics
                    .record(MetricEvent::new(BackendKind::Cloud, timer.elapsed_ms(), true));
                Ok(generation)
            }
            Err(e) => {
                self.metrics
                    .record(MetricEvent::new(BackendKind::Cloud, timer.elapsed_ms(), false));
                tracing::error!(
                    backend = %BackendKind::Cloud,
                    status = ?e.status(),
                    elapsed_ms = timer.elapsed_ms(),
                    error = %e,
                    "Cloud generation failed"
                );
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl GenerationBackend for BackendSelector {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, GenerationError> {
        Self::generate(self, request).await
    }
}
