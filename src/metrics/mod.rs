//! Metrics collection.
//!
//! This module provides:
//! - Invocation tracking per generation backend
//! - Latency measurements
//! - Success/failure rates
//! - Local-to-cloud fallback events
//!
//! # Example
//!
//! ```
//! use petcare_advisor::backends::BackendKind;
//! use petcare_advisor::metrics::{MetricEvent, MetricsCollector};
//!
//! let metrics = MetricsCollector::new();
//! metrics.record(MetricEvent::new(BackendKind::Local, 150, true));
//! metrics.record(MetricEvent::new(BackendKind::Local, 200, false));
//! metrics.record(MetricEvent::new(BackendKind::Cloud, 900, true));
//!
//! let summary = metrics.summary();
//! assert_eq!(summary.total_invocations, 3);
//! assert!(summary.by_backend.contains_key("local"));
//! assert!(summary.by_backend.contains_key("cloud"));
//! ```

// Allow intentional numeric casts for metrics calculations
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::RwLock;
use std::time::Instant;

use crate::backends::BackendKind;

/// Maximum number of events kept per buffer.
const MAX_EVENTS: usize = 1_000;

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// One backend invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricEvent {
    /// Backend that was called.
    pub backend: BackendKind,
    /// Latency in milliseconds.
    pub latency_ms: u64,
    /// Whether the invocation succeeded.
    pub success: bool,
    /// Timestamp of the event (Unix epoch seconds).
    pub timestamp: u64,
}

impl MetricEvent {
    /// Create a new metric event.
    #[must_use]
    pub fn new(backend: BackendKind, latency_ms: u64, success: bool) -> Self {
        Self {
            backend,
            latency_ms,
            success,
            timestamp: unix_now(),
        }
    }
}

/// Summary statistics for one backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendSummary {
    /// Total invocations.
    pub total_invocations: u64,
    /// Successful invocations.
    pub successful: u64,
    /// Failed invocations.
    pub failed: u64,
    /// Average latency in milliseconds.
    pub avg_latency_ms: f64,
    /// Minimum latency in milliseconds.
    pub min_latency_ms: u64,
    /// Maximum latency in milliseconds.
    pub max_latency_ms: u64,
    /// Success rate (0.0-1.0).
    pub success_rate: f64,
}

/// Overall metrics summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    /// Total invocations across both backends.
    pub total_invocations: u64,
    /// Overall success rate.
    pub overall_success_rate: f64,
    /// Per-backend summaries keyed by backend name.
    pub by_backend: BTreeMap<String, BackendSummary>,
    /// Recent fallbacks.
    pub recent_fallbacks: Vec<FallbackEvent>,
}

/// A request that left one backend for another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackEvent {
    /// Backend that failed.
    pub from: BackendKind,
    /// Backend that took over.
    pub to: BackendKind,
    /// Why the first backend failed.
    pub reason: String,
    /// Timestamp.
    pub timestamp: u64,
}

impl FallbackEvent {
    /// Create a new fallback event.
    #[must_use]
    pub fn new(from: BackendKind, to: BackendKind, reason: impl Into<String>) -> Self {
        Self {
            from,
            to,
            reason: reason.into(),
            timestamp: unix_now(),
        }
    }
}

/// Thread-safe metrics collector.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    events: RwLock<Vec<MetricEvent>>,
    fallbacks: RwLock<Vec<FallbackEvent>>,
}

impl MetricsCollector {
    /// Create a new metrics collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a backend invocation.
    pub fn record(&self, event: MetricEvent) {
        match self.events.write() {
            Ok(mut events) => push_bounded(&mut events, event),
            Err(poison_error) => {
                tracing::error!(
                    backend = %event.backend,
                    error = %poison_error,
                    "Failed to record metric event: RwLock poisoned"
                );
            }
        }
    }

    /// Record a fallback event.
    pub fn record_fallback(&self, fallback: FallbackEvent) {
        match self.fallbacks.write() {
            Ok(mut fallbacks) => push_bounded(&mut fallbacks, fallback),
            Err(poison_error) => {
                tracing::error!(
                    from = %fallback.from,
                    to = %fallback.to,
                    error = %poison_error,
                    "Failed to record fallback event: RwLock poisoned"
                );
            }
        }
    }

    /// Get summary statistics.
    #[must_use]
    pub fn summary(&self) -> MetricsSummary {
        let events = match self.events.read() {
            Ok(e) => e.clone(),
            Err(poison_error) => {
                tracing::warn!(
                    error = %poison_error,
                    "Reading events from poisoned lock, using recovered data"
                );
                poison_error.into_inner().clone()
            }
        };
        let recent_fallbacks = self.fallbacks();

        let mut grouped: BTreeMap<String, Vec<&MetricEvent>> = BTreeMap::new();
        for event in &events {
            grouped
                .entry(event.backend.to_string())
                .or_default()
                .push(event);
        }

        let by_backend = grouped
            .into_iter()
            .map(|(backend, backend_events)| (backend, summarize(&backend_events)))
            .collect();

        let total_invocations = events.len() as u64;
        let total_successful = events.iter().filter(|e| e.success).count() as u64;
        let overall_success_rate = if total_invocations > 0 {
            total_successful as f64 / total_invocations as f64
        } else {
            1.0
        };

        MetricsSummary {
            total_invocations,
            overall_success_rate,
            by_backend,
            recent_fallbacks,
        }
    }

    /// Invocations of one backend.
    #[must_use]
    pub fn invocations_of(&self, backend: BackendKind) -> Vec<MetricEvent> {
        self.events
            .read()
            .map(|events| {
                events
                    .iter()
                    .filter(|e| e.backend == backend)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get recent fallbacks.
    #[must_use]
    pub fn fallbacks(&self) -> Vec<FallbackEvent> {
        self.fallbacks.read().map(|f| f.clone()).unwrap_or_default()
    }

    /// Total number of recorded invocations.
    #[must_use]
    pub fn total_invocations(&self) -> u64 {
        self.events.read().map(|e| e.len() as u64).unwrap_or(0)
    }

    /// Clear all metrics.
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.write() {
            events.clear();
        }
        if let Ok(mut fallbacks) = self.fallbacks.write() {
            fallbacks.clear();
        }
    }
}

fn push_bounded<T>(buffer: &mut Vec<T>, item: T) {
    if buffer.len() >= MAX_EVENTS {
        buffer.remove(0);
    }
    buffer.push(item);
}

fn summarize(events: &[&MetricEvent]) -> BackendSummary {
    let total = events.len() as u64;
    let successful = events.iter().filter(|e| e.success).count() as u64;
    let latencies: Vec<u64> = events.iter().map(|e| e.latency_ms).collect();

    let avg_latency_ms = if latencies.is_empty() {
        0.0
    } else {
        latencies.iter().sum::<u64>() as f64 / latencies.len() as f64
    };

    BackendSummary {
        total_invocations: total,
        successful,
        failed: total - successful,
        avg_latency_ms,
        min_latency_ms: latencies.iter().copied().min().unwrap_or(0),
        max_latency_ms: latencies.iter().copied().max().unwrap_or(0),
        success_rate: if total > 0 {
            successful as f64 / total as f64
        } else {
            0.0
        },
    }
}

/// Timer for measuring operation latency.
#[derive(Debug)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer.
    #[must_use]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(MetricsCollector: Send, Sync, Default);

    #[test]
    fn test_metric_event_new() {
        let event = MetricEvent::new(BackendKind::Local, 100, true);
        assert_eq!(event.backend, BackendKind::Local);
        assert_eq!(event.latency_ms, 100);
        assert!(event.success);
        assert!(event.timestamp > 0);
    }

    #[test]
    fn test_fallback_event_new() {
        let fallback = FallbackEvent::new(BackendKind::Local, BackendKind::Cloud, "probe failed");
        assert_eq!(fallback.from, BackendKind::Local);
        assert_eq!(fallback.to, BackendKind::Cloud);
        assert_eq!(fallback.reason, "probe failed");
    }

    #[test]
    fn test_summary_per_backend() {
        let collector = MetricsCollector::new();
        collector.record(MetricEvent::new(BackendKind::Local, 100, true));
        collector.record(MetricEvent::new(BackendKind::Local, 300, false));
        collector.record(MetricEvent::new(BackendKind::Cloud, 800, true));

        let summary = collector.summary();
        assert_eq!(summary.total_invocations, 3);

        let local = &summary.by_backend["local"];
        assert_eq!(local.total_invocations, 2);
        assert_eq!(local.successful, 1);
        assert_eq!(local.failed, 1);
        assert_eq!(local.avg_latency_ms, 200.0);
        assert_eq!(local.min_latency_ms, 100);
        assert_eq!(local.max_latency_ms, 300);
        assert_eq!(local.success_rate, 0.5);

        assert_eq!(summary.by_backend["cloud"].success_rate, 1.0);
    }

    #[test]
    fn test_summary_empty() {
        let summary = MetricsCollector::new().summary();
        assert_eq!(summary.total_invocations, 0);
        assert_eq!(summary.overall_success_rate, 1.0);
        assert!(summary.by_backend.is_empty());
    }

    #[test]
    fn test_fallbacks_recorded() {
        let collector = MetricsCollector::new();
        collector.record_fallback(FallbackEvent::new(
            BackendKind::Local,
            BackendKind::Cloud,
            "timeout",
        ));
        assert_eq!(collector.fallbacks().len(), 1);
        assert_eq!(collector.summary().recent_fallbacks[0].reason, "timeout");
    }

    #[test]
    fn test_invocations_of() {
        let collector = MetricsCollector::new();
        collector.record(MetricEvent::new(BackendKind::Local, 1, true));
        collector.record(MetricEvent::new(BackendKind::Cloud, 2, true));
        assert_eq!(collector.invocations_of(BackendKind::Cloud).len(), 1);
    }

    #[test]
    fn test_buffer_is_bounded() {
        let collector = MetricsCollector::new();
        for i in 0..(MAX_EVENTS + 5) {
            collector.record(MetricEvent::new(BackendKind::Local, i as u64, true));
        }
        assert_eq!(collector.total_invocations(), MAX_EVENTS as u64);
        let first = collector.invocations_of(BackendKind::Local)[0].latency_ms;
        assert_eq!(first, 5);
    }

    #[test]
    fn test_clear() {
        let collector = MetricsCollector::new();
        collector.record(MetricEvent::new(BackendKind::Local, 1, true));
        collector.clear();
        assert_eq!(collector.total_invocations(), 0);
    }

    #[test]
    fn test_timer() {
        let timer = Timer::start();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(timer.elapsed_ms() >= 5);
    }
}
