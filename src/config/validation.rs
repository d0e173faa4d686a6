//! Configuration validation.
//!
//! This module provides validation logic for configuration values,
//! ensuring they are within acceptable ranges.

use super::Config;
use crate::error::ConfigError;

/// Minimum allowed timeout in milliseconds.
pub const MIN_TIMEOUT_MS: u64 = 500;

/// Maximum allowed timeout in milliseconds (5 minutes).
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if:
/// - `LOCAL_LLM_URLS` is empty or contains a non-http(s) URL
/// - `LOCAL_LLM_MODEL` is empty
/// - `LLM_TIMEOUT_MS` or `PROBE_TIMEOUT_MS` is outside 500..=300000
/// - `PROBE_TIMEOUT_MS` exceeds `LLM_TIMEOUT_MS`
/// - `GEMINI_ENDPOINT` is not an http(s) URL
#[must_use = "validation result should be checked"]
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.local_urls.is_empty() {
        return Err(ConfigError::InvalidValue {
            var: "LOCAL_LLM_URLS".into(),
            reason: "must list at least one URL".into(),
        });
    }

    if let Some(bad) = config.local_urls.iter().find(|url| !is_http_url(url)) {
        return Err(ConfigError::InvalidValue {
            var: "LOCAL_LLM_URLS".into(),
            reason: format!("'{bad}' is not an http(s) URL"),
        });
    }

    if config.local_model.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            var: "LOCAL_LLM_MODEL".into(),
            reason: "must not be empty".into(),
        });
    }

    check_timeout("LLM_TIMEOUT_MS", config.generation_timeout_ms)?;
    check_timeout("PROBE_TIMEOUT_MS", config.probe_timeout_ms)?;

    if config.probe_timeout_ms > config.generation_timeout_ms {
        return Err(ConfigError::InvalidValue {
            var: "PROBE_TIMEOUT_MS".into(),
            reason: "must not exceed LLM_TIMEOUT_MS".into(),
        });
    }

    if !is_http_url(&config.cloud_endpoint) {
        return Err(ConfigError::InvalidValue {
            var: "GEMINI_ENDPOINT".into(),
            reason: "must be an http(s) URL".into(),
        });
    }

    Ok(())
}

fn check_timeout(var: &str, value: u64) -> Result<(), ConfigError> {
    if (MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            var: var.into(),
            reason: format!("must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS} ms"),
        })
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
