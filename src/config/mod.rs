//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading
//! - Configuration validation
//! - Default value handling
//! - Secure API key storage via [`SecretString`]
//!
//! The resulting [`Config`] is injected into the backend selector at
//! construction; nothing in the crate reads endpoints or keys from globals.
//!
//! # Example
//!
//! ```
//! use petcare_advisor::config::{Config, SecretString, DEFAULT_LOCAL_MODEL};
//!
//! // Create a config directly (use Config::from_env() in production)
//! let config = Config {
//!     local_urls: vec!["http://localhost:11434/api".to_string()],
//!     local_model: DEFAULT_LOCAL_MODEL.to_string(),
//!     generation_timeout_ms: 60_000,
//!     probe_timeout_ms: 3_000,
//!     cloud_api_key: Some(SecretString::new("AIza-example-key")),
//!     cloud_endpoint: "https://example.invalid/generate".to_string(),
//!     language: "en".to_string(),
//!     database_path: "./data/petcare.db".to_string(),
//!     log_level: "info".to_string(),
//! };
//!
//! // API key is protected from accidental logging
//! let debug = format!("{:?}", config);
//! assert!(debug.contains("<REDACTED>"));
//! assert!(!debug.contains("AIza-example-key"));
//! ```

mod secret;
mod validation;

pub use secret::SecretString;
pub use validation::{validate_config, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS};

use crate::error::ConfigError;

/// Default ranked list of local inference server base URLs.
///
/// A LAN address first (a phone talking to a desktop), then the loopback
/// variants an emulator or desktop build can reach.
pub const DEFAULT_LOCAL_URLS: &[&str] = &[
    "http://192.168.1.100:11434/api",
    "http://localhost:11434/api",
    "http://127.0.0.1:11434/api",
    "http://0.0.0.0:11434/api",
];

/// Default local model identifier.
pub const DEFAULT_LOCAL_MODEL: &str = "qwen2:1.5b";

/// Default generation timeout in milliseconds.
pub const DEFAULT_GENERATION_TIMEOUT_MS: u64 = 60_000;

/// Default per-candidate probe timeout in milliseconds.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 3_000;

/// Default cloud text-generation endpoint.
pub const DEFAULT_CLOUD_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

/// Default response language.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default database path.
pub const DEFAULT_DATABASE_PATH: &str = "./data/petcare.db";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Application configuration.
///
/// Use [`Config::from_env`] to load configuration from environment variables.
///
/// The cloud API key uses [`SecretString`] to prevent accidental logging.
/// When it is absent the cloud backend is disabled and a local failure
/// becomes terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Ranked candidate base URLs of the local inference server.
    pub local_urls: Vec<String>,
    /// Local model identifier.
    pub local_model: String,
    /// Generation timeout in milliseconds (both backends).
    pub generation_timeout_ms: u64,
    /// Per-candidate probe timeout in milliseconds.
    pub probe_timeout_ms: u64,
    /// Cloud API key (protected from logging via [`SecretString`]).
    pub cloud_api_key: Option<SecretString>,
    /// Cloud text-generation endpoint.
    pub cloud_endpoint: String,
    /// Target response language code (en, es, zh).
    pub language: String,
    /// Database path.
    pub database_path: String,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            local_urls: DEFAULT_LOCAL_URLS.iter().map(ToString::to_string).collect(),
            local_model: DEFAULT_LOCAL_MODEL.to_string(),
            generation_timeout_ms: DEFAULT_GENERATION_TIMEOUT_MS,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            cloud_api_key: None,
            cloud_endpoint: DEFAULT_CLOUD_ENDPOINT.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `LOCAL_LLM_URLS`: Comma-separated ranked candidate base URLs
    /// - `LOCAL_LLM_MODEL`: Local model id (default: `qwen2:1.5b`)
    /// - `LLM_TIMEOUT_MS`: Generation timeout (default: `60000`)
    /// - `PROBE_TIMEOUT_MS`: Per-candidate probe timeout (default: `3000`)
    /// - `GEMINI_API_KEY`: Cloud API key; cloud fallback is disabled without it
    /// - `GEMINI_ENDPOINT`: Cloud endpoint
    /// - `APP_LANGUAGE`: Response language (default: `en`)
    /// - `DATABASE_PATH`: Path to `SQLite` database (default: `./data/petcare.db`)
    /// - `LOG_LEVEL`: Logging level (default: `info`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a numeric variable does not parse or any
    /// value fails validation (see [`validate_config`]).
    #[must_use = "configuration should be used"]
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let local_urls = std::env::var("LOCAL_LLM_URLS").map_or_else(
            |_| DEFAULT_LOCAL_URLS.iter().map(ToString::to_string).collect(),
            |raw| parse_url_list(&raw),
        );

        let local_model =
            std::env::var("LOCAL_LLM_MODEL").unwrap_or_else(|_| DEFAULT_LOCAL_MODEL.into());

        let generation_timeout_ms = parse_env_u64("LLM_TIMEOUT_MS", DEFAULT_GENERATION_TIMEOUT_MS)?;
        let probe_timeout_ms = parse_env_u64("PROBE_TIMEOUT_MS", DEFAULT_PROBE_TIMEOUT_MS)?;

        let cloud_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::new);

        let cloud_endpoint =
            std::env::var("GEMINI_ENDPOINT").unwrap_or_else(|_| DEFAULT_CLOUD_ENDPOINT.into());

        let language = std::env::var("APP_LANGUAGE").unwrap_or_else(|_| DEFAULT_LANGUAGE.into());

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.into());

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into());

        let config = Self {
            local_urls,
            local_model,
            generation_timeout_ms,
            probe_timeout_ms,
            cloud_api_key,
            cloud_endpoint,
            language,
            database_path,
            log_level,
        };

        validate_config(&config)?;
        Ok(config)
    }

    /// Returns true if a cloud API key is configured.
    #[must_use]
    pub const fn has_cloud(&self) -> bool {
        self.cloud_api_key.is_some()
    }
}

/// Split a comma-separated URL list, dropping blanks and trailing slashes.
fn parse_url_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(|url| url.trim_end_matches('/').to_string())
        .collect()
}

/// Parse an environment variable as u64, using a default if not set.
fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a positive integer".into(),
        })
    })
}
