//! Error types for the pet care advisor.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`BackendError`]: Failures of a single call against one generation backend
//! - [`GenerationError`]: Outcome of a full local-then-cloud traversal
//! - [`AdvisorError`]: End-to-end flow errors (symptom check, health report)
//! - [`StorageError`]: Database operation errors
//! - [`ConfigError`]: Configuration errors
//!
//! Response parsing never fails: malformed model output degrades to empty
//! sections instead of producing an error.
//!
//! All errors implement `Send + Sync` for async compatibility.

use thiserror::Error;

use crate::backends::BackendKind;

/// Top-level application error.
///
/// This is the error type returned by the binary's command handlers.
/// It wraps all subsystem errors for unified error handling.
#[derive(Debug, Error)]
pub enum AppError {
    /// Advisor flow error.
    #[error("{0}")]
    Advisor(#[from] AdvisorError),

    /// Generation error.
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend construction or listing error.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

impl AppError {
    /// Returns true if the failed action was cancelled by the user.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        match self {
            Self::Advisor(e) => e.is_cancelled(),
            Self::Generation(e) => e.is_cancelled(),
            Self::Backend(e) => e.is_cancelled(),
            Self::Storage(_) | Self::Config(_) => false,
        }
    }

    /// Render the single message shown to the user for a failed action.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Advisor(e) => e.user_message(),
            Self::Generation(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Errors from a single call against one backend.
///
/// The selector absorbs every variant coming from the local backend and
/// falls back to the cloud, except [`BackendError::Cancelled`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Network communication error.
    #[error("{backend} network error: {message}")]
    Network {
        /// Backend that failed.
        backend: BackendKind,
        /// Description of the network error.
        message: String,
    },

    /// Request timed out.
    #[error("{backend} request timeout after {timeout_ms}ms")]
    Timeout {
        /// Backend that timed out.
        backend: BackendKind,
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Backend answered with a non-2xx status.
    #[error("{backend} returned status {status}: {message}")]
    Status {
        /// Backend that failed.
        backend: BackendKind,
        /// HTTP status code.
        status: u16,
        /// Upstream error message, if any.
        message: String,
    },

    /// A candidate URL answered but listed no models.
    #[error("No models available at {url}")]
    NoModels {
        /// The candidate base URL.
        url: String,
    },

    /// No candidate local URL passed the probe.
    #[error("Local probe failed: none of {attempted} candidate URLs is usable")]
    ProbeFailed {
        /// Number of candidates tried.
        attempted: usize,
    },

    /// Response body did not match the expected shape.
    #[error("Unexpected {backend} response: {message}")]
    UnexpectedResponse {
        /// Backend that answered.
        backend: BackendKind,
        /// What was unexpected.
        message: String,
    },

    /// The request was cancelled by the caller.
    #[error("Request cancelled")]
    Cancelled,
}

impl BackendError {
    /// Returns true if this is a user-initiated cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The HTTP status carried by this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend this error originated from, if known.
    #[must_use]
    pub const fn backend(&self) -> Option<BackendKind> {
        match self {
            Self::Network { backend, .. }
            | Self::Timeout { backend, .. }
            | Self::Status { backend, .. }
            | Self::UnexpectedResponse { backend, .. } => Some(*backend),
            Self::NoModels { .. } | Self::ProbeFailed { .. } => Some(BackendKind::Local),
            Self::Cancelled => None,
        }
    }

    /// Upstream message without the variant prefix.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Status { message, .. }
            | Self::Network { message, .. }
            | Self::UnexpectedResponse { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Outcome of a failed generation after the selector exhausted its options.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The user cancelled the request; not a failure.
    #[error("Generation cancelled")]
    Cancelled,

    /// The last backend tried failed.
    #[error("{backend} generation failed{}: {message}", status_suffix(*.status))]
    Failed {
        /// Backend that produced the terminal failure.
        backend: BackendKind,
        /// HTTP status, when the backend answered.
        status: Option<u16>,
        /// Upstream or transport message.
        message: String,
    },
}

impl GenerationError {
    /// Returns true if the generation was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Render the message shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Cancelled => "Request cancelled.".to_string(),
            Self::Failed {
                status: Some(status),
                message,
                ..
            } => format!("Could not get a response from the AI. API Error: {status} - {message}"),
            Self::Failed { message, .. } => {
                format!("Could not get a response from the AI: {message}")
            }
        }
    }
}

fn status_suffix(status: Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl From<BackendError> for GenerationError {
    fn from(err: BackendError) -> Self {
        if err.is_cancelled() {
            return Self::Cancelled;
        }
        Self::Failed {
            backend: err.backend().unwrap_or(BackendKind::Cloud),
            status: err.status(),
            message: err.detail(),
        }
    }
}

/// End-to-end advisor flow errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    /// Symptom text was empty or whitespace.
    #[error("Please describe your pet's symptoms first")]
    EmptySymptoms,

    /// No pet profile available for a flow that requires one.
    #[error("Please create a pet profile first")]
    NoPetProfile,

    /// Generation failed or was cancelled.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Persisting the result failed.
    #[error("Failed to save result: {0}")]
    Storage(#[from] StorageError),
}

impl AdvisorError {
    /// Returns true if the flow was cancelled by the user.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Generation(GenerationError::Cancelled))
    }

    /// Render the message shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Generation(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Storage errors.
///
/// These errors represent failures in database operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Failed to connect to the database.
    #[error("Database connection failed: {message}")]
    ConnectionFailed {
        /// Description of the connection failure.
        message: String,
    },

    /// A database query failed.
    #[error("Query failed: {query} - {message}")]
    QueryFailed {
        /// The query that failed (may be truncated).
        query: String,
        /// Description of the failure.
        message: String,
    },

    /// Pet not found.
    #[error("Pet not found: {pet_id}")]
    PetNotFound {
        /// The pet ID that was not found.
        pet_id: String,
    },

    /// Database migration failed.
    #[error("Migration failed: {version} - {message}")]
    MigrationFailed {
        /// The migration version that failed.
        version: String,
        /// Description of the failure.
        message: String,
    },

    /// A stored value could not be (de)serialized.
    #[error("Serialization failed: {message}")]
    Serialization {
        /// Description of the failure.
        message: String,
    },
}

/// Configuration errors.
///
/// These errors represent failures in configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}
