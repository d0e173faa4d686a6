//! Trait definitions for mockable dependencies.
//!
//! This module defines traits for:
//! - [`GenerationBackend`]: Text generation (the backend selector in production)
//! - [`PetStore`]: Pet profiles and saved health reports
//! - [`HistoryStore`]: Per-pet symptom history
//! - [`TimeProvider`]: Time abstraction for testing
//!
//! It also re-exports the pet data model from the `types` submodule.
//!
//! # Mocking
//!
//! All traits are annotated with `#[cfg_attr(test, mockall::automock)]`
//! which generates mock implementations automatically for testing.
//!
//! # Example
//!
//! ```
//! use petcare_advisor::traits::{TimeProvider, RealTimeProvider};
//!
//! let time_provider = RealTimeProvider;
//! let now = time_provider.now();
//! println!("Current time: {now}");
//! ```

mod types;

pub use types::{parse_age, Gender, NewPet, PetProfile};

// Re-export storage types used by the store traits
pub use crate::storage::{HealthReport, NewHealthReport, StoreStats};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::backends::{Generation, GenerationRequest};
use crate::error::{GenerationError, StorageError};
use crate::history::HistoryEntry;

/// Text generation trait for mocking.
///
/// Implementations run one full traversal of their backends per call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text for the request.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Cancelled`] if the request's token fired,
    /// or [`GenerationError::Failed`] when no backend produced an answer.
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, GenerationError>;
}

/// Pet store trait for mocking.
///
/// All methods return [`StorageError`] if the underlying operation fails.
#[allow(clippy::missing_errors_doc)]
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetStore: Send + Sync {
    /// All pets, oldest first.
    async fn get_all_pets(&self) -> Result<Vec<PetProfile>, StorageError>;

    /// One pet by id.
    async fn get_pet(&self, id: &str) -> Result<Option<PetProfile>, StorageError>;

    /// Add a pet. The first pet added becomes current.
    async fn add_pet(&self, pet: NewPet) -> Result<PetProfile, StorageError>;

    /// Replace a pet's fields.
    ///
    /// Returns [`StorageError::PetNotFound`] for an unknown id.
    async fn update_pet(&self, id: &str, pet: NewPet) -> Result<PetProfile, StorageError>;

    /// Delete a pet with its reports and history.
    ///
    /// If it was current, the oldest remaining pet becomes current.
    async fn delete_pet(&self, id: &str) -> Result<(), StorageError>;

    /// The current pet, if any.
    async fn get_current_pet(&self) -> Result<Option<PetProfile>, StorageError>;

    /// Select the current pet, or clear the selection with `None`.
    async fn set_current_pet(&self, id: Option<String>) -> Result<(), StorageError>;

    /// Save a report, keeping the most recent per pet.
    async fn save_health_report(
        &self,
        pet_id: &str,
        report: NewHealthReport,
    ) -> Result<HealthReport, StorageError>;

    /// Reports for a pet, most recent first.
    async fn get_health_reports(&self, pet_id: &str) -> Result<Vec<HealthReport>, StorageError>;

    /// The most recent report for a pet.
    async fn get_latest_health_report(
        &self,
        pet_id: &str,
    ) -> Result<Option<HealthReport>, StorageError>;

    /// Delete one report.
    async fn delete_health_report(&self, pet_id: &str, report_id: &str)
        -> Result<(), StorageError>;

    /// Store-wide counts.
    async fn stats(&self) -> Result<StoreStats, StorageError>;
}

/// Symptom history store trait for mocking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Record an entry at the front of the pet's log.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the entry cannot be stored.
    async fn append(&self, pet_key: &str, entry: HistoryEntry) -> Result<(), StorageError>;

    /// The pet's log, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the log cannot be read.
    async fn history(&self, pet_key: &str) -> Result<Vec<HistoryEntry>, StorageError>;
}

/// Time provider trait for deterministic testing.
#[cfg_attr(test, mockall::automock)]
pub trait TimeProvider: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Real time provider using system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
