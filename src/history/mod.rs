//! Symptom history.
//!
//! Every successful symptom check is recorded as a [`HistoryEntry`] in a
//! per-pet log. Logs are most-recent-first and hold at most [`HISTORY_CAP`]
//! entries; older entries are evicted on append.
//!
//! [`analyze_patterns`] looks for symptoms that keep coming back.

mod patterns;

pub use patterns::{
    analyze_patterns, CommonSymptom, PatternAnalysis, PatternSuggestion, SymptomFrequency,
    PATTERN_WINDOW, RECENT_DAYS,
};

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorageError;
use crate::severity::SeverityVerdict;
use crate::traits::{Gender, HistoryStore, PetProfile};

/// Maximum entries kept per pet.
pub const HISTORY_CAP: usize = 20;

/// Key used when a check is made without a pet profile.
pub const UNKNOWN_PET_KEY: &str = "unknown";

/// History key for a pet.
#[must_use]
pub fn pet_key(profile: Option<&PetProfile>) -> String {
    profile.map_or_else(|| UNKNOWN_PET_KEY.to_string(), |p| p.id.clone())
}

/// Profile fields copied at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetSnapshot {
    /// Pet name.
    pub name: String,
    /// Breed.
    pub breed: String,
    /// Age as entered.
    pub age: String,
    /// Gender.
    pub gender: Gender,
}

impl From<&PetProfile> for PetSnapshot {
    fn from(profile: &PetProfile) -> Self {
        Self {
            name: profile.name.clone(),
            breed: profile.breed.clone(),
            age: profile.age.clone(),
            gender: profile.gender,
        }
    }
}

/// One recorded symptom check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Entry identifier.
    pub id: String,
    /// Submission time.
    pub timestamp: DateTime<Utc>,
    /// Symptom text as submitted.
    pub symptom_text: String,
    /// Classifier verdict.
    pub verdict: SeverityVerdict,
    /// Full model answer.
    pub response_text: String,
    /// Pet fields at submission time.
    pub pet_snapshot: Option<PetSnapshot>,
}

impl HistoryEntry {
    /// Create an entry with a fresh id.
    #[must_use]
    pub fn new(
        symptom_text: impl Into<String>,
        verdict: SeverityVerdict,
        response_text: impl Into<String>,
        profile: Option<&PetProfile>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp,
            symptom_text: symptom_text.into(),
            verdict,
            response_text: response_text.into(),
            pet_snapshot: profile.map(PetSnapshot::from),
        }
    }
}

/// A capped, most-recent-first log of entries for one pet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    /// Create an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a log from entries already ordered most-recent-first.
    #[must_use]
    pub fn from_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.truncate(HISTORY_CAP);
        Self { entries }
    }

    /// Add an entry at the front, evicting the oldest past the cap.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAP);
    }

    /// Entries, most recent first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pattern analysis over this log.
    #[must_use]
    pub fn patterns(&self, now: DateTime<Utc>) -> PatternAnalysis {
        analyze_patterns(&self.entries, now)
    }
}

/// Process-local [`HistoryStore`] keyed by pet.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    logs: RwLock<HashMap<String, HistoryLog>>,
}

impl MemoryHistoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, pet_key: &str, entry: HistoryEntry) -> Result<(), StorageError> {
        let mut logs = self.logs.write().map_err(|e| StorageError::QueryFailed {
            query: "append history".into(),
            message: e.to_string(),
        })?;
        logs.entry(pet_key.to_string()).or_default().push(entry);
        Ok(())
    }

    async fn history(&self, pet_key: &str) -> Result<Vec<HistoryEntry>, StorageError> {
        let logs = self.logs.read().map_err(|e| StorageError::QueryFailed {
            query: "read history".into(),
            message: e.to_string(),
        })?;
        Ok(logs
            .get(pet_key)
            .map(|log| log.entries().to_vec())
            .unwrap_or_default())
    }
}
