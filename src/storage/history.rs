//! Symptom history storage operations.

#![allow(clippy::missing_errors_doc)]

use sqlx::Row;

use super::core::SqliteStorage;
use crate::error::StorageError;
use crate::history::{HistoryEntry, HISTORY_CAP};

impl SqliteStorage {
    /// Record an entry and drop the oldest past the cap.
    pub async fn insert_history_entry(
        &self,
        pet_key: &str,
        entry: &HistoryEntry,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string(entry).map_err(|e| StorageError::Serialization {
            message: format!("Failed to serialize history entry: {e}"),
        })?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::query_error("BEGIN", format!("{e}")))?;

        sqlx::query(
            "INSERT INTO symptom_history (id, pet_key, recorded_at, entry) VALUES (?, ?, ?, ?)",
        )
        .bind(&entry.id)
        .bind(pet_key)
        .bind(entry.timestamp.to_rfc3339())
        .bind(&json)
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::query_error("INSERT symptom_history", format!("{e}")))?;

        sqlx::query(
            "DELETE FROM symptom_history WHERE pet_key = ? AND seq NOT IN
             (SELECT seq FROM symptom_history WHERE pet_key = ? ORDER BY seq DESC LIMIT ?)",
        )
        .bind(pet_key)
        .bind(pet_key)
        .bind(i64::try_from(HISTORY_CAP).unwrap_or(i64::MAX))
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::query_error("DELETE symptom_history", format!("{e}")))?;

        tx.commit()
            .await
            .map_err(|e| Self::query_error("COMMIT", format!("{e}")))?;

        Ok(())
    }

    /// A pet's history, most recent first.
    pub async fn list_history(&self, pet_key: &str) -> Result<Vec<HistoryEntry>, StorageError> {
        let rows = sqlx::query("SELECT entry FROM symptom_history WHERE pet_key = ? ORDER BY seq DESC")
            .bind(pet_key)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Self::query_error("SELECT symptom_history", format!("{e}")))?;

        rows.iter()
            .map(|row| {
                let json: String = row.get("entry");
                serde_json::from_str(&json).map_err(|e| StorageError::Serialization {
                    message: format!("Failed to parse history entry: {e}"),
                })
            })
            .collect()
    }
}
