//! Health report storage operations.

#![allow(clippy::missing_errors_doc)]

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::core::SqliteStorage;
use super::types::{HealthReport, NewHealthReport, StoreStats, REPORT_CAP};
use crate::backends::BackendKind;
use crate::error::StorageError;

const REPORT_COLUMNS: &str = "id, pet_id, report_type, content, source, model_id, generated_at";

impl SqliteStorage {
    /// Save a report and drop the pet's oldest past the cap.
    pub async fn insert_report(
        &self,
        pet_id: &str,
        report: NewHealthReport,
    ) -> Result<HealthReport, StorageError> {
        if self.find_pet(pet_id).await?.is_none() {
            return Err(StorageError::PetNotFound {
                pet_id: pet_id.to_string(),
            });
        }

        let saved = HealthReport {
            id: Self::generate_id(),
            pet_id: pet_id.to_string(),
            report_type: report.report_type,
            content: report.content,
            source: report.source,
            model_id: report.model_id,
            generated_at: report.generated_at,
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::query_error("BEGIN", format!("{e}")))?;

        sqlx::query(&format!(
            "INSERT INTO health_reports ({REPORT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&saved.id)
        .bind(&saved.pet_id)
        .bind(saved.report_type.as_str())
        .bind(&saved.content)
        .bind(saved.source.as_str())
        .bind(&saved.model_id)
        .bind(saved.generated_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::query_error("INSERT health_reports", format!("{e}")))?;

        let pruned = sqlx::query(
            "DELETE FROM health_reports WHERE pet_id = ? AND seq NOT IN
             (SELECT seq FROM health_reports WHERE pet_id = ? ORDER BY seq DESC LIMIT ?)",
        )
        .bind(pet_id)
        .bind(pet_id)
        .bind(i64::try_from(REPORT_CAP).unwrap_or(i64::MAX))
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::query_error("DELETE health_reports", format!("{e}")))?;

        tx.commit()
            .await
            .map_err(|e| Self::query_error("COMMIT", format!("{e}")))?;

        tracing::debug!(
            pet_id = %pet_id,
            report_id = %saved.id,
            source = %saved.source,
            pruned = pruned.rows_affected(),
            "Saved health report"
        );
        Ok(saved)
    }

    /// Reports for a pet, most recent first.
    pub async fn list_reports(&self, pet_id: &str) -> Result<Vec<HealthReport>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {REPORT_COLUMNS} FROM health_reports WHERE pet_id = ? ORDER BY seq DESC"
        ))
        .bind(pet_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT health_reports", format!("{e}")))?;

        rows.iter().map(Self::row_to_report).collect()
    }

    /// The most recent report for a pet.
    pub async fn latest_report(&self, pet_id: &str) -> Result<Option<HealthReport>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {REPORT_COLUMNS} FROM health_reports WHERE pet_id = ?
             ORDER BY seq DESC LIMIT 1"
        ))
        .bind(pet_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT health_reports", format!("{e}")))?;

        row.as_ref().map(Self::row_to_report).transpose()
    }

    /// Delete one report. Deleting a missing report is not an error.
    pub async fn remove_report(&self, pet_id: &str, report_id: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM health_reports WHERE pet_id = ? AND id = ?")
            .bind(pet_id)
            .bind(report_id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::query_error("DELETE health_reports", format!("{e}")))?;
        Ok(())
    }

    /// Counts of pets and reports.
    pub async fn store_stats(&self) -> Result<StoreStats, StorageError> {
        let (total_pets, total_reports, pets_with_reports): (i64, i64, i64) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM pets),
                (SELECT COUNT(*) FROM health_reports),
                (SELECT COUNT(DISTINCT pet_id) FROM health_reports)",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT stats", format!("{e}")))?;

        Ok(StoreStats {
            total_pets: total_pets.unsigned_abs(),
            total_reports: total_reports.unsigned_abs(),
            pets_with_reports: pets_with_reports.unsigned_abs(),
        })
    }

    fn row_to_report(row: &SqliteRow) -> Result<HealthReport, StorageError> {
        let report_type: String = row.get("report_type");
        let source: String = row.get("source");
        let generated_at: String = row.get("generated_at");

        Ok(HealthReport {
            id: row.get("id"),
            pet_id: row.get("pet_id"),
            report_type: report_type
                .parse()
                .map_err(|message| StorageError::Serialization { message })?,
            content: row.get("content"),
            source: match source.as_str() {
                "cloud" => BackendKind::Cloud,
                _ => BackendKind::Local,
            },
            model_id: row.get("model_id"),
            generated_at: Self::parse_datetime(&generated_at)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::prompts::ReportType;
    use crate::storage::core::tests::test_storage;
    use crate::traits::{Gender, NewPet};
    use chrono::Utc;

    fn report(content: &str) -> NewHealthReport {
        NewHealthReport {
            report_type: ReportType::Comprehensive,
            content: content.to_string(),
            source: BackendKind::Local,
            model_id: "qwen2:1.5b".into(),
            generated_at: Utc::now(),
        }
    }

    async fn storage_with_pet() -> (SqliteStorage, String) {
        let storage = test_storage().await;
        let pet = storage
            .insert_pet(NewPet::new("Rex", "Beagle", "3", Gender::Male))
            .await
            .unwrap();
        (storage, pet.id)
    }

    #[tokio::test]
    async fn test_insert_and_latest() {
        let (storage, pet_id) = storage_with_pet().await;
        storage.insert_report(&pet_id, report("first")).await.unwrap();
        let second = storage
            .insert_report(
                &pet_id,
                NewHealthReport {
                    source: BackendKind::Cloud,
                    report_type: ReportType::Emergency,
                    ..report("second")
                },
            )
            .await
            .unwrap();

        let latest = storage.latest_report(&pet_id).await.unwrap().unwrap();
        assert_eq!(latest.id, second.id);
        assert_eq!(latest.source, BackendKind::Cloud);
        assert_eq!(latest.report_type, ReportType::Emergency);
    }

    #[tokio::test]
    async fn test_reports_capped_most_recent_first() {
        let (storage, pet_id) = storage_with_pet().await;
        for i in 0..12 {
            storage
                .insert_report(&pet_id, report(&format!("report {i}")))
                .await
                .unwrap();
        }

        let reports = storage.list_reports(&pet_id).await.unwrap();
        assert_eq!(reports.len(), REPORT_CAP);
        assert_eq!(reports[0].content, "report 11");
        assert_eq!(reports[REPORT_CAP - 1].content, "report 2");
    }

    #[tokio::test]
    async fn test_insert_for_unknown_pet() {
        let storage = test_storage().await;
        assert!(matches!(
            storage.insert_report("ghost", report("x")).await,
            Err(StorageError::PetNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_remove_report() {
        let (storage, pet_id) = storage_with_pet().await;
        let saved = storage.insert_report(&pet_id, report("x")).await.unwrap();

        storage.remove_report(&pet_id, &saved.id).await.unwrap();
        assert!(storage.list_reports(&pet_id).await.unwrap().is_empty());
        assert!(storage.remove_report(&pet_id, &saved.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_deleting_pet_removes_reports() {
        let (storage, pet_id) = storage_with_pet().await;
        storage.insert_report(&pet_id, report("x")).await.unwrap();

        storage.remove_pet(&pet_id).await.unwrap();
        assert!(storage.list_reports(&pet_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stats() {
        let (storage, pet_id) = storage_with_pet().await;
        storage
            .insert_pet(NewPet::new("Mia", "Siamese", "1", Gender::Female))
            .await
            .unwrap();
        storage.insert_report(&pet_id, report("a")).await.unwrap();
        storage.insert_report(&pet_id, report("b")).await.unwrap();

        assert_eq!(
            storage.store_stats().await.unwrap(),
            StoreStats {
                total_pets: 2,
                total_reports: 2,
                pets_with_reports: 1,
            }
        );
    }
}
