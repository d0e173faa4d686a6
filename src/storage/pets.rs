//! Pet profile storage operations.

#![allow(clippy::missing_errors_doc)]

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::core::SqliteStorage;
use crate::error::StorageError;
use crate::traits::{Gender, NewPet, PetProfile};

const CURRENT_PET_KEY: &str = "current_pet_id";

const PET_COLUMNS: &str = "id, name, breed, age, gender, created_at, updated_at";

impl SqliteStorage {
    /// All pets in creation order.
    pub async fn list_pets(&self) -> Result<Vec<PetProfile>, StorageError> {
        let rows = sqlx::query(&format!("SELECT {PET_COLUMNS} FROM pets ORDER BY rowid ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Self::query_error("SELECT pets", format!("{e}")))?;

        rows.iter().map(Self::row_to_pet).collect()
    }

    /// One pet by id.
    pub async fn find_pet(&self, id: &str) -> Result<Option<PetProfile>, StorageError> {
        let row = sqlx::query(&format!("SELECT {PET_COLUMNS} FROM pets WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::query_error("SELECT pets", format!("{e}")))?;

        row.as_ref().map(Self::row_to_pet).transpose()
    }

    /// Insert a pet; the first pet becomes current.
    pub async fn insert_pet(&self, pet: NewPet) -> Result<PetProfile, StorageError> {
        let profile = PetProfile::new(Self::generate_id(), pet.name, pet.breed, pet.age, pet.gender);
        let now_str = profile.created_at.to_rfc3339();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::query_error("BEGIN", format!("{e}")))?;

        sqlx::query(&format!("INSERT INTO pets ({PET_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)"))
            .bind(&profile.id)
            .bind(&profile.name)
            .bind(&profile.breed)
            .bind(&profile.age)
            .bind(profile.gender.as_str())
            .bind(&now_str)
            .bind(&now_str)
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::query_error("INSERT pets", format!("{e}")))?;

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pets")
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| Self::query_error("COUNT pets", format!("{e}")))?;

        if count == 1 {
            sqlx::query(
                "INSERT INTO app_state (key, value) VALUES (?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )
            .bind(CURRENT_PET_KEY)
            .bind(&profile.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::query_error("UPSERT app_state", format!("{e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| Self::query_error("COMMIT", format!("{e}")))?;

        tracing::info!(pet_id = %profile.id, name = %profile.name, "Added pet");
        Ok(profile)
    }

    /// Replace a pet's fields and bump `updated_at`.
    pub async fn replace_pet(&self, id: &str, pet: NewPet) -> Result<PetProfile, StorageError> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE pets SET name = ?, breed = ?, age = ?, gender = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&pet.name)
        .bind(&pet.breed)
        .bind(&pet.age)
        .bind(pet.gender.as_str())
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::query_error("UPDATE pets", format!("{e}")))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::PetNotFound {
                pet_id: id.to_string(),
            });
        }

        self.find_pet(id)
            .await?
            .ok_or_else(|| StorageError::PetNotFound {
                pet_id: id.to_string(),
            })
    }

    /// Delete a pet, its reports and its history.
    pub async fn remove_pet(&self, id: &str) -> Result<(), StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::query_error("BEGIN", format!("{e}")))?;

        sqlx::query("DELETE FROM health_reports WHERE pet_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::query_error("DELETE health_reports", format!("{e}")))?;

        sqlx::query("DELETE FROM symptom_history WHERE pet_key = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::query_error("DELETE symptom_history", format!("{e}")))?;

        let result = sqlx::query("DELETE FROM pets WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::query_error("DELETE pets", format!("{e}")))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::PetNotFound {
                pet_id: id.to_string(),
            });
        }

        // Hand the selection to the oldest remaining pet, or clear it.
        sqlx::query(
            "UPDATE app_state
             SET value = (SELECT id FROM pets ORDER BY rowid ASC LIMIT 1)
             WHERE key = ? AND value = ?",
        )
        .bind(CURRENT_PET_KEY)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::query_error("UPDATE app_state", format!("{e}")))?;

        tx.commit()
            .await
            .map_err(|e| Self::query_error("COMMIT", format!("{e}")))?;

        tracing::info!(pet_id = %id, "Deleted pet");
        Ok(())
    }

    /// The currently selected pet.
    pub async fn current_pet(&self) -> Result<Option<PetProfile>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {PET_COLUMNS} FROM pets
             WHERE id = (SELECT value FROM app_state WHERE key = ?)"
        ))
        .bind(CURRENT_PET_KEY)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT current pet", format!("{e}")))?;

        row.as_ref().map(Self::row_to_pet).transpose()
    }

    /// Select a pet, or clear the selection.
    pub async fn select_pet(&self, id: Option<&str>) -> Result<(), StorageError> {
        if let Some(pet_id) = id {
            if self.find_pet(pet_id).await?.is_none() {
                return Err(StorageError::PetNotFound {
                    pet_id: pet_id.to_string(),
                });
            }
        }

        sqlx::query(
            "INSERT INTO app_state (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(CURRENT_PET_KEY)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::query_error("UPSERT app_state", format!("{e}")))?;

        Ok(())
    }

    fn row_to_pet(row: &SqliteRow) -> Result<PetProfile, StorageError> {
        let gender: String = row.get("gender");
        let created_at: String = row.get("created_at");
        let updated_at: String = row.get("updated_at");

        Ok(PetProfile {
            id: row.get("id"),
            name: row.get("name"),
            breed: row.get("breed"),
            age: row.get("age"),
            gender: gender.parse().unwrap_or(Gender::Unknown),
            created_at: Self::parse_datetime(&created_at)?,
            updated_at: Self::parse_datetime(&updated_at)?,
        })
    }
}
