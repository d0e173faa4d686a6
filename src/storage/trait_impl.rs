//! `PetStore` and `HistoryStore` implementations for `SqliteStorage`.

use async_trait::async_trait;

use super::core::SqliteStorage;
use super::types::{HealthReport, NewHealthReport, StoreStats};
use crate::error::StorageError;
use crate::history::HistoryEntry;
use crate::traits::{HistoryStore, NewPet, PetProfile, PetStore};

#[async_trait]
impl PetStore for SqliteStorage {
    async fn get_all_pets(&self) -> Result<Vec<PetProfile>, StorageError> {
        self.list_pets().await
    }

    async fn get_pet(&self, id: &str) -> Result<Option<PetProfile>, StorageError> {
        self.find_pet(id).await
    }

    async fn add_pet(&self, pet: NewPet) -> Result<PetProfile, StorageError> {
        self.insert_pet(pet).await
    }

    async fn update_pet(&self, id: &str, pet: NewPet) -> Result<PetProfile, StorageError> {
        self.replace_pet(id, pet).await
    }

    async fn delete_pet(&self, id: &str) -> Result<(), StorageError> {
        self.remove_pet(id).await
    }

    async fn get_current_pet(&self) -> Result<Option<PetProfile>, StorageError> {
        self.current_pet().await
    }

    async fn set_current_pet(&self, id: Option<String>) -> Result<(), StorageError> {
        self.select_pet(id.as_deref()).await
    }

    async fn save_health_report(
        &self,
        pet_id: &str,
        report: NewHealthReport,
    ) -> Result<HealthReport, StorageError> {
        self.insert_report(pet_id, report).await
    }

    async fn get_health_reports(&self, pet_id: &str) -> Result<Vec<HealthReport>, StorageError> {
        self.list_reports(pet_id).await
    }

    async fn get_latest_health_report(
        &self,
        pet_id: &str,
    ) -> Result<Option<HealthReport>, StorageError> {
        self.latest_report(pet_id).await
    }

    async fn delete_health_report(
        &self,
        pet_id: &str,
        report_id: &str,
    ) -> Result<(), StorageError> {
        self.remove_report(pet_id, report_id).await
    }

    async fn stats(&self) -> Result<StoreStats, StorageError> {
        self.store_stats().await
    }
}

#[async_trait]
impl HistoryStore for SqliteStorage {
    async fn append(&self, pet_key: &str, entry: HistoryEntry) -> Result<(), StorageError> {
        self.insert_history_entry(pet_key, &entry).await
    }

    async fn history(&self, pet_key: &str) -> Result<Vec<HistoryEntry>, StorageError> {
        self.list_history(pet_key).await
    }
}
