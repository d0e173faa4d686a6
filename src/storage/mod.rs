//! Storage backend.
//!
//! This module provides:
//! - `SQLite` database implementation
//! - Pet profile CRUD and the current-pet selection
//! - Saved health reports (10 most recent per pet)
//! - Symptom history (20 most recent per pet)
//!
//! # Architecture
//!
//! The storage layer uses `SQLite` with the `sqlx` crate for async operations.
//! Multi-statement writes run in a transaction.
//!
//! The implementation is split across submodules:
//! - `core`: Pool management, migrations, and helper functions
//! - `pets`: Pet CRUD and selection
//! - `reports`: Health report operations
//! - `history`: Symptom history operations
//! - `trait_impl`: `PetStore` / `HistoryStore` implementations
//!
//! # Example
//!
//! ```ignore
//! use petcare_advisor::storage::SqliteStorage;
//! use petcare_advisor::traits::{Gender, NewPet, PetStore};
//!
//! let storage = SqliteStorage::new("./data/petcare.db").await?;
//! let pet = storage.add_pet(NewPet::new("Rex", "Beagle", "3", Gender::Male)).await?;
//! ```

mod core;
mod history;
mod pets;
mod reports;
mod trait_impl;
mod types;

pub use self::core::SqliteStorage;
pub use types::{HealthReport, NewHealthReport, StoreStats, REPORT_CAP};
