//! Pet Care Advisor
//!
//! Symptom severity assessment and health-report generation for pet owners,
//! answered by a local language-model server with an optional cloud fallback.
//!
//! # Features
//!
//! - Deterministic keyword-based severity classifier, adjusted for the pet's
//!   age and breed
//! - Multilingual prompts (English, Spanish, Chinese) built around a fixed
//!   section-marker protocol
//! - Local candidate probing with a sticky endpoint, cancellation, and a
//!   single cloud fallback
//! - Lenient response parsing into named sections and action items
//! - `SQLite` persistence for pets, saved reports and symptom history
//!
//! # Quick Start
//!
//! ```bash
//! LOCAL_LLM_URLS=http://localhost:11434/api ./petcare-advisor check "vomiting since yesterday"
//! ```
//!
//! # Architecture
//!
//! ```text
//! symptoms ──▶ severity ──▶ prompts ──▶ BackendSelector ──▶ parser ──▶ storage
//!                                        │          │
//!                                        ▼          ▼
//!                                   local LLM   cloud API
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod advisor;
pub mod backends;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod metrics;
pub mod parser;
pub mod prompts;
pub mod severity;
pub mod storage;
pub mod traits;

#[cfg(test)]
mod test_utils;
