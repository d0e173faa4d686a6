//! Storage types for saved health reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backends::BackendKind;
use crate::parser::{parse, ParsedContent, ParsedResult};
use crate::prompts::{ReportType, SectionSet};

/// Maximum saved reports per pet.
pub const REPORT_CAP: usize = 10;

/// A health report to be saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHealthReport {
    /// Requested report type.
    pub report_type: ReportType,
    /// Full model answer.
    pub content: String,
    /// Backend that served the report.
    pub source: BackendKind,
    /// Model that wrote it.
    pub model_id: String,
    /// Generation time.
    pub generated_at: DateTime<Utc>,
}

impl NewHealthReport {
    /// Build from a parsed generation.
    #[must_use]
    pub fn from_parsed(parsed: &ParsedResult, report_type: ReportType) -> Self {
        Self {
            report_type,
            content: parsed.full_text.clone(),
            source: parsed.source,
            model_id: parsed.model_id.clone(),
            generated_at: parsed.generated_at,
        }
    }
}

/// A saved health report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Report identifier.
    pub id: String,
    /// Owning pet.
    pub pet_id: String,
    /// Requested report type.
    pub report_type: ReportType,
    /// Full model answer.
    pub content: String,
    /// Backend that served the report.
    pub source: BackendKind,
    /// Model that wrote it.
    pub model_id: String,
    /// Generation time.
    pub generated_at: DateTime<Utc>,
}

impl HealthReport {
    /// Re-parse the stored answer into sections and action items.
    #[must_use]
    pub fn parsed(&self) -> ParsedContent {
        parse(&self.content, SectionSet::HealthReport, None)
    }
}

/// Store-wide counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of pets.
    pub total_pets: u64,
    /// Number of saved reports.
    pub total_reports: u64,
    /// Pets with at least one report.
    pub pets_with_reports: u64,
}
