//! Response parser.
//!
//! Turns raw model text into a [`ParsedResult`]: one string per expected
//! section plus derived fields. Parsing never fails; sections the model
//! left out are empty strings.
//!
//! # Example
//!
//! ```
//! use petcare_advisor::parser::parse;
//! use petcare_advisor::prompts::SectionSet;
//!
//! let parsed = parse("💡 POSSIBLE CAUSES\nPollen allergy", SectionSet::QuickCheck, None);
//! assert_eq!(parsed.section("causes"), "Pollen allergy");
//! assert_eq!(parsed.section("home_care"), "");
//! ```

mod derived;
mod sections;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use derived::{
    extract_action_items, leading_severity, priority_of, stated_severity, ActionItem,
    DerivedFields, Priority,
};
pub use sections::extract_sections;

use crate::backends::{BackendKind, Generation};
use crate::prompts::markers::{SectionMarker, SectionSet};
use crate::severity::SeverityVerdict;

/// Key of the health report section that holds action items.
const ACTIONS_KEY: &str = "actions";

/// Key of the symptom analysis section that opens with the level.
const ASSESSMENT_KEY: &str = "assessment";

/// Sections and derived fields of one model answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedContent {
    /// Section key to trimmed section text; every key of the set is present.
    pub sections: BTreeMap<String, String>,
    /// Derived fields.
    pub derived: DerivedFields,
}

impl ParsedContent {
    /// Text of a section, or `""` if the key is unknown or the section is empty.
    #[must_use]
    pub fn section(&self, key: &str) -> &str {
        self.sections.get(key).map_or("", String::as_str)
    }
}

/// Parse raw model text for the given section set.
///
/// For health reports the action items section is split into prioritised
/// items. For symptom analyses the leading lines are scanned for a stated
/// severity, falling back to a level opening the assessment section. It is
/// kept only when it differs from `verdict` (or when no verdict is given).
#[must_use]
pub fn parse(raw: &str, set: SectionSet, verdict: Option<&SeverityVerdict>) -> ParsedContent {
    let sections = extract_sections(raw, set);
    let mut derived = DerivedFields::default();

    match set {
        SectionSet::HealthReport => {
            if let Some(actions) = sections.get(ACTIONS_KEY) {
                derived.action_items = extract_action_items(actions);
            }
        }
        SectionSet::SymptomAnalysis => {
            derived.ai_adjusted_severity = stated_severity(raw)
                .or_else(|| {
                    sections
                        .get(ASSESSMENT_KEY)
                        .map(String::as_str)
                        .and_then(leading_severity)
                })
                .filter(|stated| verdict.is_none_or(|v| v.level != *stated));
        }
        SectionSet::QuickCheck => {}
    }

    ParsedContent { sections, derived }
}

/// A parsed answer together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResult {
    /// Raw model text.
    pub full_text: String,
    /// Which section set was parsed.
    pub kind: SectionSet,
    /// Section key to text.
    pub sections: BTreeMap<String, String>,
    /// Derived fields.
    pub derived: DerivedFields,
    /// Backend that served the request.
    pub source: BackendKind,
    /// Model that produced the text.
    pub model_id: String,
    /// When the result was parsed.
    pub generated_at: DateTime<Utc>,
}

impl ParsedResult {
    /// Parse a backend generation, stamped with `generated_at`.
    #[must_use]
    pub fn from_generation(
        generation: Generation,
        kind: SectionSet,
        verdict: Option<&SeverityVerdict>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let ParsedContent { sections, derived } = parse(&generation.text, kind, verdict);
        Self {
            full_text: generation.text,
            kind,
            sections,
            derived,
            source: generation.source,
            model_id: generation.model_id,
            generated_at,
        }
    }

    /// Text of a section, or `""` if the key is unknown or the section is empty.
    #[must_use]
    pub fn section(&self, key: &str) -> &str {
        self.sections.get(key).map_or("", String::as_str)
    }

    /// Sections in protocol order, paired with their markers.
    pub fn ordered_sections(&self) -> impl Iterator<Item = (&'static SectionMarker, &str)> + '_ {
        self.kind
            .markers()
            .iter()
            .map(move |marker| (marker, self.section(marker.key)))
    }

    /// True if no expected section was found.
    #[must_use]
    pub fn is_unstructured(&self) -> bool {
        self.sections.values().all(String::is_empty)
    }
}
