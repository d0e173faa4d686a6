//! Prompt templates.
//!
//! This module builds the prompts sent to the generation backends, one
//! builder per use case:
//! - `health_report`: structured health report for a pet profile
//! - `symptom`: analysis of owner-reported symptoms, framed by the classifier verdict
//! - `quick_check`: short triage without a profile or verdict
//!
//! Every builder is a pure function and never fails. Unknown language codes
//! fall back to English.
//!
//! The section headings the model must emit are defined once in
//! [`markers`] and shared with the response parser.
//!
//! # Example
//!
//! ```
//! use petcare_advisor::prompts::{health_report_prompt, Language, ReportType};
//! use petcare_advisor::traits::{Gender, PetProfile};
//!
//! let pet = PetProfile::new("p1", "Luna", "Beagle", "4", Gender::Female);
//! let prompt = health_report_prompt(&pet, Language::En, ReportType::Basic);
//! assert!(prompt.contains("HEALTH OVERVIEW"));
//! assert!(prompt.contains("Luna"));
//! ```

mod health_report;
pub mod markers;
mod quick_check;
mod symptom;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use health_report::health_report_prompt;
pub use markers::{SectionMarker, SectionSet, MARKER_PROTOCOL_VERSION};
pub use quick_check::quick_check_prompt;
pub use symptom::symptom_analysis_prompt;

use crate::traits::Gender;

/// Target language for model answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Spanish.
    Es,
    /// Chinese.
    Zh,
}

impl Language {
    /// Map a language code to a language; unknown codes become English.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_lowercase();
        match code.split(['-', '_']).next().unwrap_or_default() {
            "es" => Self::Es,
            "zh" => Self::Zh,
            _ => Self::En,
        }
    }

    /// The two-letter code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Zh => "zh",
        }
    }

    /// English name of the language, used inside prompts.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Spanish",
            Self::Zh => "Chinese",
        }
    }

    /// Instruction telling the model which language to answer in.
    #[must_use]
    pub const fn instruction(&self) -> &'static str {
        match self {
            Self::En => "Respond in English",
            Self::Es => "Responde en español",
            Self::Zh => "Please respond in Chinese",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Translated gender label.
#[must_use]
pub const fn gender_label(gender: Gender, language: Language) -> &'static str {
    match (language, gender) {
        (Language::En, Gender::Male) => "Male",
        (Language::En, Gender::Female) => "Female",
        (Language::En, Gender::Unknown) => "Unknown",
        (Language::Es, Gender::Male) => "Macho",
        (Language::Es, Gender::Female) => "Hembra",
        (Language::Es, Gender::Unknown) => "Desconocido",
        (Language::Zh, Gender::Male) => "雄性",
        (Language::Zh, Gender::Female) => "雌性",
        (Language::Zh, Gender::Unknown) => "未知",
    }
}

/// Health report depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// Essentials only.
    Basic,
    /// Standard report.
    #[default]
    Comprehensive,
    /// Expanded explanations.
    Detailed,
    /// Urgent concerns first.
    Emergency,
}

impl ReportType {
    /// Returns the report type name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Comprehensive => "comprehensive",
            Self::Detailed => "detailed",
            Self::Emergency => "emergency",
        }
    }

    /// Extra instruction appended to the health report prompt.
    #[must_use]
    pub const fn note(&self) -> Option<&'static str> {
        match self {
            Self::Basic => Some(
                "**Note:** Provide a concise, essential-only report focusing on immediate needs.",
            ),
            Self::Detailed => Some(
                "**Note:** Include detailed explanations, additional tips, and comprehensive guidance.",
            ),
            Self::Emergency => Some(
                "**Note:** Focus on urgent health concerns and immediate action items for this specific pet.",
            ),
            Self::Comprehensive => None,
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "comprehensive" => Ok(Self::Comprehensive),
            "detailed" => Ok(Self::Detailed),
            "emergency" => Ok(Self::Emergency),
            other => Err(format!(
                "unknown report type '{other}' (expected basic, comprehensive, detailed or emergency)"
            )),
        }
    }
}

/// Render the heading block and the "keep headings verbatim" rule for a section set.
pub(crate) fn section_instructions(set: SectionSet, bullets: &[&[&str]]) -> String {
    let mut out = String::new();
    for (index, marker) in set.markers().iter().enumerate() {
        out.push_str(&marker.render());
        out.push('\n');
        for bullet in bullets.get(index).copied().unwrap_or_default() {
            out.push_str("- ");
            out.push_str(bullet);
            out.push('\n');
        }
        out.push('\n');
    }
    out.push_str(
        "Start each section with its heading line exactly as written above, \
         emoji included and in English, even when answering in another language. \
         Keep the sections in this order.\n",
    );
    out
}
