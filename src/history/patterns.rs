//! Recurring-symptom detection over a pet's history.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::HistoryEntry;

/// Number of most recent entries searched for repeated symptoms.
pub const PATTERN_WINDOW: usize = 5;

/// Length of the rolling frequency window in days.
pub const RECENT_DAYS: i64 = 30;

/// More recent entries than this triggers the checkup suggestion.
const CHECKUP_THRESHOLD: usize = 3;

/// Tokens this short or shorter are ignored.
const MIN_TOKEN_CHARS: usize = 3;

/// A token seen in more than one recent entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonSymptom {
    /// Lowercased token.
    pub symptom: String,
    /// Number of recent entries mentioning it.
    pub frequency: usize,
}

/// Entry counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SymptomFrequency {
    /// All entries in the log.
    pub total: usize,
    /// Entries in the last [`RECENT_DAYS`] days.
    pub recent: usize,
}

/// Canned advice derived from the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternSuggestion {
    /// Fewer than two entries.
    NotEnoughHistory,
    /// Many entries in the recent window.
    ComprehensiveCheckup,
    /// A symptom keeps recurring.
    ChronicCondition {
        /// The most frequent recurring token.
        symptom: String,
    },
    /// Nothing stands out.
    NoConcerns,
}

impl PatternSuggestion {
    /// Text shown to the owner.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::NotEnoughHistory => "Not enough history to analyze patterns".to_string(),
            Self::ComprehensiveCheckup => "Your pet has had several health concerns recently. \
                Consider scheduling a comprehensive vet checkup to identify any underlying issues."
                .to_string(),
            Self::ChronicCondition { symptom } => format!(
                "\"{symptom}\" appears frequently in your reports. This might indicate a chronic \
                 condition that needs veterinary attention."
            ),
            Self::NoConcerns => {
                "No concerning patterns detected in recent symptom reports.".to_string()
            }
        }
    }
}

/// Result of [`analyze_patterns`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternAnalysis {
    /// True if any symptom recurs in the recent window.
    pub has_patterns: bool,
    /// Recurring tokens, most frequent first.
    pub common_symptoms: Vec<CommonSymptom>,
    /// Entry counts.
    pub frequency: SymptomFrequency,
    /// Advice for the owner.
    pub suggestion: PatternSuggestion,
}

/// Analyze a most-recent-first history as of `now`.
#[must_use]
pub fn analyze_patterns(history: &[HistoryEntry], now: DateTime<Utc>) -> PatternAnalysis {
    let frequency = frequency(history, now);

    if history.len() < 2 {
        return PatternAnalysis {
            has_patterns: false,
            common_symptoms: Vec::new(),
            frequency,
            suggestion: PatternSuggestion::NotEnoughHistory,
        };
    }

    let common_symptoms = common_symptoms(&history[..history.len().min(PATTERN_WINDOW)]);

    let suggestion = if frequency.recent > CHECKUP_THRESHOLD {
        PatternSuggestion::ComprehensiveCheckup
    } else if let Some(top) = common_symptoms.first() {
        PatternSuggestion::ChronicCondition {
            symptom: top.symptom.clone(),
        }
    } else {
        PatternSuggestion::NoConcerns
    };

    PatternAnalysis {
        has_patterns: !common_symptoms.is_empty(),
        common_symptoms,
        frequency,
        suggestion,
    }
}

fn tokens(text: &str) -> BTreeSet<String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .map(|token| token.trim_matches(|c: char| c.is_ascii_punctuation()))
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
        .map(str::to_lowercase)
        .collect()
}

fn common_symptoms(window: &[HistoryEntry]) -> Vec<CommonSymptom> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for entry in window {
        for token in tokens(&entry.symptom_text) {
            *counts.entry(token).or_default() += 1;
        }
    }

    let mut common: Vec<CommonSymptom> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(symptom, frequency)| CommonSymptom { symptom, frequency })
        .collect();
    common.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.symptom.cmp(&b.symptom))
    });
    common
}

fn frequency(history: &[HistoryEntry], now: DateTime<Utc>) -> SymptomFrequency {
    let cutoff = now - Duration::days(RECENT_DAYS);
    SymptomFrequency {
        total: history.len(),
        recent: history.iter().filter(|e| e.timestamp > cutoff).count(),
    }
}
