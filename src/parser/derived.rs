//! Fields derived from parsed sections: action items and AI-adjusted severity.

use serde::{Deserialize, Serialize};

use crate::severity::SeverityLevel;

/// Words that make an action item high priority.
const HIGH_PRIORITY_WORDS: &[&str] = &["immediate", "urgent", "emergency", "asap", "now"];

/// Words that make an action item medium priority.
const MEDIUM_PRIORITY_WORDS: &[&str] = &["soon", "week", "month", "schedule"];

/// How many leading lines are scanned for a severity statement.
const SEVERITY_SCAN_LINES: usize = 5;

/// How many leading words of an assessment line may carry a bare level.
const LEADING_LEVEL_WORDS: usize = 3;

/// Level words, most severe first.
const SEVERITY_WORDS: &[(SeverityLevel, &[&str])] = &[
    (SeverityLevel::Emergency, &["emergency", "critical"]),
    (SeverityLevel::High, &["high", "severe", "serious"]),
    (SeverityLevel::Moderate, &["moderate", "medium"]),
    (SeverityLevel::Low, &["low", "mild", "minor"]),
];

/// Action item priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Schedule it.
    Medium,
    /// Do it now.
    High,
}

/// One line of the action items section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    /// Item text with list bullets removed.
    pub text: String,
    /// Derived priority.
    pub priority: Priority,
    /// Completion flag; always false when parsed.
    pub completed: bool,
}

/// Fields computed from the raw text beyond plain sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFields {
    /// Action items (health reports only).
    pub action_items: Vec<ActionItem>,
    /// Severity stated by the model when it differs from the classifier.
    ///
    /// Advisory only; the classifier verdict is never overwritten.
    pub ai_adjusted_severity: Option<SeverityLevel>,
}

/// Split an action items section into individual items.
#[must_use]
pub fn extract_action_items(section: &str) -> Vec<ActionItem> {
    section
        .lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .map(|text| ActionItem {
            text: text.to_string(),
            priority: priority_of(text),
            completed: false,
        })
        .collect()
}

/// Priority of one action line.
///
/// A keyword matches when a word of the line starts with it, so
/// "immediately" and "weekly" count but "know" does not.
#[must_use]
pub fn priority_of(item: &str) -> Priority {
    let words = words(item);
    let has = |keywords: &[&str]| {
        words
            .iter()
            .any(|word| keywords.iter().any(|k| word.starts_with(k)))
    };

    if has(HIGH_PRIORITY_WORDS) {
        Priority::High
    } else if has(MEDIUM_PRIORITY_WORDS) {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Severity stated in the first lines of a symptom analysis.
///
/// Only lines mentioning "severity" or "level" are considered; the most
/// severe level word on the first such line wins.
#[must_use]
pub fn stated_severity(raw: &str) -> Option<SeverityLevel> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .take(SEVERITY_SCAN_LINES)
        .filter_map(|line| {
            let words = words(line);
            let mentions_severity = words
                .iter()
                .any(|w| w.starts_with("severity") || *w == "level");
            if !mentions_severity {
                return None;
            }
            most_severe(&words)
        })
        .next()
}

/// Level opening the first non-empty line of an assessment section.
///
/// Catches answers like `EMERGENCY - go now` or `**High**` that state the
/// level without naming it a severity.
#[must_use]
pub fn leading_severity(assessment: &str) -> Option<SeverityLevel> {
    let line = assessment.lines().find(|line| !line.trim().is_empty())?;
    let words = words(line);
    most_severe(&words[..words.len().min(LEADING_LEVEL_WORDS)])
}

fn most_severe(words: &[String]) -> Option<SeverityLevel> {
    SEVERITY_WORDS
        .iter()
        .find(|(_, terms)| words.iter().any(|w| terms.contains(&w.as_str())))
        .map(|(level, _)| *level)
}

fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    let line = line
        .strip_prefix("- [ ]")
        .or_else(|| line.strip_prefix("- [x]"))
        .unwrap_or(line);
    let line = line.trim_start_matches(['-', '*', '•', '+']).trim_start();
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        if let Some(rest) = line[digits..]
            .strip_prefix('.')
            .or_else(|| line[digits..].strip_prefix(')'))
        {
            return rest.trim();
        }
    }
    line.trim()
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}
