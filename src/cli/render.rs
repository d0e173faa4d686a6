//! Plain-text rendering of advisor results.

use std::fmt::Write;

use crate::advisor::SymptomReport;
use crate::history::{HistoryEntry, PatternAnalysis};
use crate::parser::{ParsedResult, Priority};
use crate::traits::{PetProfile, StoreStats};

/// Verdict header followed by the model's sections.
#[must_use]
pub fn render_symptom_report(report: &SymptomReport) -> String {
    let verdict = &report.verdict;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Severity: {} (confidence {}%)",
        verdict.level.as_str().to_uppercase(),
        verdict.confidence_percent()
    );
    let _ = writeln!(out, "{}", verdict.urgency);
    for recommendation in &verdict.recommendations {
        let _ = writeln!(out, "- {recommendation}");
    }
    if let Some(level) = report.parsed.derived.ai_adjusted_severity {
        let _ = writeln!(
            out,
            "Note: the AI assessed this as {}",
            level.as_str().to_uppercase()
        );
    }
    out.push('\n');
    out.push_str(&render_parsed(&report.parsed));
    out
}

/// Sections in protocol order, or the raw text when the answer had no markers.
#[must_use]
pub fn render_parsed(parsed: &ParsedResult) -> String {
    let mut out = String::new();

    if parsed.is_unstructured() {
        let _ = writeln!(out, "{}", parsed.full_text.trim());
    } else {
        for (marker, text) in parsed.ordered_sections() {
            if text.is_empty() {
                continue;
            }
            let _ = writeln!(out, "{} {}\n{text}\n", marker.emoji, marker.heading);
        }
    }

    if !parsed.derived.action_items.is_empty() {
        let _ = writeln!(out, "Action items:");
        for item in &parsed.derived.action_items {
            let tag = match item.priority {
                Priority::High => "HIGH",
                Priority::Medium => "MED ",
                Priority::Low => "LOW ",
            };
            let _ = writeln!(out, "  [{tag}] {}", item.text);
        }
        out.push('\n');
    }

    let _ = write!(out, "Source: {} ({})", parsed.source, parsed.model_id);
    out
}

/// Pet list with the current pet starred.
#[must_use]
pub fn render_pets(pets: &[PetProfile], current: Option<&str>, stats: &StoreStats) -> String {
    if pets.is_empty() {
        return "No pets yet. Add one with: add-pet <name> <breed> <age> <gender>".to_string();
    }

    let mut out = String::new();
    for pet in pets {
        let mark = if current == Some(pet.id.as_str()) { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{mark} {} - {}, {} years, {} [{}]",
            pet.name, pet.breed, pet.age, pet.gender, pet.id
        );
    }
    let _ = write!(
        out,
        "{} pets, {} saved reports",
        stats.total_pets, stats.total_reports
    );
    out
}

/// History entries, most recent first, then the pattern summary.
#[must_use]
pub fn render_history(entries: &[HistoryEntry], analysis: &PatternAnalysis) -> String {
    let mut out = String::new();

    if entries.is_empty() {
        out.push_str("No symptom checks recorded yet.\n");
    }
    for entry in entries {
        let _ = writeln!(
            out,
            "{}  {:<9} {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.verdict.level.as_str(),
            entry.symptom_text
        );
    }

    out.push('\n');
    let _ = writeln!(
        out,
        "{} checks in total, {} in the last 30 days",
        analysis.frequency.total, analysis.frequency.recent
    );
    if !analysis.common_symptoms.is_empty() {
        let common: Vec<String> = analysis
            .common_symptoms
            .iter()
            .map(|c| format!("{} ({}x)", c.symptom, c.frequency))
            .collect();
        let _ = writeln!(out, "Recurring: {}", common.join(", "));
    }
    out.push_str(&analysis.suggestion.message());
    out
}
