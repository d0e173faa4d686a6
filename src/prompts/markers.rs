//! Section-marker protocol shared by the prompt builder and the response parser.
//!
//! Every structured prompt asks the model to open each section with a line
//! carrying an emoji and an uppercase heading, e.g. `🏥 **HEALTH OVERVIEW**`.
//! The parser locates sections by looking for lines that contain both parts
//! of a marker. Changing any table here changes the wire contract with the
//! model, so bump [`MARKER_PROTOCOL_VERSION`] when you do.

use serde::{Deserialize, Serialize};

/// Version of the marker tables below.
pub const MARKER_PROTOCOL_VERSION: u32 = 1;

/// Variation selector some emoji carry; ignored when matching.
pub(crate) const VARIATION_SELECTOR: char = '\u{fe0f}';

/// One section marker: key, emoji and heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMarker {
    /// Key of the section in parsed output.
    pub key: &'static str,
    /// Emoji that opens the section line.
    pub emoji: &'static str,
    /// Uppercase heading that follows the emoji.
    pub heading: &'static str,
}

impl SectionMarker {
    const fn new(key: &'static str, emoji: &'static str, heading: &'static str) -> Self {
        Self {
            key,
            emoji,
            heading,
        }
    }

    /// The line as the model is asked to write it.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{} **{}**", self.emoji, self.heading)
    }

    /// The emoji without variation selectors.
    #[must_use]
    pub fn bare_emoji(&self) -> String {
        strip_variation_selectors(self.emoji)
    }
}

/// Which structured output a prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionSet {
    /// Pet health report.
    HealthReport,
    /// Symptom analysis.
    SymptomAnalysis,
    /// Quick check.
    QuickCheck,
}

impl SectionSet {
    /// Markers of this set, in the order the model must emit them.
    #[must_use]
    pub const fn markers(&self) -> &'static [SectionMarker] {
        match self {
            Self::HealthReport => HEALTH_REPORT_SECTIONS,
            Self::SymptomAnalysis => SYMPTOM_SECTIONS,
            Self::QuickCheck => QUICK_CHECK_SECTIONS,
        }
    }

    /// Section keys of this set, in order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        self.markers().iter().map(|m| m.key)
    }
}

/// Health report sections.
pub const HEALTH_REPORT_SECTIONS: &[SectionMarker] = &[
    SectionMarker::new("overview", "🏥", "HEALTH OVERVIEW"),
    SectionMarker::new("nutrition", "🍽️", "NUTRITION RECOMMENDATIONS"),
    SectionMarker::new("exercise", "🏃", "EXERCISE & ACTIVITY"),
    SectionMarker::new("preventive", "🩺", "PREVENTIVE CARE SCHEDULE"),
    SectionMarker::new("monitoring", "⚠️", "HEALTH MONITORING"),
    SectionMarker::new("actions", "📅", "ACTION ITEMS"),
];

/// Symptom analysis sections.
pub const SYMPTOM_SECTIONS: &[SectionMarker] = &[
    SectionMarker::new("assessment", "📋", "SEVERITY ASSESSMENT"),
    SectionMarker::new("immediate_actions", "🚨", "IMMEDIATE ACTIONS"),
    SectionMarker::new("monitoring", "👀", "MONITORING GUIDANCE"),
    SectionMarker::new("vet_recommendations", "🏥", "VET RECOMMENDATIONS"),
    SectionMarker::new("prevention", "🛡️", "PREVENTION TIPS"),
    SectionMarker::new("red_flags", "🚩", "RED FLAGS"),
];

/// Quick check sections.
pub const QUICK_CHECK_SECTIONS: &[SectionMarker] = &[
    SectionMarker::new("causes", "💡", "POSSIBLE CAUSES"),
    SectionMarker::new("home_care", "🏠", "HOME CARE"),
    SectionMarker::new("see_vet", "🩺", "WHEN TO SEE A VET"),
];

/// Remove U+FE0F so `⚠️` and `⚠` compare equal.
#[must_use]
pub fn strip_variation_selectors(text: &str) -> String {
    text.chars().filter(|c| *c != VARIATION_SELECTOR).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_unique_within_each_set() {
        for set in [
            SectionSet::HealthReport,
            SectionSet::SymptomAnalysis,
            SectionSet::QuickCheck,
        ] {
            let keys: HashSet<_> = set.keys().collect();
            assert_eq!(keys.len(), set.markers().len());
        }
    }

    #[test]
    fn test_headings_are_uppercase() {
        for marker in HEALTH_REPORT_SECTIONS
            .iter()
            .chain(SYMPTOM_SECTIONS)
            .chain(QUICK_CHECK_SECTIONS)
        {
            assert_eq!(marker.heading, marker.heading.to_uppercase());
        }
    }

    #[test]
    fn test_render() {
        assert_eq!(HEALTH_REPORT_SECTIONS[0].render(), "🏥 **HEALTH OVERVIEW**");
    }

    #[test]
    fn test_bare_emoji_strips_selector() {
        let warning = HEALTH_REPORT_SECTIONS[4];
        assert_eq!(warning.bare_emoji(), "⚠");
        assert!(!warning.bare_emoji().contains(VARIATION_SELECTOR));
    }
}
