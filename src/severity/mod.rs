//! Symptom severity classifier.
//!
//! A pure, total function from free-text symptoms (and an optional pet
//! profile) to a [`SeverityVerdict`]. No I/O, no hidden state: the same
//! input always yields the same verdict.
//!
//! # Algorithm
//!
//! 1. Lowercase the text and look for emergency / moderate keywords and
//!    onset ("time") words.
//! 2. Resolve the base level, most severe first.
//! 3. Escalate by at most one step for puppies/seniors or breed-specific
//!    risk words. Escalation never lowers a level.
//! 4. Score confidence and attach the canned urgency and recommendations.
//!
//! # Example
//!
//! ```
//! use petcare_advisor::severity::{assess, SeverityLevel};
//!
//! let verdict = assess("My dog collapsed and is bleeding from the mouth", None);
//! assert_eq!(verdict.level, SeverityLevel::Emergency);
//! ```

pub mod keywords;
mod types;

pub use types::{SeverityLevel, SeverityVerdict};

use crate::traits::PetProfile;
use keywords::{
    breed_risks, contains_any, CONFIDENCE_TIME_WORDS, EMERGENCY_KEYWORDS, EMERGENCY_TIME_WORDS,
    MODERATE_KEYWORDS, MULTI_SYMPTOM_TOKEN_THRESHOLD, SEPARATOR_WORDS, URGENT_TIME_WORDS,
};

/// Base confidence before any bonus.
const BASE_CONFIDENCE: f64 = 0.5;

/// Keyword hits found in one symptom description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Signals {
    emergency_keyword: bool,
    moderate_keyword: bool,
    emergency_time: bool,
    urgent_time: bool,
    multiple_symptoms: bool,
}

impl Signals {
    fn scan(text: &str) -> Self {
        Self {
            emergency_keyword: contains_any(text, EMERGENCY_KEYWORDS),
            moderate_keyword: contains_any(text, MODERATE_KEYWORDS),
            emergency_time: contains_any(text, EMERGENCY_TIME_WORDS),
            urgent_time: contains_any(text, URGENT_TIME_WORDS),
            multiple_symptoms: has_multiple_symptoms(text),
        }
    }

    const fn base_level(&self) -> SeverityLevel {
        if self.emergency_keyword || self.emergency_time {
            SeverityLevel::Emergency
        } else if self.moderate_keyword || self.urgent_time || self.multiple_symptoms {
            SeverityLevel::Moderate
        } else {
            SeverityLevel::Low
        }
    }
}

/// Assess the severity of a symptom description.
///
/// Never fails and never blocks. A profile can only raise the level.
#[must_use]
pub fn assess(symptoms: &str, profile: Option<&PetProfile>) -> SeverityVerdict {
    let text = symptoms.to_lowercase();
    let signals = Signals::scan(&text);

    let base = signals.base_level();
    let level = profile.map_or(base, |p| adjust_for_profile(base, p, &text));

    let confidence = confidence(&text, &signals);

    SeverityVerdict::for_level(level, confidence)
}

/// Raise `level` by one step at most when the profile makes the symptoms riskier.
///
/// - Puppies (< 1 year) and seniors (> 10 years) lift `low` to `moderate`.
/// - Breed-specific risk words lift `low` or `moderate` one step.
///
/// `high` and `emergency` are never changed.
fn adjust_for_profile(level: SeverityLevel, profile: &PetProfile, text: &str) -> SeverityLevel {
    let vulnerable_age = profile
        .age_years()
        .is_some_and(|age| age < 1.0 || age > 10.0);
    let breed_risk = contains_any(text, breed_risks(&profile.breed));

    let escalate = match level {
        SeverityLevel::Low => vulnerable_age || breed_risk,
        SeverityLevel::Moderate => breed_risk,
        SeverityLevel::High | SeverityLevel::Emergency => false,
    };

    if escalate {
        tracing::debug!(
            from = %level,
            to = %level.escalated(),
            vulnerable_age,
            breed_risk,
            "Escalating severity for pet profile"
        );
        level.escalated()
    } else {
        level
    }
}

/// Detect descriptions that list more than one symptom.
fn has_multiple_symptoms(text: &str) -> bool {
    if text.contains(',') {
        return true;
    }
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() > MULTI_SYMPTOM_TOKEN_THRESHOLD {
        return true;
    }
    tokens.iter().any(|token| {
        let word = token.trim_matches(|c: char| !c.is_alphanumeric());
        SEPARATOR_WORDS.contains(&word)
    })
}

fn confidence(text: &str, signals: &Signals) -> f64 {
    let length = text.chars().count();
    let mut score = BASE_CONFIDENCE;

    if length > 50 {
        score += 0.2;
    }
    if length > 100 {
        score += 0.1;
    }
    if signals.emergency_keyword {
        score += 0.3;
    }
    if signals.moderate_keyword {
        score += 0.2;
    }
    if contains_any(text, CONFIDENCE_TIME_WORDS) {
        score += 0.1;
    }

    score.clamp(0.0, 1.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::traits::Gender;
    use proptest::prelude::*;
    use test_case::test_case;

    fn profile(breed: &str, age: &str) -> PetProfile {
        PetProfile::new("pet-1", "Buddy", breed, age, Gender::Male)
    }

    #[test]
    fn test_bleeding_and_unconscious_is_emergency() {
        let verdict = assess(
            "My dog is bleeding heavily and unconscious on the kitchen floor",
            None,
        );
        assert_eq!(verdict.level, SeverityLevel::Emergency);
        assert!(verdict.confidence >= 0.8);
        assert_eq!(verdict.urgency, "Seek immediate veterinary care");
        assert_eq!(verdict.recommendations[0], "Call emergency vet immediately");
    }

    #[test]
    fn test_itchy_paw_adult_mixed_is_low() {
        let verdict = assess("slightly itchy paw", Some(&profile("Mixed", "3")));
        assert_eq!(verdict.level, SeverityLevel::Low);
        assert!((verdict.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_golden_retriever_hip_pain_escalates_moderate_to_high() {
        let text = "limping with hip pain";
        assert_eq!(assess(text, None).level, SeverityLevel::Moderate);
        let verdict = assess(text, Some(&profile("Golden Retriever", "5")));
        assert_eq!(verdict.level, SeverityLevel::High);
        assert_eq!(verdict.urgency, "Contact veterinarian within 24 hours");
    }

    #[test_case("0.5" ; "puppy")]
    #[test_case("12" ; "senior")]
    fn test_vulnerable_age_lifts_low(age: &str) {
        let verdict = assess("itchy ear", Some(&profile("Mixed", age)));
        assert_eq!(verdict.level, SeverityLevel::Moderate);
    }

    #[test]
    fn test_vulnerable_age_does_not_lift_moderate() {
        let verdict = assess("mild coughing", Some(&profile("Mixed", "14")));
        assert_eq!(verdict.level, SeverityLevel::Moderate);
    }

    #[test]
    fn test_age_and_breed_together_raise_only_one_step() {
        let verdict = assess("sore ear", Some(&profile("Beagle", "12")));
        assert_eq!(verdict.level, SeverityLevel::Moderate);
    }

    #[test]
    fn test_unparseable_age_is_ignored() {
        let verdict = assess("itchy ear", Some(&profile("Mixed", "unknown")));
        assert_eq!(verdict.level, SeverityLevel::Low);
    }

    #[test_case("started suddenly" ; "sudden onset")]
    #[test_case("it happened minutes ago" ; "minutes ago")]
    fn test_emergency_time_words(text: &str) {
        assert_eq!(assess(text, None).level, SeverityLevel::Emergency);
    }

    #[test_case("itchy for hours" ; "hours")]
    #[test_case("it is getting worse" ; "getting worse")]
    fn test_urgent_time_words(text: &str) {
        assert_eq!(assess(text, None).level, SeverityLevel::Moderate);
    }

    #[test_case("itchy paw, dry nose" ; "comma")]
    #[test_case("itchy paw and dry nose" ; "and")]
    #[test_case("itchy paw also dry nose" ; "also")]
    #[test_case("one two three four five six seven eight nine ten eleven" ; "long text")]
    fn test_multiple_symptoms_are_moderate(text: &str) {
        assert_eq!(assess(text, None).level, SeverityLevel::Moderate);
    }

    #[test]
    fn test_separator_inside_word_is_not_a_separator() {
        assert_eq!(assess("sandy paw", None).level, SeverityLevel::Low);
        assert_eq!(assess("i know its itchy", None).level, SeverityLevel::Low);
    }

    #[test]
    fn test_case_insensitive_keywords() {
        assert_eq!(assess("SEIZURE", None).level, SeverityLevel::Emergency);
    }

    #[test]
    fn test_confidence_bonuses_accumulate_and_clamp() {
        let text = format!(
            "vomiting blood since yesterday, {}",
            "and she will not eat anything at all ".repeat(3)
        );
        let verdict = assess(&text, None);
        // 0.5 + 0.2 + 0.1 + 0.3 + 0.2 + 0.1 = 1.4 -> 1.0
        assert!((verdict.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_is_low() {
        let verdict = assess("", None);
        assert_eq!(verdict.level, SeverityLevel::Low);
        assert!((verdict.confidence - 0.5).abs() < 1e-9);
    }

    fn arb_profile() -> impl Strategy<Value = PetProfile> {
        (
            prop::sample::select(vec![
                "Golden Retriever",
                "German Shepherd",
                "Bulldog",
                "Dachshund",
                "Mixed",
                "",
            ]),
            prop::sample::select(vec!["0", "0.5", "3", "10", "11", "15", "n/a"]),
        )
            .prop_map(|(breed, age)| profile(breed, age))
    }

    proptest! {
        #[test]
        fn prop_confidence_in_unit_interval(text in ".{0,400}") {
            let verdict = assess(&text, None);
            prop_assert!((0.0..=1.0).contains(&verdict.confidence));
        }

        #[test]
        fn prop_emergency_keyword_dominates(
            prefix in "[a-z ]{0,40}",
            keyword in prop::sample::select(EMERGENCY_KEYWORDS.to_vec()),
            suffix in "[a-z ]{0,40}",
            p in prop::option::of(arb_profile()),
        ) {
            let text = format!("{prefix} {keyword} {suffix}");
            prop_assert_eq!(assess(&text, p.as_ref()).level, SeverityLevel::Emergency);
        }

        #[test]
        fn prop_profile_never_lowers_level(text in "[a-z ,]{0,120}", p in arb_profile()) {
            let without = assess(&text, None).level;
            let with = assess(&text, Some(&p)).level;
            prop_assert!(with >= without);
            prop_assert!(with <= without.escalated());
        }

        #[test]
        fn prop_assess_is_idempotent(text in ".{0,200}", p in prop::option::of(arb_profile())) {
            prop_assert_eq!(assess(&text, p.as_ref()), assess(&text, p.as_ref()));
        }
    }
}
