//! Fixed keyword tables used by the classifier.
//!
//! All entries are lowercase and matched as substrings of the lowercased
//! symptom text, except [`SEPARATOR_WORDS`] which match whole words.

/// Symptoms that put the verdict straight to emergency.
pub const EMERGENCY_KEYWORDS: &[&str] = &[
    "bleeding",
    "blood",
    "unconscious",
    "seizure",
    "choking",
    "difficulty breathing",
    "pale gums",
    "blue tongue",
    "collapse",
    "severe pain",
    "toxin",
    "poison",
    "trauma",
    "hit by car",
    "broken bone",
    "paralysis",
    "bloating",
    "vomiting blood",
];

/// Symptoms that warrant at least a moderate verdict.
pub const MODERATE_KEYWORDS: &[&str] = &[
    "vomiting",
    "diarrhea",
    "limping",
    "coughing",
    "sneezing",
    "lethargy",
    "loss of appetite",
    "excessive drinking",
    "frequent urination",
    "scratching",
    "shaking head",
    "discharge",
    "swelling",
];

/// Onset words that signal an emergency.
pub const EMERGENCY_TIME_WORDS: &[&str] =
    &["suddenly", "sudden", "immediately", "right now", "minutes ago"];

/// Onset words that signal an urgent but non-emergency course.
pub const URGENT_TIME_WORDS: &[&str] = &["hours", "since yesterday", "getting worse", "progressive"];

/// Time words that make a description more specific (confidence bonus).
pub const CONFIDENCE_TIME_WORDS: &[&str] = &["today", "yesterday", "hours", "minutes", "days"];

/// Words that join several symptoms in one description.
pub const SEPARATOR_WORDS: &[&str] = &["and", "also", "plus", "additionally"];

/// Token count above which a description is assumed to list several symptoms.
pub const MULTI_SYMPTOM_TOKEN_THRESHOLD: usize = 10;

/// Breed name fragments and the symptom words that are risky for them.
///
/// The first breed whose name is a substring of the lowercased breed wins.
pub const BREED_RISKS: &[(&str, &[&str])] = &[
    ("golden retriever", &["hip", "joint", "cancer", "heart"]),
    ("german shepherd", &["hip dysplasia", "bloat", "back"]),
    ("bulldog", &["breathing", "respiratory", "heat"]),
    ("dachshund", &["back", "spine", "disc"]),
    ("labrador", &["obesity", "hip", "eye"]),
    ("poodle", &["hip", "eye", "epilepsy"]),
    ("beagle", &["ear", "obesity", "back"]),
    ("chihuahua", &["heart", "trachea", "dental"]),
];

/// Risk words for a breed, or an empty slice for unknown breeds.
#[must_use]
pub fn breed_risks(breed: &str) -> &'static [&'static str] {
    let breed = breed.to_lowercase();
    BREED_RISKS
        .iter()
        .find(|(name, _)| breed.contains(name))
        .map(|(_, risks)| *risks)
        .unwrap_or_default()
}

/// True if any entry of `words` occurs in `text`.
#[must_use]
pub fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}
