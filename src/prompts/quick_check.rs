//! Quick check prompt.

use super::markers::SectionSet;
use super::{section_instructions, Language};

const SECTION_BULLETS: &[&[&str]] = &[
    &["The two or three most likely causes"],
    &["Safe steps the owner can take at home"],
    &["Signs that mean the pet needs a vet, and how soon"],
];

/// Build a short triage prompt with no profile or verdict.
#[must_use]
pub fn quick_check_prompt(symptoms: &str, language: Language) -> String {
    format!(
        "You are a veterinary assistant. {instruction}. Keep the answer brief.\n\
         \n\
         **Symptoms:** \"{symptoms}\"\n\
         \n\
         {sections}\n\
         Remind the owner that this is not a substitute for a veterinary examination.\n",
        instruction = language.instruction(),
        sections = section_instructions(SectionSet::QuickCheck, SECTION_BULLETS),
    )
}
