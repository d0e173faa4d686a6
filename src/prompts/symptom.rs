//! Symptom analysis prompt.

use std::fmt::Write as _;

use super::markers::SectionSet;
use super::{gender_label, section_instructions, Language};
use crate::severity::SeverityVerdict;
use crate::traits::PetProfile;

const SECTION_BULLETS: &[&[&str]] = &[
    &["Confirm or adjust the severity level (low, moderate, high or emergency) on the first line"],
    &["Specific immediate care steps"],
    &["What to watch for and how often"],
    &["When and why to seek professional care"],
    &["How to prevent similar issues"],
    &["Warning signs that require immediate emergency care"],
];

/// Build the prompt for analysing owner-reported symptoms.
///
/// The classifier verdict is embedded with its level, confidence, urgency
/// and a severity context sentence.
#[must_use]
pub fn symptom_analysis_prompt(
    symptoms: &str,
    profile: Option<&PetProfile>,
    verdict: &SeverityVerdict,
    language: Language,
) -> String {
    let mut prompt = format!(
        "You are an expert veterinary advisor AI. {}.\n\n",
        language.instruction()
    );

    if let Some(pet) = profile {
        let _ = write!(
            prompt,
            "**Pet Information:**\n\
             - Name: {}\n\
             - Breed: {}\n\
             - Age: {} years old\n\
             - Gender: {}\n\n",
            pet.name,
            pet.breed,
            pet.age,
            gender_label(pet.gender, language),
        );
    }

    let _ = write!(
        prompt,
        "**Reported Symptoms:** \"{symptoms}\"\n\
         \n\
         **Initial Analysis Results:**\n\
         - Severity Level: {level}\n\
         - Confidence: {confidence}%\n\
         - Urgency: {urgency}\n\
         \n\
         {context}\n\
         \n\
         **Answer with these sections:**\n\
         \n\
         {sections}\n\
         **Response Requirements:**\n\
         - Include specific timeframes (e.g. \"within 2 hours\", \"monitor for 24-48 hours\")\n\
         - Mention breed/age-specific considerations when relevant\n\
         - Provide actionable, practical advice\n\
         - Use a caring, professional tone\n\
         - Include a disclaimer that this does not replace veterinary care\n",
        level = verdict.level.as_str().to_uppercase(),
        confidence = verdict.confidence_percent(),
        urgency = verdict.urgency,
        context = verdict.level.prompt_context(),
        sections = section_instructions(SectionSet::SymptomAnalysis, SECTION_BULLETS),
    );

    if let Some(pet) = profile {
        let _ = writeln!(
            prompt,
            "\nThis is a {}-year-old {}; consider breed-specific risks and age-related vulnerabilities.",
            pet.age, pet.breed
        );
    }

    prompt
}
