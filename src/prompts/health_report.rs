//! Health report prompt.

use super::markers::SectionSet;
use super::{gender_label, section_instructions, Language, ReportType};
use crate::traits::PetProfile;

const SECTION_BULLETS: &[&[&str]] = &[
    &[
        "Current health status assessment",
        "Age-appropriate health considerations",
        "Breed-specific health profile",
    ],
    &[
        "Age and breed-specific dietary needs",
        "Portion size recommendations",
        "Special nutritional considerations",
    ],
    &[
        "Daily exercise requirements",
        "Age-appropriate activities",
        "Breed-specific exercise needs",
    ],
    &[
        "Vaccination schedule",
        "Regular checkup frequency",
        "Dental care recommendations",
        "Parasite prevention",
    ],
    &[
        "Warning signs to watch for",
        "Breed-specific health risks",
        "Gender-specific health considerations",
        "Emergency signs requiring immediate vet attention",
    ],
    &[
        "One action per line",
        "Immediate actions needed",
        "Upcoming care requirements",
        "Long-term health goals",
    ],
];

/// Build the prompt for a health report.
///
/// Profile fields are embedded verbatim; the gender label is translated.
/// The report type may append one extra instruction line.
#[must_use]
pub fn health_report_prompt(
    profile: &PetProfile,
    language: Language,
    report_type: ReportType,
) -> String {
    let mut prompt = format!(
        "You are a professional veterinary health advisor. \
         Generate a comprehensive health report for the following pet:\n\
         \n\
         **Pet Information:**\n\
         - Name: {name}\n\
         - Breed: {breed}\n\
         - Age: {age}\n\
         - Gender: {gender}\n\
         \n\
         **Report Requirements:**\n\
         {instruction}. Please provide a well-structured health report in {language} \
         with the following sections:\n\
         \n\
         {sections}\n\
         **Important:**\n\
         - Keep recommendations practical and actionable\n\
         - Include specific timeframes where relevant\n\
         - Maintain a friendly but professional tone\n\
         - Focus on preventive care and early detection\n",
        name = profile.name,
        breed = profile.breed,
        age = profile.age,
        gender = gender_label(profile.gender, language),
        instruction = language.instruction(),
        language = language.name(),
        sections = section_instructions(SectionSet::HealthReport, SECTION_BULLETS),
    );

    if let Some(note) = report_type.note() {
        prompt.push('\n');
        prompt.push_str(note);
        prompt.push('\n');
    }

    prompt
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::prompts::markers::HEALTH_REPORT_SECTIONS;
    use crate::traits::Gender;

    fn luna() -> PetProfile {
        PetProfile::new("p1", "Luna", "Border Collie", "0.5", Gender::Female)
    }

    #[test]
    fn test_embeds_profile_verbatim() {
        let prompt = health_report_prompt(&luna(), Language::En, ReportType::Comprehensive);
        assert!(prompt.contains("- Name: Luna"));
        assert!(prompt.contains("- Breed: Border Collie"));
        assert!(prompt.contains("- Age: 0.5"));
        assert!(prompt.contains("- Gender: Female"));
    }

    #[test]
    fn test_requests_every_section_in_order() {
        let prompt = health_report_prompt(&luna(), Language::En, ReportType::Comprehensive);
        let mut last = 0;
        for marker in HEALTH_REPORT_SECTIONS {
            let at = prompt.find(&marker.render()).unwrap();
            assert!(at >= last);
            last = at;
        }
    }

    #[test]
    fn test_spanish_prompt() {
        let prompt = health_report_prompt(&luna(), Language::Es, ReportType::Comprehensive);
        assert!(prompt.contains("Responde en español"));
        assert!(prompt.contains("in Spanish"));
        assert!(prompt.contains("- Gender: Hembra"));
    }

    #[test]
    fn test_comprehensive_adds_no_note() {
        let prompt = health_report_prompt(&luna(), Language::En, ReportType::Comprehensive);
        assert!(!prompt.contains("**Note:**"));
    }

    #[test]
    fn test_report_type_note_is_appended_last() {
        let prompt = health_report_prompt(&luna(), Language::En, ReportType::Emergency);
        assert!(prompt.trim_end().ends_with("immediate action items for this specific pet."));
    }
}
