//! Ordered-marker section scanner.

use std::collections::BTreeMap;

use crate::prompts::markers::{strip_variation_selectors, SectionMarker, SectionSet};

/// Where a marker was found.
#[derive(Debug, Clone, Copy)]
struct Hit {
    marker_index: usize,
    line_index: usize,
}

/// Extract every section of `set` from raw model text.
///
/// A marker line must contain both the marker emoji (variation selectors
/// ignored) and its heading (ASCII case-insensitive). Each section runs from
/// the line after its marker to the earliest later marker that is present,
/// or to the end of the text. Text following the heading on the marker line
/// itself is kept as the first line of the section.
///
/// Every key of `set` is present in the result; missing sections map to `""`.
#[must_use]
pub fn extract_sections(raw: &str, set: SectionSet) -> BTreeMap<String, String> {
    let lines: Vec<&str> = raw.lines().collect();
    let markers = set.markers();

    let mut hits: Vec<Hit> = markers
        .iter()
        .enumerate()
        .filter_map(|(marker_index, marker)| {
            find_marker_line(&lines, marker).map(|line_index| Hit {
                marker_index,
                line_index,
            })
        })
        .collect();
    hits.sort_by_key(|hit| hit.line_index);

    let mut sections: BTreeMap<String, String> =
        set.keys().map(|key| (key.to_string(), String::new())).collect();

    for (position, hit) in hits.iter().enumerate() {
        let end = hits
            .get(position + 1)
            .map_or(lines.len(), |next| next.line_index);
        let marker = &markers[hit.marker_index];

        let mut body: Vec<&str> = Vec::new();
        if let Some(rest) = trailing_text(lines[hit.line_index], marker) {
            body.push(rest);
        }
        // Two markers on one line leave the first with only its trailing text.
        let first = (hit.line_index + 1).min(end);
        body.extend_from_slice(&lines[first..end]);

        sections.insert(marker.key.to_string(), body.join("\n").trim().to_string());
    }

    sections
}

/// Index of the first line carrying `marker`, if any.
fn find_marker_line(lines: &[&str], marker: &SectionMarker) -> Option<usize> {
    let emoji = marker.bare_emoji();
    lines.iter().position(|line| {
        strip_variation_selectors(line).contains(&emoji)
            && line.to_ascii_uppercase().contains(marker.heading)
    })
}

/// Content written after the heading on the marker line itself.
fn trailing_text<'a>(line: &'a str, marker: &SectionMarker) -> Option<&'a str> {
    let upper = line.to_ascii_uppercase();
    let start = upper.find(marker.heading)? + marker.heading.len();
    let rest = line[start..]
        .trim_start_matches(|c: char| matches!(c, '*' | '#' | ':' | '-' | '_') || c.is_whitespace())
        .trim_end();
    (!rest.is_empty()).then_some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REPORT: &str = "Here is the report for Luna.

🏥 **HEALTH OVERVIEW**
Luna is a healthy adult.

🍽️ **NUTRITION RECOMMENDATIONS**
- High quality kibble

🏃 **EXERCISE & ACTIVITY**
- Two walks a day

🩺 **PREVENTIVE CARE SCHEDULE**
- Annual vaccines

⚠️ **HEALTH MONITORING**
- Watch for limping

📅 **ACTION ITEMS**
- Book a dental cleaning this month
- Buy a new harness";

    #[test]
    fn test_all_sections_extracted() {
        let sections = extract_sections(REPORT, SectionSet::HealthReport);
        assert_eq!(sections["overview"], "Luna is a healthy adult.");
        assert_eq!(sections["nutrition"], "- High quality kibble");
        assert_eq!(sections["exercise"], "- Two walks a day");
        assert_eq!(sections["preventive"], "- Annual vaccines");
        assert_eq!(sections["monitoring"], "- Watch for limping");
        assert_eq!(
            sections["actions"],
            "- Book a dental cleaning this month\n- Buy a new harness"
        );
    }

    #[test]
    fn test_missing_middle_section_does_not_swallow_the_rest() {
        let raw = "🏥 HEALTH OVERVIEW\nfine\n🏃 EXERCISE & ACTIVITY\nwalks\n📅 ACTION ITEMS\n- vet";
        let sections = extract_sections(raw, SectionSet::HealthReport);
        assert_eq!(sections["overview"], "fine");
        assert_eq!(sections["nutrition"], "");
        assert_eq!(sections["exercise"], "walks");
        assert_eq!(sections["actions"], "- vet");
    }

    #[test]
    fn test_emoji_without_variation_selector_matches() {
        let raw = "\u{26a0} HEALTH MONITORING\nwatch the eyes";
        let sections = extract_sections(raw, SectionSet::HealthReport);
        assert_eq!(sections["monitoring"], "watch the eyes");
    }

    #[test]
    fn test_heading_case_insensitive_and_trailing_text_kept() {
        let raw = "## 💡 Possible Causes: allergies or a cold\n- pollen\n🏠 Home Care\nrest";
        let sections = extract_sections(raw, SectionSet::QuickCheck);
        assert_eq!(sections["causes"], "allergies or a cold\n- pollen");
        assert_eq!(sections["home_care"], "rest");
        assert_eq!(sections["see_vet"], "");
    }

    #[test]
    fn test_heading_without_emoji_is_not_a_marker() {
        let raw = "HEALTH OVERVIEW\nnothing";
        let sections = extract_sections(raw, SectionSet::HealthReport);
        assert!(sections.values().all(String::is_empty));
    }

    #[test]
    fn test_out_of_order_sections() {
        let raw = "🏃 EXERCISE & ACTIVITY\nrun\n🏥 HEALTH OVERVIEW\ngood";
        let sections = extract_sections(raw, SectionSet::HealthReport);
        assert_eq!(sections["exercise"], "run");
        assert_eq!(sections["overview"], "good");
    }

    #[test]
    fn test_empty_input_yields_all_keys() {
        let sections = extract_sections("", SectionSet::SymptomAnalysis);
        assert_eq!(sections.len(), SectionSet::SymptomAnalysis.markers().len());
        assert!(sections.values().all(String::is_empty));
    }
}
