//! Severity levels and verdicts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity tier, ordered from least to most urgent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    /// Routine care.
    #[default]
    Low,
    /// Vet visit recommended.
    Moderate,
    /// Contact a vet within 24 hours.
    High,
    /// Seek immediate veterinary care.
    Emergency,
}

impl SeverityLevel {
    /// Returns the level name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Emergency => "emergency",
        }
    }

    /// The next level up, saturating at [`SeverityLevel::Emergency`].
    #[must_use]
    pub const fn escalated(self) -> Self {
        match self {
            Self::Low => Self::Moderate,
            Self::Moderate => Self::High,
            Self::High | Self::Emergency => Self::Emergency,
        }
    }

    /// Canned urgency line for this level.
    #[must_use]
    pub const fn urgency(&self) -> &'static str {
        match self {
            Self::Emergency => "Seek immediate veterinary care",
            Self::High => "Contact veterinarian within 24 hours",
            Self::Moderate => "Monitor closely, vet visit recommended",
            Self::Low => "Continue monitoring, routine care",
        }
    }

    /// Canned recommendations for this level, in display order.
    #[must_use]
    pub const fn recommendations(&self) -> &'static [&'static str] {
        match self {
            Self::Emergency => &[
                "Call emergency vet immediately",
                "Keep pet calm and quiet",
                "Do not give food or water",
                "Prepare for immediate transport",
            ],
            Self::High => &[
                "Schedule vet appointment today",
                "Monitor symptoms closely",
                "Keep pet comfortable",
                "Note any changes",
            ],
            Self::Moderate => &[
                "Schedule vet visit within few days",
                "Monitor eating and drinking",
                "Ensure pet is comfortable",
                "Document symptom progression",
            ],
            Self::Low => &[
                "Continue normal routine",
                "Monitor for changes",
                "Ensure good nutrition",
                "Regular exercise as tolerated",
            ],
        }
    }

    /// Sentence placed in symptom-analysis prompts to frame the level.
    #[must_use]
    pub const fn prompt_context(&self) -> &'static str {
        match self {
            Self::Emergency => {
                "The initial screening flagged signs of a possible emergency; prioritise immediate, life-saving steps."
            }
            Self::High => {
                "The initial screening suggests a serious problem that needs a vet within 24 hours."
            }
            Self::Moderate => {
                "The initial screening suggests a moderate concern that should be monitored and checked by a vet soon."
            }
            Self::Low => {
                "The initial screening suggests a mild concern that can usually be managed with home care and monitoring."
            }
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeverityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "moderate" | "medium" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            "emergency" => Ok(Self::Emergency),
            other => Err(format!("unknown severity level: {other}")),
        }
    }
}

/// Classifier output for one symptom submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityVerdict {
    /// Final level after profile escalation.
    pub level: SeverityLevel,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Human-readable urgency line.
    pub urgency: String,
    /// Ordered recommendations.
    pub recommendations: Vec<String>,
}

impl SeverityVerdict {
    /// Build a verdict with the canned urgency and recommendations of `level`.
    #[must_use]
    pub fn for_level(level: SeverityLevel, confidence: f64) -> Self {
        Self {
            level,
            confidence: confidence.clamp(0.0, 1.0),
            urgency: level.urgency().to_string(),
            recommendations: level
                .recommendations()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Confidence as a whole percentage.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence * 100.0).round() as u8
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(SeverityLevel::Low < SeverityLevel::Moderate);
        assert!(SeverityLevel::Moderate < SeverityLevel::High);
        assert!(SeverityLevel::High < SeverityLevel::Emergency);
    }

    #[test]
    fn test_escalated_one_step() {
        assert_eq!(SeverityLevel::Low.escalated(), SeverityLevel::Moderate);
        assert_eq!(SeverityLevel::Moderate.escalated(), SeverityLevel::High);
        assert_eq!(SeverityLevel::Emergency.escalated(), SeverityLevel::Emergency);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("HIGH".parse::<SeverityLevel>().unwrap(), SeverityLevel::High);
        assert_eq!("medium".parse::<SeverityLevel>().unwrap(), SeverityLevel::Moderate);
        assert!("severe".parse::<SeverityLevel>().is_err());
    }

    #[test]
    fn test_each_level_has_four_recommendations() {
        for level in [
            SeverityLevel::Low,
            SeverityLevel::Moderate,
            SeverityLevel::High,
            SeverityLevel::Emergency,
        ] {
            assert_eq!(level.recommendations().len(), 4);
            assert!(!level.urgency().is_empty());
        }
    }

    #[test]
    fn test_for_level_clamps_confidence() {
        let verdict = SeverityVerdict::for_level(SeverityLevel::Low, 1.7);
        assert!((verdict.confidence - 1.0).abs() < f64::EPSILON);
        assert_eq!(verdict.confidence_percent(), 100);
        assert_eq!(verdict.urgency, "Continue monitoring, routine care");
    }
}
