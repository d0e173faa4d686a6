//! Shared types for the traits module.
//!
//! This module defines the pet data model shared across the crate:
//! - [`PetProfile`]: A stored pet
//! - [`NewPet`]: Fields supplied when adding or updating a pet
//! - [`Gender`]: Pet gender

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Pet gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Unknown or not provided.
    #[default]
    Unknown,
}

impl Gender {
    /// Returns the gender name as stored.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = std::convert::Infallible;

    /// Lenient parse: anything but male/female is [`Gender::Unknown`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "male" | "m" => Self::Male,
            "female" | "f" => Self::Female,
            _ => Self::Unknown,
        })
    }
}

/// A stored pet profile.
///
/// `age` keeps whatever the owner typed ("3", "0.5", "2 years"); use
/// [`PetProfile::age_years`] for the numeric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetProfile {
    /// Unique pet identifier.
    pub id: String,
    /// Pet name.
    pub name: String,
    /// Breed as entered.
    pub breed: String,
    /// Age in years, as entered.
    #[serde(deserialize_with = "deserialize_age")]
    pub age: String,
    /// Gender.
    pub gender: Gender,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl PetProfile {
    /// Create a profile with fresh timestamps.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        breed: impl Into<String>,
        age: impl Into<String>,
        gender: Gender,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            breed: breed.into(),
            age: age.into(),
            gender,
            created_at: now,
            updated_at: now,
        }
    }

    /// Numeric age in years, if the stored age starts with a number.
    ///
    /// Accepts fractional values ("0.5") and trailing units ("2 years").
    #[must_use]
    pub fn age_years(&self) -> Option<f64> {
        parse_age(&self.age)
    }
}

/// Fields supplied when adding or updating a pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPet {
    /// Pet name.
    pub name: String,
    /// Breed.
    pub breed: String,
    /// Age in years, as entered.
    pub age: String,
    /// Gender.
    pub gender: Gender,
}

impl NewPet {
    /// Create new pet fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        breed: impl Into<String>,
        age: impl Into<String>,
        gender: Gender,
    ) -> Self {
        Self {
            name: name.into(),
            breed: breed.into(),
            age: age.into(),
            gender,
        }
    }
}

/// Parse the leading number of an age string.
#[must_use]
pub fn parse_age(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let end = trimmed
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map_or(trimmed.len(), |(i, _)| i);
    trimmed[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn deserialize_age<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AgeRepr {
        Number(f64),
        Text(String),
    }

    Ok(match AgeRepr::deserialize(deserializer)? {
        AgeRepr::Number(n) => n.to_string(),
        AgeRepr::Text(s) => s,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gender_from_str_lenient() {
        assert_eq!("Male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!(" female ".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("other".parse::<Gender>().unwrap(), Gender::Unknown);
    }

    #[test]
    fn test_gender_serde_lowercase() {
        assert_eq!(serde_json::to_value(Gender::Female).unwrap(), json!("female"));
    }

    #[test]
    fn test_parse_age_variants() {
        assert_eq!(parse_age("3"), Some(3.0));
        assert_eq!(parse_age("0.5"), Some(0.5));
        assert_eq!(parse_age("12 years"), Some(12.0));
        assert_eq!(parse_age("puppy"), None);
        assert_eq!(parse_age(""), None);
    }

    #[test]
    fn test_profile_accepts_numeric_age() {
        let value = json!({
            "id": "p1",
            "name": "Rex",
            "breed": "Beagle",
            "age": 4.5,
            "gender": "male",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        });
        let profile: PetProfile = serde_json::from_value(value).unwrap();
        assert_eq!(profile.age, "4.5");
        assert_eq!(profile.age_years(), Some(4.5));
    }

    #[test]
    fn test_profile_accepts_string_age() {
        let value = json!({
            "id": "p1",
            "name": "Rex",
            "breed": "Beagle",
            "age": "11",
            "gender": "unknown",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        });
        let profile: PetProfile = serde_json::from_value(value).unwrap();
        assert_eq!(profile.age_years(), Some(11.0));
        assert_eq!(profile.gender, Gender::Unknown);
    }
}
