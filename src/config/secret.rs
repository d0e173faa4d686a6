//! Redacted holder for the cloud API key.

use std::fmt;

const REDACTED: &str = "<REDACTED>";

/// Cloud API key that never prints its value.
///
/// ```
/// use petcare_advisor::config::SecretString;
///
/// let key = SecretString::new("AIza-cloud-key-123");
/// assert_eq!(format!("{key:?} {key}"), "<REDACTED> <REDACTED>");
/// assert_eq!(key.expose(), "AIza-cloud-key-123");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Wrap a key.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw key, for the request query string only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}
