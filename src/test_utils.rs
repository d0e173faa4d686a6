//! Test utilities and mock factories.
//!
//! Only compiled for tests (`#[cfg(test)]`).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::backends::{BackendKind, Generation};
use crate::error::GenerationError;
use crate::traits::{Gender, GenerationBackend, MockGenerationBackend, MockTimeProvider, PetProfile};

/// Model id reported by mock backends.
pub const TEST_MODEL: &str = "test-model";

/// A backend that answers every request with `text`.
///
/// # Example
///
/// ```ignore
/// let backend = mock_backend_success("🏥 **HEALTH OVERVIEW**\nFit", BackendKind::Local);
/// let generation = backend.generate(&GenerationRequest::new("prompt")).await?;
/// assert_eq!(generation.source, BackendKind::Local);
/// ```
#[must_use]
pub fn mock_backend_success(
    text: impl Into<String>,
    source: BackendKind,
) -> Arc<dyn GenerationBackend> {
    let text = text.into();
    let mut mock = MockGenerationBackend::new();
    mock.expect_generate().returning(move |_| {
        Ok(Generation {
            text: text.clone(),
            source,
            model_id: TEST_MODEL.to_string(),
        })
    });
    Arc::new(mock)
}

/// A backend that fails every request with `error`.
#[must_use]
pub fn mock_backend_error(error: GenerationError) -> Arc<dyn GenerationBackend> {
    let mut mock = MockGenerationBackend::new();
    mock.expect_generate()
        .returning(move |_| Err(error.clone()));
    Arc::new(mock)
}

/// A clock frozen at `now`.
#[must_use]
pub fn mock_time(now: DateTime<Utc>) -> MockTimeProvider {
    let mut mock = MockTimeProvider::new();
    mock.expect_now().return_const(now);
    mock
}

/// A fixed instant for deterministic tests.
#[must_use]
pub fn fixed_time() -> DateTime<Utc> {
    "2024-06-01T12:00:00Z".parse().unwrap()
}

/// A three-year-old male golden retriever with id `pet-1`.
#[must_use]
pub fn sample_pet() -> PetProfile {
    PetProfile::new("pet-1", "Rex", "Golden Retriever", "3", Gender::Male)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::GenerationRequest;
    use crate::traits::TimeProvider;

    #[tokio::test]
    async fn test_mock_backend_success() {
        let backend = mock_backend_success("hello", BackendKind::Cloud);
        let generation = backend
            .generate(&GenerationRequest::new("prompt"))
            .await
            .unwrap();
        assert_eq!(generation.text, "hello");
        assert_eq!(generation.model_id, TEST_MODEL);
    }

    #[tokio::test]
    async fn test_mock_backend_error() {
        let backend = mock_backend_error(GenerationError::Cancelled);
        let err = backend
            .generate(&GenerationRequest::new("prompt"))
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_mock_time() {
        assert_eq!(mock_time(fixed_time()).now(), fixed_time());
    }
}
