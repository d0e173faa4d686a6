//! End-to-end advisor flows.
//!
//! Each flow runs classifier, prompt builder, backend and parser in order,
//! then records the outcome:
//!
//! | Flow | Sections | Options | Persisted |
//! |---|---|---|---|
//! | [`Advisor::check_symptoms`] | symptom analysis | fast | history entry |
//! | [`Advisor::generate_health_report`] | health report | report | saved report |
//! | [`Advisor::quick_check`] | quick check | fast | nothing |
//!
//! A cancelled flow records nothing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::backends::{GenerationRequest, ModelOptions};
use crate::error::AdvisorError;
use crate::history::{analyze_patterns, pet_key, HistoryEntry, PatternAnalysis};
use crate::metrics::Timer;
use crate::parser::ParsedResult;
use crate::prompts::{
    health_report_prompt, quick_check_prompt, symptom_analysis_prompt, Language, ReportType,
    SectionSet,
};
use crate::severity::{assess, SeverityVerdict};
use crate::traits::{
    GenerationBackend, HistoryStore, NewHealthReport, PetProfile, PetStore, RealTimeProvider,
    TimeProvider,
};

/// Outcome of a symptom check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomReport {
    /// Classifier verdict.
    pub verdict: SeverityVerdict,
    /// Parsed model answer.
    pub parsed: ParsedResult,
}

/// Composes the advisor pipeline over injected stores and a generation backend.
pub struct Advisor<S, H>
where
    S: PetStore,
    H: HistoryStore,
{
    backend: Arc<dyn GenerationBackend>,
    pets: S,
    history: H,
    clock: Arc<dyn TimeProvider>,
}

impl<S, H> Advisor<S, H>
where
    S: PetStore,
    H: HistoryStore,
{
    /// Create an advisor.
    #[must_use]
    pub fn new(backend: Arc<dyn GenerationBackend>, pets: S, history: H) -> Self {
        Self {
            backend,
            pets,
            history,
            clock: Arc::new(RealTimeProvider),
        }
    }

    /// Use a custom clock for history timestamps and pattern windows.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn TimeProvider>) -> Self {
        self.clock = clock;
        self
    }

    /// The pet store.
    #[must_use]
    pub const fn pets(&self) -> &S {
        &self.pets
    }

    /// The history store.
    #[must_use]
    pub const fn history(&self) -> &H {
        &self.history
    }

    /// Assess symptoms and ask the model for an analysis.
    ///
    /// On success the check is appended to the pet's history. A failure to
    /// record history is logged and does not fail the check.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::EmptySymptoms`] for blank input (before any
    /// I/O), or [`AdvisorError::Generation`] if generation failed or was
    /// cancelled.
    pub async fn check_symptoms(
        &self,
        symptoms: &str,
        profile: Option<&PetProfile>,
        language: Language,
        cancel: CancellationToken,
    ) -> Result<SymptomReport, AdvisorError> {
        let symptoms = symptoms.trim();
        if symptoms.is_empty() {
            return Err(AdvisorError::EmptySymptoms);
        }

        let verdict = assess(symptoms, profile);
        tracing::info!(
            level = %verdict.level,
            confidence = verdict.confidence,
            "Assessed symptoms"
        );

        let request = GenerationRequest::new(symptom_analysis_prompt(
            symptoms, profile, &verdict, language,
        ))
        .with_options(ModelOptions::fast())
        .with_cancel(cancel);

        let timer = Timer::start();
        let generation = self.backend.generate(&request).await?;
        let now = self.clock.now();
        let parsed = ParsedResult::from_generation(
            generation,
            SectionSet::SymptomAnalysis,
            Some(&verdict),
            now,
        );

        tracing::info!(
            source = %parsed.source,
            model = %parsed.model_id,
            elapsed_ms = timer.elapsed_ms(),
            ai_adjusted = ?parsed.derived.ai_adjusted_severity,
            "Symptom analysis complete"
        );

        let entry = HistoryEntry::new(
            symptoms,
            verdict.clone(),
            parsed.full_text.clone(),
            profile,
            now,
        );
        if let Err(e) = self.history.append(&pet_key(profile), entry).await {
            tracing::warn!(error = %e, "Failed to record symptom history");
        }

        Ok(SymptomReport { verdict, parsed })
    }

    /// Generate and save a health report for `pet`.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::Generation`] if generation failed or was
    /// cancelled, or [`AdvisorError::Storage`] if the report could not be saved.
    pub async fn generate_health_report(
        &self,
        pet: &PetProfile,
        report_type: ReportType,
        language: Language,
        cancel: CancellationToken,
    ) -> Result<ParsedResult, AdvisorError> {
        let request = GenerationRequest::new(health_report_prompt(pet, language, report_type))
            .with_options(ModelOptions::report())
            .with_cancel(cancel);

        let timer = Timer::start();
        let generation = self.backend.generate(&request).await?;
        let parsed = ParsedResult::from_generation(
            generation,
            SectionSet::HealthReport,
            None,
            self.clock.now(),
        );

        let saved = self
            .pets
            .save_health_report(&pet.id, NewHealthReport::from_parsed(&parsed, report_type))
            .await?;

        tracing::info!(
            pet_id = %pet.id,
            report_id = %saved.id,
            report_type = %report_type,
            source = %parsed.source,
            elapsed_ms = timer.elapsed_ms(),
            action_items = parsed.derived.action_items.len(),
            "Health report generated"
        );

        Ok(parsed)
    }

    /// Generate a health report for the current pet.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::NoPetProfile`] if no pet is selected, otherwise
    /// as [`Advisor::generate_health_report`].
    pub async fn generate_current_report(
        &self,
        report_type: ReportType,
        language: Language,
        cancel: CancellationToken,
    ) -> Result<ParsedResult, AdvisorError> {
        let pet = self
            .pets
            .get_current_pet()
            .await?
            .ok_or(AdvisorError::NoPetProfile)?;
        self.generate_health_report(&pet, report_type, language, cancel)
            .await
    }

    /// Short answer for a quick question; nothing is recorded.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::EmptySymptoms`] for blank input, or
    /// [`AdvisorError::Generation`] if generation failed or was cancelled.
    pub async fn quick_check(
        &self,
        symptoms: &str,
        language: Language,
        cancel: CancellationToken,
    ) -> Result<ParsedResult, AdvisorError> {
        let symptoms = symptoms.trim();
        if symptoms.is_empty() {
            return Err(AdvisorError::EmptySymptoms);
        }

        let request = GenerationRequest::new(quick_check_prompt(symptoms, language))
            .with_options(ModelOptions::fast())
            .with_cancel(cancel);

        let generation = self.backend.generate(&request).await?;
        Ok(ParsedResult::from_generation(
            generation,
            SectionSet::QuickCheck,
            None,
            self.clock.now(),
        ))
    }

    /// Recurring-symptom analysis for a pet's history.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::Storage`] if the history cannot be read.
    pub async fn patterns(&self, pet_key: &str) -> Result<PatternAnalysis, AdvisorError> {
        let history = self.history.history(pet_key).await?;
        Ok(analyze_patterns(&history, self.clock.now()))
    }
}

impl<S, H> std::fmt::Debug for Advisor<S, H>
where
    S: PetStore,
    H: HistoryStore,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Advisor").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::backends::{BackendKind, Generation};
    use crate::error::{GenerationError, StorageError};
    use crate::history::{MemoryHistoryStore, PatternSuggestion};
    use crate::prompts::ReportType;
    use crate::severity::SeverityLevel;
    use crate::test_utils::{
        fixed_time, mock_backend_error, mock_backend_success, mock_time, sample_pet,
    };
    use crate::traits::{HealthReport, MockGenerationBackend, MockHistoryStore, MockPetStore};

    const SYMPTOM_ANSWER: &str = "📋 **SEVERITY ASSESSMENT**\nSeverity level: high\n\
        🚨 **IMMEDIATE ACTIONS**\nKeep your dog calm\n\
        🚩 **RED FLAGS**\nPale gums";

    const REPORT_ANSWER: &str = "🏥 **HEALTH OVERVIEW**\nHealthy adult beagle\n\
        📅 **ACTION ITEMS**\n- Schedule a dental cleaning this month\n- Call the vet immediately if limping returns";

    #[tokio::test]
    async fn test_check_symptoms_records_history() {
        let advisor = Advisor::new(
            mock_backend_success(SYMPTOM_ANSWER, BackendKind::Local),
            MockPetStore::new(),
            MemoryHistoryStore::new(),
        );

        let report = advisor
            .check_symptoms(
                "limping and hip pain since yesterday",
                Some(&sample_pet()),
                Language::En,
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(report.verdict.level, SeverityLevel::High);
        assert_eq!(report.parsed.source, BackendKind::Local);
        assert_eq!(report.parsed.section("immediate_actions"), "Keep your dog calm");
        assert_eq!(report.parsed.section("prevention"), "");
        assert_eq!(report.parsed.derived.ai_adjusted_severity, None);

        let history = advisor.history().history("pet-1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].symptom_text, "limping and hip pain since yesterday");
        assert_eq!(history[0].verdict.level, SeverityLevel::High);
        assert_eq!(history[0].pet_snapshot.as_ref().unwrap().name, "Rex");
    }

    #[tokio::test]
    async fn test_check_symptoms_prompt_carries_verdict() {
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate()
            .withf(|request| {
                request.prompt.contains(SeverityLevel::Emergency.prompt_context())
                    && request.options == ModelOptions::fast()
                    && request.prompt.contains("Rex")
            })
            .times(1)
            .returning(|_| {
                Ok(Generation {
                    text: "ok".into(),
                    source: BackendKind::Cloud,
                    model_id: "m".into(),
                })
            });

        let advisor = Advisor::new(Arc::new(backend), MockPetStore::new(), MemoryHistoryStore::new());
        let report = advisor
            .check_symptoms(
                "my dog collapsed",
                Some(&sample_pet()),
                Language::En,
                CancellationToken::new(),
            )
            .await
            .unwrap();
        assert!(report.parsed.is_unstructured());
    }

    #[tokio::test]
    async fn test_empty_symptoms_rejected_before_io() {
        let mut backend = MockGenerationBackend::new();
        backend.expect_generate().never();
        let mut history = MockHistoryStore::new();
        history.expect_append().never();

        let advisor = Advisor::new(Arc::new(backend), MockPetStore::new(), history);
        let err = advisor
            .check_symptoms("   ", None, Language::En, CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err, AdvisorError::EmptySymptoms);
    }

    #[tokio::test]
    async fn test_cancelled_check_records_nothing() {
        let mut history = MockHistoryStore::new();
        history.expect_append().never();

        let advisor = Advisor::new(
            mock_backend_error(GenerationError::Cancelled),
            MockPetStore::new(),
            history,
        );
        let err = advisor
            .check_symptoms("coughing", None, Language::En, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(err.user_message(), "Request cancelled.");
    }

    #[tokio::test]
    async fn test_failed_check_surfaces_status() {
        let advisor = Advisor::new(
            mock_backend_error(GenerationError::Failed {
                backend: BackendKind::Cloud,
                status: Some(429),
                message: "Quota exceeded".into(),
            }),
            MockPetStore::new(),
            MemoryHistoryStore::new(),
        );
        let err = advisor
            .check_symptoms("coughing", None, Language::En, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.user_message().contains("429 - Quota exceeded"));
    }

    #[tokio::test]
    async fn test_history_failure_does_not_fail_check() {
        let mut history = MockHistoryStore::new();
        history.expect_append().returning(|_, _| {
            Err(StorageError::ConnectionFailed {
                message: "disk full".into(),
            })
        });

        let advisor = Advisor::new(
            mock_backend_success(SYMPTOM_ANSWER, BackendKind::Local),
            MockPetStore::new(),
            history,
        );
        assert!(advisor
            .check_symptoms("sneezing", None, Language::En, CancellationToken::new())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_health_report_saved_with_source() {
        let mut pets = MockPetStore::new();
        pets.expect_save_health_report()
            .withf(|pet_id, report| {
                pet_id == "pet-1"
                    && report.source == BackendKind::Cloud
                    && report.report_type == ReportType::Detailed
                    && report.generated_at == fixed_time()
            })
            .times(1)
            .returning(|pet_id, report| {
                Ok(HealthReport {
                    id: "r-1".into(),
                    pet_id: pet_id.to_string(),
                    report_type: report.report_type,
                    content: report.content,
                    source: report.source,
                    model_id: report.model_id,
                    generated_at: report.generated_at,
                })
            });

        let advisor = Advisor::new(
            mock_backend_success(REPORT_ANSWER, BackendKind::Cloud),
            pets,
            MemoryHistoryStore::new(),
        )
        .with_clock(Arc::new(mock_time(fixed_time())));
        let parsed = advisor
            .generate_health_report(
                &sample_pet(),
                ReportType::Detailed,
                Language::En,
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(parsed.section("overview"), "Healthy adult beagle");
        assert_eq!(parsed.derived.action_items.len(), 2);
        assert_eq!(parsed.generated_at, fixed_time());
    }

    #[tokio::test]
    async fn test_health_report_uses_report_options() {
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate()
            .withf(|request| request.options == ModelOptions::report())
            .returning(|_| Err(GenerationError::Cancelled));
        let mut pets = MockPetStore::new();
        pets.expect_save_health_report().never();

        let advisor = Advisor::new(Arc::new(backend), pets, MemoryHistoryStore::new());
        let err = advisor
            .generate_health_report(
                &sample_pet(),
                ReportType::Basic,
                Language::Es,
                CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_current_report_without_pet() {
        let mut pets = MockPetStore::new();
        pets.expect_get_current_pet().returning(|| Ok(None));

        let advisor = Advisor::new(
            mock_backend_success(REPORT_ANSWER, BackendKind::Local),
            pets,
            MemoryHistoryStore::new(),
        );
        let err = advisor
            .generate_current_report(ReportType::default(), Language::En, CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err, AdvisorError::NoPetProfile);
    }

    #[tokio::test]
    async fn test_quick_check_records_nothing() {
        let mut history = MockHistoryStore::new();
        history.expect_append().never();

        let advisor = Advisor::new(
            mock_backend_success("💡 POSSIBLE CAUSES\nPollen\n🏠 HOME CARE\nWipe paws", BackendKind::Local),
            MockPetStore::new(),
            history,
        );
        let parsed = advisor
            .quick_check("itchy paws", Language::En, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(parsed.section("causes"), "Pollen");
        assert_eq!(parsed.section("home_care"), "Wipe paws");
        assert_eq!(parsed.section("see_vet"), "");
    }

    #[tokio::test]
    async fn test_patterns_use_clock() {
        let advisor = Advisor::new(
            mock_backend_success(SYMPTOM_ANSWER, BackendKind::Local),
            MockPetStore::new(),
            MemoryHistoryStore::new(),
        )
        .with_clock(Arc::new(mock_time(fixed_time())));

        for text in ["vomiting after dinner", "vomiting again"] {
            advisor
                .check_symptoms(text, None, Language::En, CancellationToken::new())
                .await
                .unwrap();
        }

        let history = advisor.history().history("unknown").await.unwrap();
        assert!(history.iter().all(|entry| entry.timestamp == fixed_time()));

        let analysis = advisor.patterns("unknown").await.unwrap();
        assert!(analysis.has_patterns);
        assert_eq!(
            analysis.suggestion,
            PatternSuggestion::ChronicCondition {
                symptom: "vomiting".into()
            }
        );
        assert_eq!(analysis.frequency.recent, 2);
    }
}
