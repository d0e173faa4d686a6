//! Backend request/response types.
//!
//! Includes both the backend-neutral types used by the selector and the
//! wire formats of the local (Ollama-compatible) and cloud
//! (Gemini-compatible) HTTP APIs.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

// ============================================================================
// Backend-neutral types
// ============================================================================

/// Which backend served (or failed) a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Local inference server on the device or LAN.
    Local,
    /// Hosted cloud API.
    Cloud,
}

impl BackendKind {
    /// Returns the backend name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Cloud => "cloud",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoding options sent with a generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelOptions {
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling threshold.
    pub top_p: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

impl ModelOptions {
    /// Low temperature and a short answer, for symptom checks.
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            temperature: 0.3,
            top_p: 0.8,
            max_tokens: 1000,
        }
    }

    /// Settings for full health reports.
    #[must_use]
    pub const fn report() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: 2000,
        }
    }
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self::fast()
    }
}

/// One generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Complete prompt text.
    pub prompt: String,
    /// Decoding options.
    pub options: ModelOptions,
    /// Cancels the local phase of the request.
    pub cancel: CancellationToken,
}

impl GenerationRequest {
    /// Create a request with default options and a fresh token.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            options: ModelOptions::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Set the decoding options.
    #[must_use]
    pub fn with_options(mut self, options: ModelOptions) -> Self {
        self.options = options;
        self
    }

    /// Use an existing cancellation token.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Text produced by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Generated text.
    pub text: String,
    /// Backend that produced it.
    pub source: BackendKind,
    /// Model identifier reported for the call.
    pub model_id: String,
}

// ============================================================================
// Local (Ollama-compatible) wire format
// ============================================================================

/// `GET {base}/tags` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalTagsResponse {
    /// Installed models.
    #[serde(default)]
    pub models: Vec<LocalModel>,
}

/// One installed model.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalModel {
    /// Model name, e.g. `qwen2:1.5b`.
    pub name: String,
}

/// `POST {base}/generate` body.
#[derive(Debug, Clone, Serialize)]
pub struct LocalGenerateRequest<'a> {
    /// Model id.
    pub model: &'a str,
    /// Prompt text.
    pub prompt: &'a str,
    /// Always false: the whole answer is returned at once.
    pub stream: bool,
    /// Decoding options.
    pub options: LocalOptions,
}

/// Decoding options in the local server's naming.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LocalOptions {
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling threshold.
    pub top_p: f32,
    /// Maximum tokens to generate.
    pub num_predict: u32,
}

impl From<ModelOptions> for LocalOptions {
    fn from(options: ModelOptions) -> Self {
        Self {
            temperature: options.temperature,
            top_p: options.top_p,
            num_predict: options.max_tokens,
        }
    }
}

/// `POST {base}/generate` response.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalGenerateResponse {
    /// Generated text.
    pub response: String,
    /// Model that answered, when reported.
    #[serde(default)]
    pub model: Option<String>,
}

/// Error body some local servers return, e.g. `{"error": "model not found"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalErrorResponse {
    /// Error message.
    pub error: String,
}

// ============================================================================
// Cloud (Gemini-compatible) wire format
// ============================================================================

/// Cloud `generateContent` request body.
#[derive(Debug, Clone, Serialize)]
pub struct CloudRequest {
    /// Conversation contents; a single user turn here.
    pub contents: Vec<CloudContent>,
    /// Decoding options.
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<CloudGenerationConfig>,
}

impl CloudRequest {
    /// A single-prompt request.
    #[must_use]
    pub fn from_prompt(prompt: &str, options: ModelOptions) -> Self {
        Self {
            contents: vec![CloudContent {
                parts: vec![CloudPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(CloudGenerationConfig {
                temperature: options.temperature,
                top_p: options.top_p,
                max_output_tokens: options.max_tokens,
            }),
        }
    }
}

/// Cloud decoding options.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudGenerationConfig {
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling threshold.
    pub top_p: f32,
    /// Maximum output tokens.
    pub max_output_tokens: u32,
}

/// One content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudContent {
    /// Parts of the content.
    #[serde(default)]
    pub parts: Vec<CloudPart>,
}

/// One text part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudPart {
    /// Text of the part.
    #[serde(default)]
    pub text: String,
}

/// Cloud `generateContent` response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloudResponse {
    /// Candidate answers.
    #[serde(default)]
    pub candidates: Vec<CloudCandidate>,
}

impl CloudResponse {
    /// Text of the first part of the first candidate.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.first())
            .map(|part| part.text.as_str())
    }
}

/// One candidate answer.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudCandidate {
    /// Candidate content; absent when the answer was blocked.
    #[serde(default)]
    pub content: Option<CloudContent>,
}

/// Cloud error body: `{"error": {"message": ...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudErrorResponse {
    /// Error details.
    pub error: CloudErrorBody,
}

/// Cloud error details.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudErrorBody {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}
