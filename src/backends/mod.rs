//! Generation backends.
//!
//! This module provides:
//! - [`LocalBackend`]: client for an Ollama-compatible inference server
//! - [`CloudBackend`]: client for a Gemini-compatible hosted API
//! - [`BackendSelector`]: local-first selection with ranked probing,
//!   sticky adoption, cancellation and cloud fallback
//! - Wire and request types shared by both
//!
//! # Example
//!
//! ```no_run
//! use petcare_advisor::backends::{BackendSelector, GenerationRequest};
//! use petcare_advisor::config::Config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let selector = BackendSelector::from_config(&Config::from_env()?)?;
//! let generation = selector.generate(&GenerationRequest::new("Hello")).await?;
//! println!("{} answered: {}", generation.source, generation.text);
//! # Ok(())
//! # }
//! ```

mod cloud;
mod local;
mod selector;
mod types;

pub use cloud::CloudBackend;
pub use local::LocalBackend;
pub use selector::BackendSelector;
pub use types::{
    BackendKind, CloudCandidate, CloudContent, CloudErrorBody, CloudErrorResponse,
    CloudGenerationConfig, CloudPart, CloudRequest, CloudResponse, Generation, GenerationRequest,
    LocalErrorResponse, LocalGenerateRequest, LocalGenerateResponse, LocalModel, LocalOptions,
    LocalTagsResponse, ModelOptions,
};
