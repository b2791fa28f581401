//! Language-model service.
//!
//! The orchestrator only needs one operation: send a prompt, get text back.
//! [`LanguageModel`] is that seam; [`GeminiClient`] implements it over the
//! Google generative-language REST API.

mod gemini;

use async_trait::async_trait;

use crate::error::EngineResult;

pub use gemini::GeminiClient;

/// A text-in, text-out language model.
///
/// Implementations map every failure to an [`crate::error::EngineError`];
/// transport problems should be `AiTransport` so the caller can retry them.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Sends a prompt and returns the model's text answer.
    async fn generate(&self, prompt: &str) -> EngineResult<String>;

    /// A short name for logs.
    fn name(&self) -> &str;
}
