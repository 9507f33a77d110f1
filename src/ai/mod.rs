pub mod gemini;
pub mod prompt;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;
pub use prompt::{analyze_text, AnalysisResult, AnalyzedItem};

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Gemini API key is not configured")]
    MissingApiKey,

    #[error("Gemini request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Upstream(String),

    #[error("Failed to get response from Gemini: No text generated")]
    EmptyResponse,

    #[error("Failed to parse AI response")]
    Unparseable(String),
}

/// Text-in, text-out generative model
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;

    /// Whether credentials are present; no network call
    fn is_configured(&self) -> bool;
}
