//! AI provider abstractions and implementations.
//!
//! A trait-based abstraction over the document-understanding model,
//! allowing the Gemini backend to be swapped for a mock in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// A certificate document sent alongside the prompt: decoded bytes plus
/// the MIME type the uploader declared.
#[derive(Debug, Clone)]
pub struct DocumentPart {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// Result of a provider call.
pub struct ProviderResponse {
    /// Text content of the first candidate, if any.
    pub text: Option<String>,

    /// Input tokens consumed.
    pub input_tokens: i32,

    /// Output tokens generated.
    pub output_tokens: i32,

    /// Finish reason.
    pub finish_reason: FinishReason,
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
}

/// Trait for document-understanding text generation (e.g. Gemini).
///
/// One combined request per call: the instruction text and the inline
/// document travel together, with no conversation state and no streaming.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate a text response for the prompt and attached document.
    async fn generate(
        &self,
        prompt: &str,
        document: &DocumentPart,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
