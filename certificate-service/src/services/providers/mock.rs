//! Mock provider implementation for testing.

use super::{DocumentPart, FinishReason, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;

/// Mock text provider that returns a canned reply, or fails on demand.
pub struct MockTextProvider {
    reply: Option<String>,
}

impl MockTextProvider {
    /// A provider that answers every request with `reply`.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
        }
    }

    /// A provider whose every request fails with an API error.
    pub fn failing() -> Self {
        Self { reply: None }
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        _document: &DocumentPart,
    ) -> Result<ProviderResponse, ProviderError> {
        let Some(reply) = &self.reply else {
            return Err(ProviderError::ApiError(
                "Mock text provider configured to fail".to_string(),
            ));
        };

        Ok(ProviderResponse {
            text: Some(reply.clone()),
            input_tokens: prompt.len() as i32 / 4,
            output_tokens: reply.len() as i32 / 4,
            finish_reason: FinishReason::Complete,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.reply.is_some() {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock text provider configured to fail".to_string(),
            ))
        }
    }
}
