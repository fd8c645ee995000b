//! Completion provider trait for chat and structured generation

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// One message in a chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Trait for chat-completion backends
///
/// Errors are propagated as-is; the core never retries an upstream call.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run a chat completion and return the model's text
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Run a chat completion constrained to a JSON schema
    ///
    /// Returns the parsed JSON value; output that is not valid JSON is a
    /// schema violation, surfaced rather than coerced.
    async fn complete_structured(
        &self,
        messages: &[ChatMessage],
        schema_name: &str,
        schema: &Value,
    ) -> Result<Value>;

    /// Get the model being used
    fn model(&self) -> &str;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
