//! Map-reduce flashcard generation

use std::sync::Arc;

use futures::future::try_join_all;

use crate::error::{Error, Result};
use crate::providers::{ChatMessage, CompletionProvider};
use crate::types::study::{flashcard_response_schema, Flashcard, FlashcardResponse};

use super::prompt::PromptBuilder;

/// Generates flashcards from a document's generation chunks
pub struct FlashcardChain {
    llm: Arc<dyn CompletionProvider>,
}

impl FlashcardChain {
    pub fn new(llm: Arc<dyn CompletionProvider>) -> Self {
        Self { llm }
    }

    /// Run the chain over ordered generation chunks
    ///
    /// One structured request per chunk runs concurrently; the first failure
    /// aborts the chain and drops the remaining in-flight requests. The
    /// complete set of partial results is then consolidated in a single
    /// reduce request.
    pub async fn run(&self, chunks: &[String]) -> Result<Vec<Flashcard>> {
        let partials =
            try_join_all(chunks.iter().map(|chunk| self.map_chunk(chunk))).await?;
        let flashcards: Vec<Flashcard> = partials.into_iter().flatten().collect();

        tracing::debug!(
            chunks = chunks.len(),
            partial_cards = flashcards.len(),
            "flashcard map stage complete"
        );

        self.reduce(&flashcards).await
    }

    async fn map_chunk(&self, chunk: &str) -> Result<Vec<Flashcard>> {
        let messages = [ChatMessage::user(PromptBuilder::flashcard_map(chunk))];
        self.request(&messages).await
    }

    async fn reduce(&self, flashcards: &[Flashcard]) -> Result<Vec<Flashcard>> {
        let rendered = serde_json::to_string_pretty(flashcards)?;
        let messages = [ChatMessage::user(PromptBuilder::flashcard_reduce(&rendered))];
        self.request(&messages).await
    }

    async fn request(&self, messages: &[ChatMessage]) -> Result<Vec<Flashcard>> {
        let value = self
            .llm
            .complete_structured(messages, "flashcard_response", &flashcard_response_schema())
            .await?;
        let response: FlashcardResponse = serde_json::from_value(value).map_err(|e| {
            Error::SchemaViolation(format!("flashcard output did not match the schema: {e}"))
        })?;
        Ok(response.flashcards)
    }
}
