//! Map-reduce quiz generation

use std::sync::Arc;

use futures::future::try_join_all;

use crate::error::{Error, Result};
use crate::providers::{ChatMessage, CompletionProvider};
use crate::types::study::{quiz_response_schema, QuizQuestion, QuizResponse};

use super::prompt::PromptBuilder;

/// Generates a quiz from a document's generation chunks
pub struct QuizChain {
    llm: Arc<dyn CompletionProvider>,
}

impl QuizChain {
    pub fn new(llm: Arc<dyn CompletionProvider>) -> Self {
        Self { llm }
    }

    /// Run the chain over ordered generation chunks
    ///
    /// Map requests run concurrently and the first failure aborts the chain;
    /// the reduce request deduplicates question text and balances the
    /// difficulty and question-type mix.
    pub async fn run(&self, chunks: &[String]) -> Result<Vec<QuizQuestion>> {
        let partials =
            try_join_all(chunks.iter().map(|chunk| self.map_chunk(chunk))).await?;
        let questions: Vec<QuizQuestion> = partials.into_iter().flatten().collect();

        tracing::debug!(
            chunks = chunks.len(),
            partial_questions = questions.len(),
            "quiz map stage complete"
        );

        self.reduce(&questions).await
    }

    async fn map_chunk(&self, chunk: &str) -> Result<Vec<QuizQuestion>> {
        let messages = [ChatMessage::user(PromptBuilder::quiz_map(chunk))];
        self.request(&messages).await
    }

    async fn reduce(&self, questions: &[QuizQuestion]) -> Result<Vec<QuizQuestion>> {
        let rendered = serde_json::to_string_pretty(questions)?;
        let messages = [ChatMessage::user(PromptBuilder::quiz_reduce(&rendered))];
        self.request(&messages).await
    }

    async fn request(&self, messages: &[ChatMessage]) -> Result<Vec<QuizQuestion>> {
        let value = self
            .llm
            .complete_structured(messages, "quiz_response", &quiz_response_schema())
            .await?;
        let response: QuizResponse = serde_json::from_value(value).map_err(|e| {
            Error::SchemaViolation(format!("quiz output did not match the schema: {e}"))
        })?;
        Ok(response.questions)
    }
}
