//! Map-reduce document summarization

use std::sync::Arc;

use futures::future::try_join_all;

use crate::error::Result;
use crate::providers::{ChatMessage, CompletionProvider};

use super::prompt::PromptBuilder;

/// Summarizes a document from its generation chunks
pub struct SummaryChain {
    llm: Arc<dyn CompletionProvider>,
}

impl SummaryChain {
    pub fn new(llm: Arc<dyn CompletionProvider>) -> Self {
        Self { llm }
    }

    /// Run the chain over ordered generation chunks
    ///
    /// Each chunk is summarized concurrently, then the partial summaries are
    /// combined into one Markdown summary with no preamble.
    pub async fn run(&self, chunks: &[String]) -> Result<String> {
        let partials =
            try_join_all(chunks.iter().map(|chunk| self.map_chunk(chunk))).await?;

        tracing::debug!(chunks = chunks.len(), "summary map stage complete");

        self.reduce(&partials).await
    }

    async fn map_chunk(&self, chunk: &str) -> Result<String> {
        let messages = [ChatMessage::user(PromptBuilder::summary_map(chunk))];
        self.llm.complete(&messages).await
    }

    async fn reduce(&self, summaries: &[String]) -> Result<String> {
        let joined = summaries.join("\n\n");
        let messages = [ChatMessage::user(PromptBuilder::summary_reduce(&joined))];
        self.llm.complete(&messages).await
    }
}
