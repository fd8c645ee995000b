//! Shared test doubles for the provider traits

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::providers::{ChatMessage, CompletionProvider, EmbeddingProvider};

/// Deterministic embedder: the same text always maps to the same vector
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dimensions: usize,
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self { dimensions: 4 }
    }
}

impl StubEmbedder {
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![1.0f32; self.dimensions];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % self.dimensions] += byte as f32;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vector_for(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "stub"
    }
}

type Responder = Box<dyn Fn(&[ChatMessage], bool) -> Result<String> + Send + Sync>;

/// Completion double driven by a responder closure
///
/// The closure receives the messages and whether the call was structured;
/// structured responses are parsed like the real client, so returning
/// non-JSON exercises the schema-violation path.
pub struct ScriptedCompletion {
    responder: Responder,
    pub plain_calls: AtomicUsize,
    pub structured_calls: AtomicUsize,
}

impl ScriptedCompletion {
    pub fn new(
        responder: impl Fn(&[ChatMessage], bool) -> Result<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            plain_calls: AtomicUsize::new(0),
            structured_calls: AtomicUsize::new(0),
        }
    }

    /// Always answer with the same text
    pub fn always(response: &str) -> Self {
        let response = response.to_string();
        Self::new(move |_, _| Ok(response.clone()))
    }

    pub fn plain_call_count(&self) -> usize {
        self.plain_calls.load(Ordering::SeqCst)
    }

    pub fn structured_call_count(&self) -> usize {
        self.structured_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletion {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.plain_calls.fetch_add(1, Ordering::SeqCst);
        (self.responder)(messages, false)
    }

    async fn complete_structured(
        &self,
        messages: &[ChatMessage],
        schema_name: &str,
        _schema: &Value,
    ) -> Result<Value> {
        self.structured_calls.fetch_add(1, Ordering::SeqCst);
        let content = (self.responder)(messages, true)?;
        serde_json::from_str(&content).map_err(|e| {
            Error::SchemaViolation(format!(
                "scripted model returned non-JSON output for schema '{schema_name}': {e}"
            ))
        })
    }

    fn model(&self) -> &str {
        "scripted"
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
