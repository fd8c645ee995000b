//! Dual-collection index store
//!
//! One collection holds small embedded chunks for similarity search, the
//! other holds large plain-text chunks for whole-document generation.
//! Writes are additive across documents and users; rows are distinguished
//! solely by their `(user_id, source)` properties.

use std::sync::Arc;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::providers::{EmbeddingProvider, VectorStore};
use crate::types::Chunk;

/// Write-side facade over the two chunk collections
pub struct IndexStore {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    retrieval_collection: String,
    generation_collection: String,
}

impl IndexStore {
    /// Create an index store over a connected vector store
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: &StoreConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            retrieval_collection: config.retrieval_collection.clone(),
            generation_collection: config.generation_collection.clone(),
        }
    }

    /// Ensure both collections exist; idempotent and safe under concurrent
    /// startup of multiple process instances
    pub async fn ensure_collections(&self) -> Result<()> {
        self.store
            .ensure_collection(&self.retrieval_collection)
            .await?;
        self.store
            .ensure_collection(&self.generation_collection)
            .await?;
        Ok(())
    }

    /// Embed and write retrieval chunks
    pub async fn write_retrieval_chunks(&self, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        self.store
            .insert_batch(&self.retrieval_collection, chunks, Some(&vectors))
            .await?;

        tracing::debug!(count = chunks.len(), "retrieval chunks written");
        Ok(())
    }

    /// Write generation chunks without embeddings
    pub async fn write_generation_chunks(&self, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        self.store
            .insert_batch(&self.generation_collection, chunks, None)
            .await?;

        tracing::debug!(count = chunks.len(), "generation chunks written");
        Ok(())
    }

    /// The underlying store connection
    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// The embedding provider shared with the search path
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Name of the embedded retrieval collection
    pub fn retrieval_collection(&self) -> &str {
        &self.retrieval_collection
    }

    /// Name of the plain-text generation collection
    pub fn generation_collection(&self) -> &str {
        &self.generation_collection
    }
}
