//! Filtered similarity search over the retrieval collection

use std::sync::Arc;

use crate::error::Result;
use crate::providers::{ChunkFilter, EmbeddingProvider, VectorStore};

/// Retrieves query-relevant context scoped to a user and optionally one
/// document
pub struct Retriever {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    collection: String,
}

impl Retriever {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            embedder,
            collection: collection.into(),
        }
    }

    /// Retrieve the `top_k` most relevant chunk texts, joined with blank
    /// lines in descending relevance order
    ///
    /// A query that matches nothing returns an empty string; callers decide
    /// how to degrade.
    pub async fn retrieve(
        &self,
        query: &str,
        user_id: &str,
        document_name: Option<&str>,
        top_k: usize,
    ) -> Result<String> {
        let vector = self.embedder.embed(query).await?;
        let filter = match document_name {
            Some(source) => ChunkFilter::document(user_id, source),
            None => ChunkFilter::user(user_id),
        };

        let results = self
            .store
            .near_search(&self.collection, &vector, &filter, top_k)
            .await?;

        tracing::debug!(
            user_id,
            document = document_name.unwrap_or("<any>"),
            hits = results.len(),
            "retrieval completed"
        );

        Ok(results
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MemoryStore;
    use crate::testing::StubEmbedder;
    use crate::types::{Chunk, ChunkMetadata};

    const COLLECTION: &str = "RetrievalChunk";

    async fn populated_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.ensure_collection(COLLECTION).await.unwrap();
        let embedder = StubEmbedder::default();

        let rows = [
            ("u1", "notes.txt", 0u32, "photosynthesis basics"),
            ("u1", "slides.pdf", 0u32, "cell division stages"),
            ("u2", "notes.txt", 0u32, "photosynthesis basics"),
        ];
        for (user, source, index, text) in rows {
            let chunk = Chunk::new(text, &ChunkMetadata::new(user, source), index);
            let vector = embedder.vector_for(text);
            store
                .insert_batch(COLLECTION, &[chunk], Some(&[vector]))
                .await
                .unwrap();
        }
        store
    }

    fn retriever(store: Arc<MemoryStore>) -> Retriever {
        Retriever::new(store, Arc::new(StubEmbedder::default()), COLLECTION)
    }

    #[tokio::test]
    async fn test_empty_index_returns_empty_string() {
        let store = Arc::new(MemoryStore::new());
        store.ensure_collection(COLLECTION).await.unwrap();
        let retriever = retriever(store);

        let context = retriever.retrieve("main idea", "u1", None, 5).await.unwrap();
        assert_eq!(context, "");
    }

    #[tokio::test]
    async fn test_results_are_scoped_to_the_user() {
        let store = populated_store().await;
        let retriever = retriever(store);

        // u2 owns an identical chunk; it must never leak into u1's context.
        let context = retriever
            .retrieve("photosynthesis basics", "u1", None, 10)
            .await
            .unwrap();
        assert!(context.contains("photosynthesis"));

        let other = retriever
            .retrieve("photosynthesis basics", "u3", None, 10)
            .await
            .unwrap();
        assert_eq!(other, "");
    }

    #[tokio::test]
    async fn test_document_filter_is_sound() {
        let store = populated_store().await;
        let retriever = retriever(store);

        let context = retriever
            .retrieve("photosynthesis basics", "u1", Some("slides.pdf"), 10)
            .await
            .unwrap();
        // Only slides.pdf content is eligible, however similar notes.txt is.
        assert!(!context.contains("photosynthesis"));
        assert!(context.contains("cell division"));
    }

    #[tokio::test]
    async fn test_results_join_with_blank_line() {
        let store = populated_store().await;
        let retriever = retriever(store);

        let context = retriever
            .retrieve("photosynthesis basics", "u1", None, 10)
            .await
            .unwrap();
        assert_eq!(context.split("\n\n").count(), 2);
    }
}
