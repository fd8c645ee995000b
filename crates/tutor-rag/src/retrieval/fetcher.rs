//! Ordered fetch of generation chunks for a (user, document) pair

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::{ChunkFilter, VectorStore};

/// Fetches a document's generation chunks and restores reading order
pub struct GenerationChunkFetcher {
    store: Arc<dyn VectorStore>,
    collection: String,
    /// Maximum chunks per document; more is a capacity error, never a
    /// silent truncation
    limit: usize,
}

impl GenerationChunkFetcher {
    pub fn new(
        store: Arc<dyn VectorStore>,
        collection: impl Into<String>,
        limit: usize,
    ) -> Self {
        Self {
            store,
            collection: collection.into(),
            limit,
        }
    }

    /// Fetch a document's generation chunk texts in original reading order
    ///
    /// The store returns chunks in no particular order; sorting by
    /// `chunk_index` reconstructs the order the chunker assigned.
    pub async fn get_generation_chunks(
        &self,
        user_id: &str,
        document_name: &str,
    ) -> Result<Vec<String>> {
        let filter = ChunkFilter::document(user_id, document_name);

        // Fetch one past the bound so truncation is detectable.
        let mut chunks = self
            .store
            .fetch(&self.collection, &filter, self.limit + 1)
            .await?;

        if chunks.is_empty() {
            return Err(Error::NotFound(format!(
                "no generation chunks for document '{document_name}' (user '{user_id}')"
            )));
        }
        if chunks.len() > self.limit {
            return Err(Error::Capacity(format!(
                "document '{document_name}' (user '{user_id}') has more than {} generation chunks",
                self.limit
            )));
        }

        chunks.sort_by_key(|chunk| chunk.chunk_index);
        Ok(chunks.into_iter().map(|chunk| chunk.text).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MemoryStore;
    use crate::types::{Chunk, ChunkMetadata};

    const COLLECTION: &str = "GenerationChunk";

    async fn store_with_chunks(indices: &[u32]) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.ensure_collection(COLLECTION).await.unwrap();
        let metadata = ChunkMetadata::new("u1", "notes.txt");
        let chunks: Vec<Chunk> = indices
            .iter()
            .map(|&i| Chunk::new(format!("part {i}"), &metadata, i))
            .collect();
        store.insert_batch(COLLECTION, &chunks, None).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_out_of_order_return_is_resorted() {
        // Insertion order is what MemoryStore::fetch returns; scramble it.
        let store = store_with_chunks(&[3, 0, 2, 1]).await;
        let fetcher = GenerationChunkFetcher::new(store, COLLECTION, 100);

        let texts = fetcher
            .get_generation_chunks("u1", "notes.txt")
            .await
            .unwrap();
        assert_eq!(texts, vec!["part 0", "part 1", "part 2", "part 3"]);
    }

    #[tokio::test]
    async fn test_single_chunk_round_trip() {
        let store = store_with_chunks(&[0]).await;
        let fetcher = GenerationChunkFetcher::new(store, COLLECTION, 100);

        let texts = fetcher
            .get_generation_chunks("u1", "notes.txt")
            .await
            .unwrap();
        assert_eq!(texts, vec!["part 0"]);
    }

    #[tokio::test]
    async fn test_missing_document_is_not_found() {
        let store = store_with_chunks(&[0]).await;
        let fetcher = GenerationChunkFetcher::new(store, COLLECTION, 100);

        let err = fetcher
            .get_generation_chunks("u1", "other.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = fetcher
            .get_generation_chunks("u2", "notes.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_over_limit_is_a_capacity_error() {
        let indices: Vec<u32> = (0..6).collect();
        let store = store_with_chunks(&indices).await;
        let fetcher = GenerationChunkFetcher::new(store, COLLECTION, 5);

        let err = fetcher
            .get_generation_chunks("u1", "notes.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Capacity(_)));
    }

    #[tokio::test]
    async fn test_exactly_at_limit_is_allowed() {
        let indices: Vec<u32> = (0..5).collect();
        let store = store_with_chunks(&indices).await;
        let fetcher = GenerationChunkFetcher::new(store, COLLECTION, 5);

        let texts = fetcher
            .get_generation_chunks("u1", "notes.txt")
            .await
            .unwrap();
        assert_eq!(texts.len(), 5);
    }
}
