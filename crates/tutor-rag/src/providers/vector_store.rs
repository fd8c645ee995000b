//! Vector store provider trait
//!
//! The store interface is order-agnostic: `fetch` and `near_search` make no
//! promise about result order beyond what is documented per method, and
//! order-sensitive consumers must sort by `chunk_index` themselves.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Chunk;

/// Boolean filter over chunk provenance: always scoped to a user, optionally
/// narrowed to one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFilter {
    pub user_id: String,
    pub source: Option<String>,
}

impl ChunkFilter {
    /// Match every chunk belonging to a user
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            source: None,
        }
    }

    /// Match a single (user, document) pair
    pub fn document(user_id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            source: Some(source.into()),
        }
    }

    /// Check a chunk against the filter
    pub fn matches(&self, chunk: &Chunk) -> bool {
        chunk.user_id == self.user_id
            && self
                .source
                .as_ref()
                .map(|source| &chunk.source == source)
                .unwrap_or(true)
    }
}

/// Trait for the external vector/document store
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Ensure a collection exists (idempotent check-then-create)
    ///
    /// Never errors when the collection already exists, including when
    /// another process creates it concurrently.
    async fn ensure_collection(&self, collection: &str) -> Result<()>;

    /// Insert a batch of chunks, with one vector per chunk when the
    /// collection is embedded
    async fn insert_batch(
        &self,
        collection: &str,
        chunks: &[Chunk],
        vectors: Option<&[Vec<f32>]>,
    ) -> Result<()>;

    /// Similarity search, filtered; results ordered by descending relevance
    async fn near_search(
        &self,
        collection: &str,
        vector: &[f32],
        filter: &ChunkFilter,
        top_k: usize,
    ) -> Result<Vec<Chunk>>;

    /// Fetch up to `limit` chunks matching the filter, in no particular order
    async fn fetch(
        &self,
        collection: &str,
        filter: &ChunkFilter,
        limit: usize,
    ) -> Result<Vec<Chunk>>;

    /// Release the store connection; safe to call more than once
    async fn close(&self) -> Result<()>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkMetadata;

    #[test]
    fn test_filter_matches_user_scope() {
        let filter = ChunkFilter::user("u1");
        let mine = Chunk::new("a", &ChunkMetadata::new("u1", "x.txt"), 0);
        let theirs = Chunk::new("a", &ChunkMetadata::new("u2", "x.txt"), 0);
        assert!(filter.matches(&mine));
        assert!(!filter.matches(&theirs));
    }

    #[test]
    fn test_filter_narrows_to_document() {
        let filter = ChunkFilter::document("u1", "x.txt");
        let same_doc = Chunk::new("a", &ChunkMetadata::new("u1", "x.txt"), 0);
        let other_doc = Chunk::new("a", &ChunkMetadata::new("u1", "y.txt"), 0);
        assert!(filter.matches(&same_doc));
        assert!(!filter.matches(&other_doc));
    }
}
