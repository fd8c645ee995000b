//! Chunk type with provenance and ordering metadata

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Provenance metadata attached to every chunk of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkMetadata {
    /// Owning user
    pub user_id: String,
    /// Document identifier the chunk was split from
    pub source: String,
}

impl ChunkMetadata {
    /// Create metadata for a (user, document) pair
    pub fn new(user_id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            source: source.into(),
        }
    }
}

/// A contiguous span of document text
///
/// `chunk_index` is unique and contiguous within a `(user_id, source)` group
/// for a single chunker invocation and is the only ordering signal: the store
/// does not guarantee retrieval order, so order-sensitive consumers must sort
/// by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content
    pub text: String,
    /// Owning user
    pub user_id: String,
    /// Document identifier
    pub source: String,
    /// Zero-based position in the original document
    pub chunk_index: u32,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(text: impl Into<String>, metadata: &ChunkMetadata, chunk_index: u32) -> Self {
        Self {
            text: text.into(),
            user_id: metadata.user_id.clone(),
            source: metadata.source.clone(),
            chunk_index,
        }
    }

    /// Convert to the store's property map
    pub fn properties(&self) -> Value {
        serde_json::json!({
            "text": self.text,
            "user_id": self.user_id,
            "source": self.source,
            "chunk_index": self.chunk_index,
        })
    }

    /// Rebuild a chunk from a store object's properties
    pub fn from_properties(properties: &Value) -> Result<Self> {
        let text = properties
            .get("text")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::store("chunk object is missing the 'text' property"))?;
        let user_id = properties
            .get("user_id")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::store("chunk object is missing the 'user_id' property"))?;
        let source = properties
            .get("source")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::store("chunk object is missing the 'source' property"))?;
        let chunk_index = properties
            .get("chunk_index")
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::store("chunk object is missing the 'chunk_index' property"))?;

        Ok(Self {
            text: text.to_string(),
            user_id: user_id.to_string(),
            source: source.to_string(),
            chunk_index: chunk_index as u32,
        })
    }
}
