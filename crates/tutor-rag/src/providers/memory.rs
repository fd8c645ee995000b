//! In-memory [`VectorStore`] implementation
//!
//! Brute-force cosine similarity over stored vectors; `fetch` returns
//! insertion order, which deliberately exercises the order-agnostic store
//! contract in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::types::Chunk;

use super::vector_store::{ChunkFilter, VectorStore};

struct StoredObject {
    chunk: Chunk,
    vector: Option<Vec<f32>>,
}

/// In-memory store for tests and offline development
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<StoredObject>>>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of objects held in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map(|objects| objects.len())
            .unwrap_or(0)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::store("store connection is closed"));
        }
        Ok(())
    }
}

fn cosine_sim(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a < f32::EPSILON || mag_b < f32::EPSILON {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn ensure_collection(&self, collection: &str) -> Result<()> {
        self.ensure_open()?;
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default();
        Ok(())
    }

    async fn insert_batch(
        &self,
        collection: &str,
        chunks: &[Chunk],
        vectors: Option<&[Vec<f32>]>,
    ) -> Result<()> {
        self.ensure_open()?;
        if let Some(vectors) = vectors {
            if vectors.len() != chunks.len() {
                return Err(Error::store(format!(
                    "vector count mismatch: {} chunks, {} vectors",
                    chunks.len(),
                    vectors.len()
                )));
            }
        }

        let mut collections = self.collections.write();
        let objects = collections
            .get_mut(collection)
            .ok_or_else(|| Error::store(format!("unknown collection '{collection}'")))?;

        for (i, chunk) in chunks.iter().enumerate() {
            objects.push(StoredObject {
                chunk: chunk.clone(),
                vector: vectors.map(|v| v[i].clone()),
            });
        }
        Ok(())
    }

    async fn near_search(
        &self,
        collection: &str,
        vector: &[f32],
        filter: &ChunkFilter,
        top_k: usize,
    ) -> Result<Vec<Chunk>> {
        self.ensure_open()?;
        let collections = self.collections.read();
        let objects = collections
            .get(collection)
            .ok_or_else(|| Error::store(format!("unknown collection '{collection}'")))?;

        let mut scored: Vec<(f32, &Chunk)> = objects
            .iter()
            .filter(|object| filter.matches(&object.chunk))
            .filter_map(|object| {
                object
                    .vector
                    .as_ref()
                    .map(|v| (cosine_sim(vector, v), &object.chunk))
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored.into_iter().map(|(_, chunk)| chunk.clone()).collect())
    }

    async fn fetch(
        &self,
        collection: &str,
        filter: &ChunkFilter,
        limit: usize,
    ) -> Result<Vec<Chunk>> {
        self.ensure_open()?;
        let collections = self.collections.read();
        let objects = collections
            .get(collection)
            .ok_or_else(|| Error::store(format!("unknown collection '{collection}'")))?;

        Ok(objects
            .iter()
            .filter(|object| filter.matches(&object.chunk))
            .take(limit)
            .map(|object| object.chunk.clone())
            .collect())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
