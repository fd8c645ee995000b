//! Weaviate-backed vector store
//!
//! Talks to a Weaviate instance over its REST schema/batch endpoints and
//! GraphQL query endpoint. Collections are created with `vectorizer: none`;
//! vectors are supplied by the caller on the write path and at query time.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::types::Chunk;

use super::vector_store::{ChunkFilter, VectorStore};

/// Weaviate HTTP client implementing [`VectorStore`]
pub struct WeaviateStore {
    client: Client,
    base_url: String,
}

impl WeaviateStore {
    /// Connect to a Weaviate instance
    ///
    /// Probes the readiness endpoint; an unreachable store is fatal here, the
    /// system fails fast instead of retrying at boot.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .expect("Failed to create HTTP client");

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let url = format!("{base_url}/v1/.well-known/ready");

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Connection(format!("store at {base_url} is unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Connection(format!(
                "store at {base_url} is not ready (HTTP {})",
                response.status()
            )));
        }

        Ok(Self { client, base_url })
    }

    /// Render the GraphQL `where` argument for a filter
    fn where_clause(filter: &ChunkFilter) -> String {
        // serde_json string rendering doubles as GraphQL string escaping
        let user_id = json!(filter.user_id);
        let user_operand =
            format!(r#"{{path: ["user_id"], operator: Equal, valueText: {user_id}}}"#);

        match &filter.source {
            Some(source) => {
                let source = json!(source);
                let source_operand =
                    format!(r#"{{path: ["source"], operator: Equal, valueText: {source}}}"#);
                format!(r#"{{operator: And, operands: [{user_operand}, {source_operand}]}}"#)
            }
            None => user_operand,
        }
    }

    /// Build a `Get` query over a collection
    fn get_query(collection: &str, arguments: &str) -> String {
        format!(
            "{{ Get {{ {collection}({arguments}) {{ text user_id source chunk_index }} }} }}"
        )
    }

    /// Run a GraphQL query and extract the object list for a collection
    async fn run_get_query(&self, collection: &str, query: String) -> Result<Vec<Chunk>> {
        let url = format!("{}/v1/graphql", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "query": query }))
            .send()
            .await
            .map_err(|e| Error::store(format!("query request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::store(format!("query failed ({status}): {body}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::store(format!("failed to parse query response: {e}")))?;

        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                return Err(Error::store(format!(
                    "query rejected: {}",
                    errors[0]
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown error")
                )));
            }
        }

        let objects = body
            .pointer(&format!("/data/Get/{collection}"))
            .and_then(Value::as_array)
            .ok_or_else(|| Error::store(format!("query response has no '{collection}' data")))?;

        objects.iter().map(Chunk::from_properties).collect()
    }
}

#[async_trait]
impl VectorStore for WeaviateStore {
    async fn ensure_collection(&self, collection: &str) -> Result<()> {
        let check_url = format!("{}/v1/schema/{collection}", self.base_url);
        let response = self
            .client
            .get(&check_url)
            .send()
            .await
            .map_err(|e| Error::store(format!("schema check failed: {e}")))?;

        if response.status().is_success() {
            tracing::debug!(collection, "collection already exists");
            return Ok(());
        }
        if response.status() != StatusCode::NOT_FOUND {
            return Err(Error::store(format!(
                "schema check for '{collection}' failed (HTTP {})",
                response.status()
            )));
        }

        let class = json!({
            "class": collection,
            "vectorizer": "none",
            "properties": [
                {"name": "text", "dataType": ["text"]},
                {"name": "user_id", "dataType": ["text"]},
                {"name": "source", "dataType": ["text"]},
                {"name": "chunk_index", "dataType": ["int"]},
            ],
        });

        let create_url = format!("{}/v1/schema", self.base_url);
        let response = self
            .client
            .post(&create_url)
            .json(&class)
            .send()
            .await
            .map_err(|e| Error::store(format!("collection creation failed: {e}")))?;

        if response.status().is_success() {
            tracing::info!(collection, "collection created");
            return Ok(());
        }

        // Another process may have created it between check and create.
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if body.contains("already exists") {
            tracing::debug!(collection, "collection created concurrently");
            return Ok(());
        }

        Err(Error::store(format!(
            "failed to create collection '{collection}' ({status}): {body}"
        )))
    }

    async fn insert_batch(
        &self,
        collection: &str,
        chunks: &[Chunk],
        vectors: Option<&[Vec<f32>]>,
    ) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }
        if let Some(vectors) = vectors {
            if vectors.len() != chunks.len() {
                return Err(Error::store(format!(
                    "vector count mismatch: {} chunks, {} vectors",
                    chunks.len(),
                    vectors.len()
                )));
            }
        }

        let objects: Vec<Value> = chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| {
                let mut object = json!({
                    "class": collection,
                    "properties": chunk.properties(),
                });
                if let Some(vectors) = vectors {
                    object["vector"] = json!(vectors[i]);
                }
                object
            })
            .collect();

        let url = format!("{}/v1/batch/objects", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "objects": objects }))
            .send()
            .await
            .map_err(|e| Error::store(format!("batch insert failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::store(format!(
                "batch insert failed ({status}): {body}"
            )));
        }

        // Per-object failures come back with HTTP 200; surface the first one.
        let results: Value = response
            .json()
            .await
            .map_err(|e| Error::store(format!("failed to parse batch response: {e}")))?;

        if let Some(items) = results.as_array() {
            for item in items {
                if let Some(message) = item
                    .pointer("/result/errors/error/0/message")
                    .and_then(Value::as_str)
                {
                    return Err(Error::store(format!("batch object rejected: {message}")));
                }
            }
        }

        tracing::debug!(collection, count = chunks.len(), "batch inserted");
        Ok(())
    }

    async fn near_search(
        &self,
        collection: &str,
        vector: &[f32],
        filter: &ChunkFilter,
        top_k: usize,
    ) -> Result<Vec<Chunk>> {
        let near_vector = format!("{{vector: {}}}", json!(vector));
        let arguments = format!(
            "nearVector: {near_vector}, where: {}, limit: {top_k}",
            Self::where_clause(filter)
        );
        self.run_get_query(collection, Self::get_query(collection, &arguments))
            .await
    }

    async fn fetch(
        &self,
        collection: &str,
        filter: &ChunkFilter,
        limit: usize,
    ) -> Result<Vec<Chunk>> {
        let arguments = format!("where: {}, limit: {limit}", Self::where_clause(filter));
        self.run_get_query(collection, Self::get_query(collection, &arguments))
            .await
    }

    async fn close(&self) -> Result<()> {
        // The HTTP client holds no server-side session; dropping the pooled
        // connections is all there is to release.
        tracing::debug!("store connection released");
        Ok(())
    }

    fn name(&self) -> &str {
        "weaviate"
    }
}
