//! Configuration for the tutoring backend

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Completion provider configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Embedding configuration
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Vector store configuration
    #[serde(default)]
    pub store: StoreConfig,
    /// Uploaded document handling
    #[serde(default)]
    pub documents: DocumentsConfig,
}

impl TutorConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("invalid config file '{}': {}", path.display(), e)))
    }

    /// Load from `TUTOR_CONFIG` (or `tutor-rag.toml` if present), falling
    /// back to defaults.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var("TUTOR_CONFIG") {
            return Self::from_file(Path::new(&path));
        }
        let default_path = Path::new("tutor-rag.toml");
        if default_path.exists() {
            return Self::from_file(default_path);
        }
        Ok(Self::default())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
        }
    }
}

/// Completion provider (OpenAI-compatible API) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,
    /// Model used for chat answers
    pub chat_model: String,
    /// Model used for summaries, flashcards, and quizzes
    pub generation_model: String,
    /// API key for the chat model (falls back to `TUTOR_CHAT_API_KEY`)
    #[serde(default)]
    pub chat_api_key: Option<String>,
    /// API key for the generation model (falls back to `TUTOR_GENERATION_API_KEY`)
    #[serde(default)]
    pub generation_api_key: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            chat_model: "llama3.3:latest".to_string(),
            generation_model: "llama3.3:latest".to_string(),
            chat_api_key: None,
            generation_api_key: None,
            temperature: 0.5,
            timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    /// Resolve the chat API key (config value, then environment)
    pub fn resolved_chat_api_key(&self) -> Option<String> {
        self.chat_api_key
            .clone()
            .or_else(|| std::env::var("TUTOR_CHAT_API_KEY").ok())
    }

    /// Resolve the generation API key (config value, then environment)
    pub fn resolved_generation_api_key(&self) -> Option<String> {
        self.generation_api_key
            .clone()
            .or_else(|| std::env::var("TUTOR_GENERATION_API_KEY").ok())
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions (768 for nomic-embed-text)
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
        }
    }
}

/// Text chunking configuration
///
/// Two chunk populations with different policies: small overlapping chunks
/// for similarity search, large overlapping chunks for whole-document
/// generation tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Retrieval chunk size in characters
    pub retrieval_chunk_size: usize,
    /// Overlap between retrieval chunks
    pub retrieval_chunk_overlap: usize,
    /// Generation chunk size in characters
    pub generation_chunk_size: usize,
    /// Overlap between generation chunks
    pub generation_chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            retrieval_chunk_size: 1000,
            retrieval_chunk_overlap: 200,
            generation_chunk_size: 4000,
            generation_chunk_overlap: 200,
        }
    }
}

/// Vector store (Weaviate) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the Weaviate instance
    pub base_url: String,
    /// Collection holding embedded retrieval chunks
    pub retrieval_collection: String,
    /// Collection holding plain-text generation chunks
    pub generation_collection: String,
    /// Maximum generation chunks fetched per document
    pub generation_fetch_limit: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            retrieval_collection: "RetrievalChunk".to_string(),
            generation_collection: "GenerationChunk".to_string(),
            generation_fetch_limit: 100,
            timeout_secs: 30,
        }
    }
}

/// Uploaded document handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    /// Directory where uploads are written before ingestion
    pub dir: PathBuf,
    /// Path component marking shared example documents, which are never
    /// deleted after load
    pub protected_namespace: String,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./documents"),
            protected_namespace: "example".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chunking() {
        let config = ChunkingConfig::default();
        assert_eq!(config.retrieval_chunk_size, 1000);
        assert_eq!(config.generation_chunk_size, 4000);
        assert_eq!(config.retrieval_chunk_overlap, 200);
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 9000
            enable_cors = false

            [store]
            base_url = "http://weaviate:8080"
            retrieval_collection = "RetrievalChunk"
            generation_collection = "GenerationChunk"
            generation_fetch_limit = 50
            timeout_secs = 10
        "#;
        let config: TutorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.store.generation_fetch_limit, 50);
        // Unspecified sections fall back to defaults
        assert_eq!(config.chunking.retrieval_chunk_size, 1000);
    }
}
