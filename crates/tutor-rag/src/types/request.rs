//! Request DTOs for the HTTP surface

use serde::Deserialize;

/// POST /session/load - upload and ingest a document
#[derive(Debug, Deserialize)]
pub struct LoadSessionRequest {
    /// Owning user (also the session key)
    pub user_id: String,
    /// Document name, used as the chunk source identifier
    pub document_name: String,
    /// Base64-encoded file contents
    pub document_base64: String,
}

/// POST /chat - grounded chat prompt
#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub user_id: String,
    pub message: String,
    /// Restrict retrieval to one document when set
    #[serde(default)]
    pub document_name: Option<String>,
}

/// POST /summary, /flashcard, /quiz - whole-document study task
#[derive(Debug, Deserialize)]
pub struct StudyTaskRequest {
    pub user_id: String,
    pub document_name: String,
}
