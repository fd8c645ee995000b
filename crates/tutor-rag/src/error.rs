//! Error types for the tutoring backend

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for tutoring operations
pub type Result<T> = std::result::Result<T, Error>;

/// Tutoring backend errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing file, chunks, or session
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unrecognized document extension
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Failed to extract text from a document
    #[error("Failed to parse document '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Vector store unreachable (fatal at construction)
    #[error("Store connection failed: {0}")]
    Connection(String),

    /// Vector store rejected a request
    #[error("Vector store error: {0}")]
    Store(String),

    /// Embedding/completion provider error, propagated without retry
    #[error("Upstream provider error: {0}")]
    Upstream(String),

    /// Model output did not conform to the requested structure
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// Document exceeds a supported bound
    #[error("Capacity exceeded: {0}")]
    Capacity(String),

    /// Operation invoked after cleanup
    #[error("Session closed: {0}")]
    SessionClosed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a vector store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Create an upstream provider error
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Prefix the error message with the failing unit of work
    /// (user/document), preserving the error kind.
    pub fn with_context(self, context: &str) -> Self {
        match self {
            Self::Config(m) => Self::Config(format!("{context}: {m}")),
            Self::NotFound(m) => Self::NotFound(format!("{context}: {m}")),
            Self::UnsupportedFormat(m) => Self::UnsupportedFormat(format!("{context}: {m}")),
            Self::FileParse { filename, message } => Self::FileParse {
                filename,
                message: format!("{context}: {message}"),
            },
            Self::Connection(m) => Self::Connection(format!("{context}: {m}")),
            Self::Store(m) => Self::Store(format!("{context}: {m}")),
            Self::Upstream(m) => Self::Upstream(format!("{context}: {m}")),
            Self::SchemaViolation(m) => Self::SchemaViolation(format!("{context}: {m}")),
            Self::Capacity(m) => Self::Capacity(format!("{context}: {m}")),
            Self::SessionClosed(m) => Self::SessionClosed(format!("{context}: {m}")),
            other => other,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            Error::UnsupportedFormat(msg) => (
                StatusCode::BAD_REQUEST,
                "unsupported_format",
                msg.clone(),
            ),
            Error::FileParse { filename, message } => (
                StatusCode::BAD_REQUEST,
                "parse_error",
                format!("Failed to parse '{}': {}", filename, message),
            ),
            Error::Connection(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "store_unavailable",
                msg.clone(),
            ),
            Error::Store(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg.clone()),
            Error::Upstream(msg) => (StatusCode::BAD_GATEWAY, "upstream_error", msg.clone()),
            Error::SchemaViolation(msg) => {
                (StatusCode::BAD_GATEWAY, "schema_violation", msg.clone())
            }
            Error::Capacity(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "capacity_exceeded",
                msg.clone(),
            ),
            Error::SessionClosed(msg) => (StatusCode::CONFLICT, "session_closed", msg.clone()),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_preserves_kind() {
        let err = Error::NotFound("no chunks".to_string()).with_context("document 'a.txt'");
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.to_string().contains("document 'a.txt'"));
        assert!(err.to_string().contains("no chunks"));
    }

    #[test]
    fn test_file_parse_display() {
        let err = Error::file_parse("notes.pdf", "bad xref table");
        assert_eq!(
            err.to_string(),
            "Failed to parse document 'notes.pdf': bad xref table"
        );
    }
}
