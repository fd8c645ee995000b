//! API routes for the tutoring server

pub mod chat;
pub mod session;
pub mod study;

use axum::{
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Session + ingestion
        .route("/session/load", post(session::load_session))
        // Grounded chat
        .route("/chat", post(chat::chat))
        // Whole-document study artifacts
        .route("/summary", post(study::summary))
        .route("/flashcard", post(study::flashcards))
        .route("/quiz", post(study::quiz))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "tutor-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document-grounded tutoring backend",
        "endpoints": {
            "POST /session/load": "Upload a document and index it for a user",
            "POST /chat": "Ask a question grounded in the user's documents",
            "POST /summary": "Summarize a document as Markdown",
            "POST /flashcard": "Generate flashcards for a document",
            "POST /quiz": "Generate a quiz for a document",
        },
    }))
}
