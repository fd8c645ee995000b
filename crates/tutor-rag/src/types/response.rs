//! Response DTOs for the HTTP surface

use serde::Serialize;

/// Generic confirmation message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Chat answer
#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub response: String,
}

/// Markdown summary
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}
