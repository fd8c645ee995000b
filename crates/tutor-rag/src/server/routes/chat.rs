//! Grounded chat endpoint

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::request::PromptRequest;
use crate::types::response::AnswerResponse;

/// POST /chat - answer a prompt from retrieved context
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<AnswerResponse>> {
    tracing::info!(user_id = %request.user_id, "processing chat request");

    let session = state.session(&request.user_id)?;
    let response = session
        .prompt(
            &request.message,
            &request.user_id,
            request.document_name.as_deref(),
        )
        .await?;

    Ok(Json(AnswerResponse { response }))
}
