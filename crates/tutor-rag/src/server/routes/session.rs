//! Session creation and document ingestion

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::storage::documents;
use crate::types::request::LoadSessionRequest;
use crate::types::response::MessageResponse;

/// POST /session/load - save the upload, get or create the user's session,
/// and index the document
pub async fn load_session(
    State(state): State<AppState>,
    Json(request): Json<LoadSessionRequest>,
) -> Result<Json<MessageResponse>> {
    tracing::info!(
        user_id = %request.user_id,
        document = %request.document_name,
        "loading document"
    );

    let path = documents::save_document(
        &state.config().documents.dir,
        &request.document_name,
        &request.document_base64,
    )?;

    let session = state.get_or_create_session(&request.user_id).await?;
    let message = session
        .load_document(&request.document_name, &path, &request.user_id)
        .await?;

    Ok(Json(MessageResponse { message }))
}
