//! Whole-document study artifact endpoints

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::request::StudyTaskRequest;
use crate::types::response::SummaryResponse;
use crate::types::{FlashcardResponse, QuizResponse};

/// POST /summary - summarize a document as Markdown
pub async fn summary(
    State(state): State<AppState>,
    Json(request): Json<StudyTaskRequest>,
) -> Result<Json<SummaryResponse>> {
    tracing::info!(
        user_id = %request.user_id,
        document = %request.document_name,
        "generating summary"
    );

    let session = state.session(&request.user_id)?;
    let summary = session
        .summarize(&request.document_name, &request.user_id)
        .await?;

    Ok(Json(SummaryResponse { summary }))
}

/// POST /flashcard - generate flashcards for a document
pub async fn flashcards(
    State(state): State<AppState>,
    Json(request): Json<StudyTaskRequest>,
) -> Result<Json<FlashcardResponse>> {
    tracing::info!(
        user_id = %request.user_id,
        document = %request.document_name,
        "generating flashcards"
    );

    let session = state.session(&request.user_id)?;
    let flashcards = session
        .generate_flashcards(&request.document_name, &request.user_id)
        .await?;

    tracing::info!(
        user_id = %request.user_id,
        count = flashcards.len(),
        "flashcards generated"
    );
    Ok(Json(FlashcardResponse { flashcards }))
}

/// POST /quiz - generate a quiz for a document
pub async fn quiz(
    State(state): State<AppState>,
    Json(request): Json<StudyTaskRequest>,
) -> Result<Json<QuizResponse>> {
    tracing::info!(
        user_id = %request.user_id,
        document = %request.document_name,
        "generating quiz"
    );

    let session = state.session(&request.user_id)?;
    let questions = session
        .generate_quiz(&request.document_name, &request.user_id)
        .await?;

    tracing::info!(
        user_id = %request.user_id,
        count = questions.len(),
        "quiz generated"
    );
    Ok(Json(QuizResponse { questions }))
}
