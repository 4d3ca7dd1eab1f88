// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{error::AppError, models::quiz::CreateQuizRequest, store};

/// Creates a new quiz.
///
/// Deserialized manually from a JSON value so that a missing title or a
/// malformed question list surfaces as a 400 with a descriptive message.
/// Returns 201 Created with the stored quiz id.
pub async fn create_quiz(
    State(pool): State<SqlitePool>,
    Json(payload): Json<serde_json::Value>,
) -> Result<impl IntoResponse, AppError> {
    let req: CreateQuizRequest = serde_json::from_value(payload)?;

    if let Err(validation_errors) = req.validate() {
        return Err(AppError::Validation(validation_errors.to_string()));
    }

    let quiz = store::create_quiz(&pool, &req.title, req.questions).await?;

    tracing::info!("Created quiz {} ({} questions)", quiz.id, quiz.questions.len());

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": quiz.id })),
    ))
}

/// Lists all quizzes as summaries (id, title, created_at, attempt stats).
pub async fn list_quizzes(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let summaries = store::list_quizzes(&pool).await?;
    Ok(Json(summaries))
}

/// Retrieves a single quiz by id, including its questions.
pub async fn get_quiz(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = store::get_quiz(&pool, &id).await?;
    Ok(Json(quiz))
}
