// src/handlers/result.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{error::AppError, grading, models::result::SubmitRequest, store};

/// Submits answers for a quiz, grades them, and persists the outcome.
///
/// The quiz must exist (404 otherwise) and `answers` must be a mapping (400
/// otherwise); both are checked before grading. Grading itself never fails:
/// malformed individual answers simply count as incorrect.
pub async fn submit_answers(
    State(pool): State<SqlitePool>,
    Path(quiz_id): Path<String>,
    Json(payload): Json<serde_json::Value>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = store::get_quiz(&pool, &quiz_id).await?;

    if payload.get("answers").is_none() {
        return Err(AppError::Validation("Field 'answers' is required".to_string()));
    }
    let req: SubmitRequest = serde_json::from_value(payload)?;

    let outcome = grading::grade(&quiz.questions, &req.answers);

    let user_name = req.display_name();
    let user = store::get_or_create_user(&pool, &user_name).await?;
    let record = store::save_result(&pool, &quiz.id, user.id, &user.name, outcome).await?;

    tracing::info!(
        "Graded submission for quiz {}: {}/{} by {}",
        record.quiz_id,
        record.score,
        record.total,
        record.user_name
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// Lists the stored results for a quiz (summaries, no detail trail).
pub async fn list_results(
    State(pool): State<SqlitePool>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    // Distinguishes an unknown quiz from a quiz with no submissions yet.
    store::get_quiz(&pool, &quiz_id).await?;

    let results = store::results_by_quiz(&pool, &quiz_id).await?;
    Ok(Json(results))
}

/// Retrieves a single stored result with its full per-question details.
pub async fn get_result(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let record = store::get_result(&pool, id).await?;
    Ok(Json(record))
}
