// src/store.rs

use chrono::Utc;
use sqlx::{SqlitePool, types::Json};
use uuid::Uuid;

use crate::{
    error::AppError,
    grading::GradingOutcome,
    models::{
        quiz::{Question, Quiz, QuizSummary},
        result::{ResultRecord, ResultSummary},
        user::User,
    },
};

/// Inserts a new quiz and returns the stored row.
///
/// The id is a random UUID token; timestamp-derived ids collide under rapid
/// successive creation. Per the creation-time convention, the stored title
/// carries a human-readable timestamp prefix while `created_at` stays a
/// separate field.
pub async fn create_quiz(
    pool: &SqlitePool,
    title: &str,
    questions: Vec<Question>,
) -> Result<Quiz, AppError> {
    let created_at = Utc::now();
    let quiz = Quiz {
        id: Uuid::new_v4().to_string(),
        title: format!("[{}] {}", created_at.format("%Y-%m-%d %H:%M"), title),
        questions: Json(questions),
        created_at,
    };

    sqlx::query("INSERT INTO quizzes (id, title, questions, created_at) VALUES (?, ?, ?, ?)")
        .bind(&quiz.id)
        .bind(&quiz.title)
        .bind(&quiz.questions)
        .bind(quiz.created_at)
        .execute(pool)
        .await?;

    Ok(quiz)
}

/// Fetches a quiz by id, including its question bodies.
pub async fn get_quiz(pool: &SqlitePool, id: &str) -> Result<Quiz, AppError> {
    sqlx::query_as::<_, Quiz>("SELECT id, title, questions, created_at FROM quizzes WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))
}

/// Lists quiz summaries with per-quiz attempt count and average success,
/// newest first. Never loads question bodies.
pub async fn list_quizzes(pool: &SqlitePool) -> Result<Vec<QuizSummary>, AppError> {
    let summaries = sqlx::query_as::<_, QuizSummary>(
        r#"
        SELECT
            q.id,
            q.title,
            q.created_at,
            COUNT(r.id) AS attempts,
            ROUND(AVG(r.percentage), 2) AS avg_success
        FROM quizzes q
        LEFT JOIN results r ON r.quiz_id = q.id
        GROUP BY q.id
        ORDER BY q.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(summaries)
}

/// Finds or creates the user row for a display name.
pub async fn get_or_create_user(pool: &SqlitePool, name: &str) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, created_at)
        VALUES (?, ?)
        ON CONFLICT(name) DO UPDATE SET name = excluded.name
        RETURNING id, name, created_at
        "#,
    )
    .bind(name)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Persists a grading outcome as a new result row and returns it.
pub async fn save_result(
    pool: &SqlitePool,
    quiz_id: &str,
    user_id: i64,
    user_name: &str,
    outcome: GradingOutcome,
) -> Result<ResultRecord, AppError> {
    let record = sqlx::query_as::<_, ResultRecord>(
        r#"
        INSERT INTO results (quiz_id, user_id, user_name, score, total, percentage, details, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id, quiz_id, user_id, user_name, score, total, percentage, details, created_at
        "#,
    )
    .bind(quiz_id)
    .bind(user_id)
    .bind(user_name)
    .bind(outcome.score)
    .bind(outcome.total)
    .bind(outcome.percentage)
    .bind(Json(outcome.details))
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(record)
}

/// Lists result summaries for a quiz, oldest first.
pub async fn results_by_quiz(
    pool: &SqlitePool,
    quiz_id: &str,
) -> Result<Vec<ResultSummary>, AppError> {
    let results = sqlx::query_as::<_, ResultSummary>(
        r#"
        SELECT id, user_name, score, total, percentage, created_at
        FROM results
        WHERE quiz_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await?;

    Ok(results)
}

/// Fetches a single stored result with its full detail trail.
pub async fn get_result(pool: &SqlitePool, id: i64) -> Result<ResultRecord, AppError> {
    sqlx::query_as::<_, ResultRecord>(
        r#"
        SELECT id, quiz_id, user_id, user_name, score, total, percentage, details, created_at
        FROM results
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Result not found".to_string()))
}
