// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

use crate::grading;

/// The correct-answer specification of a question.
///
/// Quiz-authoring tools emit either a 0-based index into `options` or the
/// literal text of the correct option. Both forms are accepted on the wire
/// and normalized to an index by the grading module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectSpec {
    Index(i64),
    Text(String),
}

/// A single multiple-choice question.
///
/// Wire shape: `{ "question": string, "options": [string, ...], "correct": int | string }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,

    /// Ordered list of options (e.g., ["Option A", "Option B"]).
    pub options: Vec<String>,

    pub correct: CorrectSpec,
}

/// Represents the 'quizzes' table in the database.
/// Questions are stored as a JSON array column; order is significant since
/// submissions reference questions by position.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub questions: Json<Vec<Question>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Summary projection for listing quizzes (never includes question bodies).
#[derive(Debug, Serialize, FromRow)]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Number of stored results for this quiz.
    pub attempts: i64,
    /// Average result percentage, absent until the first submission.
    pub avg_success: Option<f64>,
}

/// DTO for creating a new quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(custom(function = validate_questions))]
    pub questions: Vec<Question>,
}

fn validate_questions(questions: &[Question]) -> Result<(), validator::ValidationError> {
    for q in questions {
        if q.text.is_empty() {
            return Err(validator::ValidationError::new("question_text_empty"));
        }
        if q.options.is_empty() {
            return Err(validator::ValidationError::new("options_cannot_be_empty"));
        }
        if grading::resolve_correct(&q.correct, &q.options).index.is_none() {
            return Err(validator::ValidationError::new(
                "correct_answer_not_in_options",
            ));
        }
    }
    Ok(())
}
