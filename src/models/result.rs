// src/models/result.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

use crate::grading::AnswerDetail;

/// Represents the 'results' table in the database.
/// One row per graded submission; immutable after insert.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: i64,
    pub quiz_id: String,
    pub user_id: i64,
    pub user_name: String,
    pub score: i64,
    pub total: i64,
    pub percentage: f64,
    pub details: Json<Vec<AnswerDetail>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Summary projection for listing a quiz's results (no detail trail).
#[derive(Debug, Serialize, FromRow)]
pub struct ResultSummary {
    pub id: i64,
    pub user_name: String,
    pub score: i64,
    pub total: i64,
    pub percentage: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for submitting answers to a quiz.
///
/// `answers` maps the question index (string key, e.g. "0") to a raw answer
/// value: an integer index into that question's options or a literal option
/// string. Individual malformed values degrade to incorrect during grading.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub answers: HashMap<String, serde_json::Value>,
    pub user_name: Option<String>,
}

impl SubmitRequest {
    /// Display name for the submitter, defaulting when absent or blank.
    pub fn display_name(&self) -> String {
        match self.user_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => "Anonym".to_string(),
        }
    }
}
