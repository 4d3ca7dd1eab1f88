// src/grading.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::quiz::{CorrectSpec, Question};

/// A raw answer value before normalization against an options list.
#[derive(Debug, Clone, Copy)]
pub enum RawAnswer<'a> {
    Int(i64),
    Str(&'a str),
    Missing,
}

impl<'a> From<&'a Value> for RawAnswer<'a> {
    fn from(value: &'a Value) -> Self {
        if let Some(n) = value.as_i64() {
            RawAnswer::Int(n)
        } else if let Some(s) = value.as_str() {
            RawAnswer::Str(s)
        } else {
            // Booleans, floats, arrays etc. degrade to ungraded.
            RawAnswer::Missing
        }
    }
}

impl<'a> From<&'a CorrectSpec> for RawAnswer<'a> {
    fn from(spec: &'a CorrectSpec) -> Self {
        match spec {
            CorrectSpec::Index(n) => RawAnswer::Int(*n),
            CorrectSpec::Text(s) => RawAnswer::Str(s),
        }
    }
}

/// An answer normalized against a question's options.
///
/// `index` is present when the value resolved to a position in the options
/// list. `text` without `index` means a free-text value kept for the
/// text-equality fallback. Neither present means unresolvable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedAnswer {
    pub index: Option<usize>,
    pub text: Option<String>,
}

/// Normalizes a raw answer value against an options list.
///
/// The single normalization point for both sides of the comparison. An
/// in-range integer becomes an index plus its option text; a string matching
/// an option becomes that option's index plus text. With `keep_free_text`, a
/// string absent from the options is kept verbatim (index-less) so it can
/// still be compared by text; without it, such a string is unresolvable.
pub fn resolve_answer(raw: RawAnswer<'_>, options: &[String], keep_free_text: bool) -> ResolvedAnswer {
    match raw {
        RawAnswer::Int(n) => {
            if n >= 0 && (n as usize) < options.len() {
                let idx = n as usize;
                ResolvedAnswer {
                    index: Some(idx),
                    text: Some(options[idx].clone()),
                }
            } else {
                ResolvedAnswer::default()
            }
        }
        RawAnswer::Str(s) => match options.iter().position(|opt| opt == s) {
            Some(idx) => ResolvedAnswer {
                index: Some(idx),
                text: Some(options[idx].clone()),
            },
            None if keep_free_text => ResolvedAnswer {
                index: None,
                text: Some(s.to_string()),
            },
            None => ResolvedAnswer::default(),
        },
        RawAnswer::Missing => ResolvedAnswer::default(),
    }
}

/// Normalizes a question's correct-answer spec. An unresolvable spec (index
/// out of range, text not among the options) yields an empty resolution and
/// the question can never grade as correct.
pub fn resolve_correct(spec: &CorrectSpec, options: &[String]) -> ResolvedAnswer {
    resolve_answer(RawAnswer::from(spec), options, false)
}

/// Per-question grading record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerDetail {
    pub index: usize,
    pub question: String,
    pub options: Vec<String>,
    pub correct_text: Option<String>,
    pub correct_index: Option<usize>,
    pub user_text: Option<String>,
    pub user_index: Option<usize>,
    pub is_correct: bool,
}

/// Outcome of grading one submission against one quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingOutcome {
    pub score: i64,
    pub total: i64,
    pub percentage: f64,
    pub details: Vec<AnswerDetail>,
}

/// Grades a raw answer submission against a quiz's question list.
///
/// Pure function: deterministic, no side effects, no storage access. Answers
/// are looked up by the string form of the question index. Comparison is
/// index-first; text equality is the fallback when either side lacks an
/// index. Malformed questions or answer values grade as incorrect rather
/// than aborting the submission.
pub fn grade(questions: &[Question], answers: &HashMap<String, Value>) -> GradingOutcome {
    let mut details = Vec::with_capacity(questions.len());
    let mut score: i64 = 0;

    for (i, question) in questions.iter().enumerate() {
        let correct = resolve_correct(&question.correct, &question.options);
        let raw = answers
            .get(&i.to_string())
            .map_or(RawAnswer::Missing, RawAnswer::from);
        let user = resolve_answer(raw, &question.options, true);

        let is_correct = match (correct.index, user.index) {
            (Some(c), Some(u)) => c == u,
            _ => match (&correct.text, &user.text) {
                (Some(c), Some(u)) => c == u,
                _ => false,
            },
        };

        if is_correct {
            score += 1;
        }

        details.push(AnswerDetail {
            index: i,
            question: question.text.clone(),
            options: question.options.clone(),
            correct_text: correct.text,
            correct_index: correct.index,
            user_text: user.text,
            user_index: user.index,
            is_correct,
        });
    }

    let total = questions.len() as i64;
    let percentage = if total > 0 {
        round2(score as f64 / total as f64 * 100.0)
    } else {
        0.0
    };

    GradingOutcome {
        score,
        total,
        percentage,
        details,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
