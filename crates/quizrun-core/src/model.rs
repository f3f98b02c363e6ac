//! Core data model types for quizrun.
//!
//! These mirror the JSON records exchanged with the quiz backend. Field names
//! follow the backend's camelCase wire format.

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Identifier of a quiz on the backend.
pub type QuizId = i64;

/// Identifier of a question on the backend.
pub type QuestionId = i64;

/// Number of positional option slots on every question.
pub const OPTION_SLOTS: usize = 4;

/// A single multiple-choice question as served by the backend.
///
/// Options are positional. A blank or missing option keeps its slot so that
/// slot indices stay stable for encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub question_title: String,
    #[serde(default)]
    pub option1: Option<String>,
    #[serde(default)]
    pub option2: Option<String>,
    #[serde(default)]
    pub option3: Option<String>,
    #[serde(default)]
    pub option4: Option<String>,
}

impl QuestionRecord {
    /// Raw text stored in option slot `slot` (0-based), if any.
    pub fn option(&self, slot: usize) -> Option<&str> {
        match slot {
            0 => self.option1.as_deref(),
            1 => self.option2.as_deref(),
            2 => self.option3.as_deref(),
            3 => self.option4.as_deref(),
            _ => None,
        }
    }

    /// Whether `slot` holds non-blank text a user may choose.
    pub fn is_selectable(&self, slot: usize) -> bool {
        self.option(slot).is_some_and(|text| !text.trim().is_empty())
    }

    /// Options to show to the user, blank slots filtered out.
    ///
    /// Each entry keeps the slot it came from; selections must record the
    /// slot, never the position in this list.
    pub fn presentable_options(&self) -> Vec<PresentedOption<'_>> {
        (0..OPTION_SLOTS)
            .filter_map(|slot| {
                self.option(slot)
                    .filter(|text| !text.trim().is_empty())
                    .map(|text| PresentedOption { slot, text })
            })
            .collect()
    }
}

/// An option as displayed, tied back to its slot in the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentedOption<'a> {
    pub slot: usize,
    pub text: &'a str,
}

/// One entry of the submission payload.
///
/// `response` is the literal option text, or [`crate::encoder::UNANSWERED`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub id: QuestionId,
    pub response: String,
}

/// Quiz listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: QuizId,
    pub title: String,
    pub question_count: usize,
}

/// Full payload for creating a quiz with explicit questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizDraft {
    pub title: String,
    #[serde(default)]
    pub questions: Vec<DraftQuestion>,
}

/// A question inside a [`QuizDraft`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftQuestion {
    pub question_title: String,
    #[serde(default)]
    pub option1: String,
    #[serde(default)]
    pub option2: String,
    #[serde(default)]
    pub option3: String,
    #[serde(default)]
    pub option4: String,
    /// Literal text of the correct option.
    pub right_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Extract the quiz id from a quiz-creation response body.
///
/// Accepts a JSON number, a JSON object with an `id` field, a JSON string, or
/// a plain-text body holding just the id.
pub fn parse_created_quiz_id(body: &str) -> Result<QuizId, ServiceError> {
    let trimmed = body.trim();
    let invalid = || ServiceError::InvalidResponseFormat(format!("no quiz id in {trimmed:?}"));

    let value = match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => value,
        Err(_) => return trimmed.parse::<QuizId>().map_err(|_| invalid()),
    };

    let id = match &value {
        serde_json::Value::Object(map) => map.get("id").cloned().ok_or_else(invalid)?,
        _ => value,
    };

    match id {
        serde_json::Value::Number(n) => n.as_i64().ok_or_else(invalid),
        serde_json::Value::String(s) => s.trim().parse::<QuizId>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
