//! Answer encoding for the submission payload.
//!
//! The backend scores by comparing the submitted text with the stored correct
//! answer, so selections are sent as literal option text. Text is passed
//! through byte-for-byte: no trimming, no normalisation.

use std::collections::BTreeMap;

use crate::model::{AnswerResponse, QuestionRecord};

/// Sentinel sent for a question that has no recorded answer.
pub const UNANSWERED: &str = "-1";

/// Encode a single selection as the backend expects it.
///
/// Returns the literal text of the selected slot, or [`UNANSWERED`] when there
/// is no selection, the slot is outside `0..4`, or the slot holds no text.
pub fn encode_answer(question: &QuestionRecord, selected: Option<usize>) -> String {
    selected
        .and_then(|slot| question.option(slot))
        .unwrap_or(UNANSWERED)
        .to_string()
}

/// Encode every question, in order, against the recorded answers.
///
/// The result always has one entry per question. Positions that were never
/// visited or never answered carry the sentinel.
pub fn encode_responses(
    questions: &[QuestionRecord],
    answers: &BTreeMap<usize, usize>,
) -> Vec<AnswerResponse> {
    questions
        .iter()
        .enumerate()
        .map(|(position, question)| AnswerResponse {
            id: question.id,
            response: encode_answer(question, answers.get(&position).copied()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64, options: [&str; 4]) -> QuestionRecord {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        QuestionRecord {
            id,
            question_title: format!("Question {id}"),
            option1: opt(options[0]),
            option2: opt(options[1]),
            option3: opt(options[2]),
            option4: opt(options[3]),
        }
    }

    #[test]
    fn selected_slot_encodes_as_option_text() {
        let q = question(1, ["Paris", "London", "", ""]);
        assert_eq!(encode_answer(&q, Some(0)), "Paris");
        assert_eq!(encode_answer(&q, Some(1)), "London");
    }

    #[test]
    fn missing_selection_encodes_as_sentinel() {
        let q = question(1, ["Paris", "London", "", ""]);
        assert_eq!(encode_answer(&q, None), UNANSWERED);
        assert_eq!(encode_answer(&q, Some(4)), UNANSWERED);
        assert_eq!(encode_answer(&q, Some(usize::MAX)), UNANSWERED);
    }

    #[test]
    fn whitespace_is_preserved() {
        let q = question(1, ["  spaced answer ", "b", "c", "d"]);
        assert_eq!(encode_answer(&q, Some(0)), "  spaced answer ");
    }

    #[test]
    fn every_question_is_encoded_in_order() {
        let questions = vec![
            question(10, ["a", "b", "c", "d"]),
            question(20, ["e", "f", "g", "h"]),
            question(30, ["i", "j", "k", "l"]),
        ];
        let mut answers = BTreeMap::new();
        answers.insert(0, 3);
        answers.insert(2, 1);

        let encoded = encode_responses(&questions, &answers);
        assert_eq!(
            encoded,
            vec![
                AnswerResponse {
                    id: 10,
                    response: "d".into()
                },
                AnswerResponse {
                    id: 20,
                    response: UNANSWERED.into()
                },
                AnswerResponse {
                    id: 30,
                    response: "j".into()
                },
            ]
        );
    }

    #[test]
    fn empty_question_set_encodes_to_empty_payload() {
        assert!(encode_responses(&[], &BTreeMap::new()).is_empty());
    }
}
