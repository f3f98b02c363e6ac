//! Quiz session state and navigation policy.
//!
//! A [`QuizSession`] owns one attempt at a question set. Traversal is strictly
//! sequential: `advance` is gated on an answer being recorded for the current
//! position, and advancing past the last question hands the session over to
//! the submission pipeline. Rejected transitions leave the session unchanged.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::encoder::encode_responses;
use crate::error::{ServiceError, SessionError};
use crate::model::{AnswerResponse, QuestionRecord, QuizId};
use crate::scoring::QuizResult;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// The quiz has no questions. Terminal, and not an error.
    Empty,
    /// A question is being presented.
    Active,
    /// The last question was answered; answers are waiting to be scored.
    AwaitingSubmission,
    /// The backend scored the attempt.
    Completed(QuizResult),
    /// Loading or submission failed. Retrying means opening the quiz again.
    Failed(ServiceError),
}

/// Outcome of a successful [`QuizSession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the given position.
    Moved(usize),
    /// The last question was answered; the session awaits submission.
    SubmissionReady,
}

/// One user's attempt at a quiz.
#[derive(Debug, Clone)]
pub struct QuizSession {
    attempt_id: Uuid,
    quiz_id: QuizId,
    questions: Vec<QuestionRecord>,
    position: usize,
    answers: BTreeMap<usize, usize>,
    submitting: bool,
    phase: Phase,
}

impl QuizSession {
    /// Start a session over a loaded question set.
    ///
    /// An empty set yields a session in [`Phase::Empty`].
    pub fn new(quiz_id: QuizId, questions: Vec<QuestionRecord>) -> Self {
        let phase = if questions.is_empty() {
            Phase::Empty
        } else {
            Phase::Active
        };
        Self {
            attempt_id: Uuid::new_v4(),
            quiz_id,
            questions,
            position: 0,
            answers: BTreeMap::new(),
            submitting: false,
            phase,
        }
    }

    /// A session whose question set could not be loaded.
    pub fn failed(quiz_id: QuizId, error: ServiceError) -> Self {
        let mut session = Self::new(quiz_id, Vec::new());
        session.phase = Phase::Failed(error);
        session
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    /// Number of questions, N.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Zero-based index of the current question.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Recorded answers, keyed by position, valued by option slot.
    pub fn answers(&self) -> &BTreeMap<usize, usize> {
        &self.answers
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// The question at the current position, if the session has one.
    pub fn current_question(&self) -> Option<&QuestionRecord> {
        self.questions.get(self.position)
    }

    /// Slot recorded for the current position.
    pub fn selected_answer(&self) -> Option<usize> {
        self.answers.get(&self.position).copied()
    }

    pub fn is_last_question(&self) -> bool {
        !self.questions.is_empty() && self.position == self.questions.len() - 1
    }

    /// Whether `advance` would be accepted.
    pub fn can_advance(&self) -> bool {
        self.phase == Phase::Active && !self.submitting && self.selected_answer().is_some()
    }

    /// Whether `retreat` would be accepted.
    pub fn can_retreat(&self) -> bool {
        self.phase == Phase::Active && self.position > 0
    }

    /// `round((position + 1) / N * 100)`, or `None` for an empty session.
    pub fn progress_percent(&self) -> Option<u32> {
        crate::scoring::percentage(self.position as u32 + 1, self.questions.len() as u32)
    }

    /// "Question p of N".
    pub fn progress_label(&self) -> String {
        format!("Question {} of {}", self.position + 1, self.questions.len())
    }

    /// Record `slot` as the answer for the current position. Last write wins.
    pub fn select_answer(&mut self, slot: usize) -> Result<(), SessionError> {
        if self.phase != Phase::Active {
            return Err(SessionError::NotActive);
        }
        let selectable = self
            .current_question()
            .is_some_and(|question| question.is_selectable(slot));
        if !selectable {
            return Err(SessionError::InvalidOption(slot));
        }
        self.answers.insert(self.position, slot);
        tracing::debug!(position = self.position, slot, "answer recorded");
        Ok(())
    }

    /// Move forward, or hand over to submission from the last question.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        match self.phase {
            Phase::Active => {}
            Phase::AwaitingSubmission => return Err(SessionError::SubmissionInProgress),
            _ => return Err(SessionError::NotActive),
        }
        if self.selected_answer().is_none() {
            return Err(SessionError::NoAnswerRecorded);
        }

        if self.is_last_question() {
            self.phase = Phase::AwaitingSubmission;
            tracing::debug!(attempt = %self.attempt_id, "last question answered");
            Ok(Advance::SubmissionReady)
        } else {
            self.position += 1;
            tracing::debug!(position = self.position, "advanced");
            Ok(Advance::Moved(self.position))
        }
    }

    /// Move back one question. Recorded answers are kept.
    pub fn retreat(&mut self) -> Result<usize, SessionError> {
        if self.phase != Phase::Active {
            return Err(SessionError::NotActive);
        }
        if self.position == 0 {
            return Err(SessionError::AtFirstQuestion);
        }
        self.position -= 1;
        tracing::debug!(position = self.position, "retreated");
        Ok(self.position)
    }

    /// Claim the single submission of this session and build its payload.
    ///
    /// The payload has exactly one entry per question, in question order.
    pub(crate) fn begin_submission(&mut self) -> Result<Vec<AnswerResponse>, SessionError> {
        if self.submitting {
            return Err(SessionError::SubmissionInProgress);
        }
        if self.phase != Phase::AwaitingSubmission {
            return Err(SessionError::NotActive);
        }
        self.submitting = true;
        Ok(encode_responses(&self.questions, &self.answers))
    }

    pub(crate) fn complete(&mut self, score: u32) -> QuizResult {
        let result = QuizResult::new(score, self.questions.len() as u32);
        self.submitting = false;
        self.phase = Phase::Completed(result);
        result
    }

    pub(crate) fn fail(&mut self, error: ServiceError) {
        self.submitting = false;
        self.phase = Phase::Failed(error);
    }
}
