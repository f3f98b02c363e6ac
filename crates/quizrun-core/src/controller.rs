//! Quiz session controller.
//!
//! Drives a [`QuizSession`] against a [`QuizService`]: loads question sets,
//! runs the single submission of a session, and turns backend failures into
//! session state instead of propagating them.

use std::sync::Arc;

use tracing::instrument;

use crate::error::{ServiceError, SessionError};
use crate::model::{QuestionRecord, QuizDraft, QuizId, QuizSummary};
use crate::scoring::normalize_score;
use crate::session::{Advance, Phase, QuizSession};
use crate::traits::{CredentialProvider, QuizService};

/// Number of questions drawn when starting a quiz from a category.
pub const DEFAULT_CATEGORY_QUESTION_COUNT: u32 = 10;

/// Coordinates the quiz backend, the credential source and sessions.
pub struct QuizSessionController {
    service: Arc<dyn QuizService>,
    credentials: Arc<dyn CredentialProvider>,
}

impl QuizSessionController {
    pub fn new(service: Arc<dyn QuizService>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            service,
            credentials,
        }
    }

    fn require_auth(&self) -> Result<(), ServiceError> {
        if self.credentials.is_authenticated() {
            Ok(())
        } else {
            Err(ServiceError::NotAuthenticated)
        }
    }

    /// Fetch the ordered question set for `quiz_id`.
    ///
    /// Fails with `NotAuthenticated` before any request is made when no
    /// credential is present.
    #[instrument(skip(self))]
    pub async fn load_question_set(
        &self,
        quiz_id: QuizId,
    ) -> Result<Vec<QuestionRecord>, ServiceError> {
        self.require_auth()?;
        self.service.get_question_set(quiz_id).await
    }

    /// Open a session for `quiz_id`.
    ///
    /// Never fails: a load error yields a session in [`Phase::Failed`] and an
    /// empty quiz yields [`Phase::Empty`].
    pub async fn open(&self, quiz_id: QuizId) -> QuizSession {
        match self.load_question_set(quiz_id).await {
            Ok(questions) => {
                let session = QuizSession::new(quiz_id, questions);
                tracing::info!(
                    quiz_id,
                    attempt = %session.attempt_id(),
                    questions = session.len(),
                    "session opened"
                );
                session
            }
            Err(e) => {
                tracing::error!("failed to load quiz {quiz_id}: {e}");
                QuizSession::failed(quiz_id, e)
            }
        }
    }

    /// Create a quiz for `category` and open it.
    ///
    /// The quiz is titled "<category> Quiz". Creation errors are returned;
    /// load errors end up in the session as with [`Self::open`].
    #[instrument(skip(self))]
    pub async fn start_category_quiz(
        &self,
        category: &str,
        count: u32,
    ) -> Result<QuizSession, ServiceError> {
        self.require_auth()?;
        let title = format!("{category} Quiz");
        let quiz_id = self.service.create_quiz(category, count, &title).await?;
        tracing::info!(quiz_id, "created quiz for category '{category}'");
        Ok(self.open(quiz_id).await)
    }

    /// Advance the session, submitting it when the last question is passed.
    pub async fn advance(&self, session: &mut QuizSession) -> Result<Advance, SessionError> {
        let step = session.advance()?;
        if step == Advance::SubmissionReady {
            self.submit(session).await?;
        }
        Ok(step)
    }

    /// Run the submission pipeline for a session awaiting submission.
    ///
    /// Returns the resulting phase: `Completed` on success, `Failed` when the
    /// backend call fails. A malformed score body counts as 0. A second call
    /// for the same session is rejected and sends nothing.
    #[instrument(
        skip(self, session),
        fields(quiz_id = session.quiz_id(), attempt = %session.attempt_id())
    )]
    pub async fn submit(&self, session: &mut QuizSession) -> Result<Phase, SessionError> {
        let responses = session.begin_submission().inspect_err(|e| {
            tracing::warn!("submission rejected: {e}");
        })?;

        if let Err(e) = self.require_auth() {
            session.fail(e);
            return Ok(session.phase().clone());
        }

        match self
            .service
            .submit_quiz(session.quiz_id(), &responses)
            .await
        {
            Ok(raw) => {
                let result = session.complete(normalize_score(&raw));
                tracing::info!(
                    score = result.score,
                    total = result.total_questions,
                    "quiz submitted"
                );
            }
            Err(e) => {
                tracing::error!("submission failed: {e}");
                session.fail(e);
            }
        }
        Ok(session.phase().clone())
    }

    pub async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, ServiceError> {
        self.require_auth()?;
        self.service.list_quizzes().await
    }

    pub async fn list_categories(&self) -> Result<Vec<String>, ServiceError> {
        self.require_auth()?;
        self.service.list_categories().await
    }

    /// Create a quiz from a full draft. Admin only.
    #[instrument(
        skip(self, draft),
        fields(title = %draft.title, questions = draft.questions.len())
    )]
    pub async fn create_full_quiz(&self, draft: &QuizDraft) -> Result<QuizId, ServiceError> {
        self.require_auth()?;
        if !self.credentials.is_admin() {
            return Err(ServiceError::NotAuthorized);
        }
        self.service.create_full_quiz(draft).await
    }
}
