//! Mock quiz backend for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use quizrun_core::error::ServiceError;
use quizrun_core::model::{AnswerResponse, QuestionRecord, QuizDraft, QuizId, QuizSummary};
use quizrun_core::traits::QuizService;

/// Title and questions of a stored quiz.
type StoredQuiz = (String, Vec<QuestionRecord>);

/// An in-memory quiz backend for exercising sessions without a server.
///
/// Quizzes are keyed by id; unknown ids answer with HTTP 404. Submissions are
/// recorded and answered with a fixed raw score body.
pub struct MockQuizService {
    /// Map of quiz id → question set.
    quizzes: Mutex<HashMap<QuizId, StoredQuiz>>,
    /// Categories returned by `list_categories`, with their question pools.
    categories: HashMap<String, Vec<QuestionRecord>>,
    /// Raw body returned from `submit_quiz`.
    score_body: String,
    /// Error returned from `submit_quiz` instead of the score, if set.
    submit_error: Option<ServiceError>,
    /// Next id handed out by the create operations.
    next_id: AtomicU32,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Submissions received, in order.
    submissions: Mutex<Vec<(QuizId, Vec<AnswerResponse>)>>,
}

impl MockQuizService {
    /// Create an empty mock whose submissions score `score_body`.
    pub fn new(score_body: &str) -> Self {
        Self {
            quizzes: Mutex::new(HashMap::new()),
            categories: HashMap::new(),
            score_body: score_body.to_string(),
            submit_error: None,
            next_id: AtomicU32::new(1000),
            call_count: AtomicU32::new(0),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Register a quiz.
    pub fn with_quiz(self, id: QuizId, title: &str, questions: Vec<QuestionRecord>) -> Self {
        self.lock_quizzes().insert(id, (title.to_string(), questions));
        self
    }

    /// Register a category and the questions a created quiz draws from.
    pub fn with_category(mut self, name: &str, pool: Vec<QuestionRecord>) -> Self {
        self.categories.insert(name.to_string(), pool);
        self
    }

    /// Make every submission fail with `error`.
    pub fn with_submit_error(mut self, error: ServiceError) -> Self {
        self.submit_error = Some(error);
        self
    }

    /// Get the number of calls made to this service.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get every submission received so far.
    pub fn submissions(&self) -> Vec<(QuizId, Vec<AnswerResponse>)> {
        self.submissions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn lock_quizzes(&self) -> MutexGuard<'_, HashMap<QuizId, StoredQuiz>> {
        self.quizzes.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record_call(&self) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
    }

    fn insert_quiz(&self, title: &str, questions: Vec<QuestionRecord>) -> QuizId {
        let id = QuizId::from(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock_quizzes().insert(id, (title.to_string(), questions));
        id
    }
}

fn not_found(what: &str) -> ServiceError {
    ServiceError::FetchError {
        status: 404,
        message: format!("{what} not found"),
    }
}

#[async_trait]
impl QuizService for MockQuizService {
    async fn get_question_set(&self, quiz_id: QuizId) -> Result<Vec<QuestionRecord>, ServiceError> {
        self.record_call();
        self.lock_quizzes()
            .get(&quiz_id)
            .map(|(_, questions)| questions.clone())
            .ok_or_else(|| not_found(&format!("quiz {quiz_id}")))
    }

    async fn create_quiz(
        &self,
        category: &str,
        count: u32,
        title: &str,
    ) -> Result<QuizId, ServiceError> {
        self.record_call();
        let pool = self
            .categories
            .get(category)
            .ok_or_else(|| not_found(&format!("category {category}")))?;
        let questions = pool.iter().take(count as usize).cloned().collect();
        Ok(self.insert_quiz(title, questions))
    }

    async fn create_full_quiz(&self, draft: &QuizDraft) -> Result<QuizId, ServiceError> {
        self.record_call();
        let base = i64::from(self.next_id.load(Ordering::Relaxed)) * 100;
        let questions = draft
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| QuestionRecord {
                id: base + i as i64,
                question_title: q.question_title.clone(),
                option1: Some(q.option1.clone()),
                option2: Some(q.option2.clone()),
                option3: Some(q.option3.clone()),
                option4: Some(q.option4.clone()),
            })
            .collect();
        Ok(self.insert_quiz(&draft.title, questions))
    }

    async fn submit_quiz(
        &self,
        quiz_id: QuizId,
        responses: &[AnswerResponse],
    ) -> Result<String, ServiceError> {
        self.record_call();
        self.submissions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((quiz_id, responses.to_vec()));
        match &self.submit_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.score_body.clone()),
        }
    }

    async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, ServiceError> {
        self.record_call();
        let mut quizzes: Vec<QuizSummary> = self
            .lock_quizzes()
            .iter()
            .map(|(id, (title, questions))| QuizSummary {
                id: *id,
                title: title.clone(),
                question_count: questions.len(),
            })
            .collect();
        quizzes.sort_by_key(|q| q.id);
        Ok(quizzes)
    }

    async fn list_categories(&self) -> Result<Vec<String>, ServiceError> {
        self.record_call();
        let mut names: Vec<String> = self.categories.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
