//! HTTP+JSON implementation of the quiz backend contract.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quizrun_core::error::ServiceError;
use quizrun_core::model::{
    parse_created_quiz_id, AnswerResponse, QuestionRecord, QuizDraft, QuizId, QuizSummary,
};
use quizrun_core::traits::{CredentialProvider, QuizService, Role};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Quiz backend reached over HTTP.
pub struct HttpQuizService {
    base_url: String,
    timeout_secs: u64,
    credentials: Arc<dyn CredentialProvider>,
    client: reqwest::Client,
}

impl HttpQuizService {
    pub fn new(
        base_url: Option<String>,
        timeout_secs: u64,
        credentials: Arc<dyn CredentialProvider>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            credentials,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, endpoint: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, endpoint))
            .header("content-type", "application/json");
        match self.credentials.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> ServiceError {
        if e.is_timeout() {
            ServiceError::Timeout(self.timeout_secs)
        } else {
            ServiceError::FetchError {
                status: 0,
                message: e.to_string(),
            }
        }
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<String, ServiceError> {
        let response = builder.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::FetchError { status, message });
        }

        response.text().await.map_err(|e| self.transport_error(e))
    }

    /// Exchange a username and password for a bearer token.
    ///
    /// A missing role means the backend default, `Student`.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginGrant, ServiceError> {
        let builder = self
            .request(Method::POST, "/auth/login")
            .json(&LoginRequest { username, password });
        let body = self.send(builder).await?;

        let response: LoginResponse = serde_json::from_str(&body)
            .map_err(|e| ServiceError::InvalidResponseFormat(format!("bad login response: {e}")))?;
        if response.token.trim().is_empty() {
            return Err(ServiceError::InvalidResponseFormat(
                "login response has no token".into(),
            ));
        }
        let role = match response.role.as_deref() {
            Some(role) => Role::from_str(role).map_err(ServiceError::InvalidResponseFormat)?,
            None => Role::default(),
        };
        tracing::info!(%role, "logged in");
        Ok(LoginGrant {
            token: response.token,
            role,
        })
    }

    async fn get_json(&self, endpoint: &str) -> Result<serde_json::Value, ServiceError> {
        let body = self.send(self.request(Method::GET, endpoint)).await?;
        serde_json::from_str(&body)
            .map_err(|e| ServiceError::InvalidResponseFormat(format!("{endpoint}: {e}")))
    }
}

/// Token and role granted by a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub token: String,
    pub role: Role,
}

impl std::fmt::Debug for LoginGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginGrant")
            .field("token", &"***")
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default)]
    role: Option<String>,
}

/// Listing entry as the backend may send it: either with a precomputed count
/// or with the full question list.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuizListing {
    id: QuizId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    question_count: Option<usize>,
    #[serde(default)]
    questions: Option<Vec<serde_json::Value>>,
}

impl From<QuizListing> for QuizSummary {
    fn from(listing: QuizListing) -> Self {
        let question_count = listing
            .question_count
            .or_else(|| listing.questions.as_ref().map(Vec::len))
            .unwrap_or(0);
        QuizSummary {
            id: listing.id,
            title: listing.title,
            question_count,
        }
    }
}

#[async_trait]
impl QuizService for HttpQuizService {
    #[instrument(skip(self))]
    async fn get_question_set(&self, quiz_id: QuizId) -> Result<Vec<QuestionRecord>, ServiceError> {
        let value = self.get_json(&format!("/quiz/get/{quiz_id}")).await?;
        if !value.is_array() {
            return Err(ServiceError::InvalidResponseFormat(
                "expected a list of questions".into(),
            ));
        }
        let questions: Vec<QuestionRecord> = serde_json::from_value(value)
            .map_err(|e| ServiceError::InvalidResponseFormat(format!("bad question record: {e}")))?;
        tracing::debug!(count = questions.len(), "question set loaded");
        Ok(questions)
    }

    #[instrument(skip(self))]
    async fn create_quiz(
        &self,
        category: &str,
        count: u32,
        title: &str,
    ) -> Result<QuizId, ServiceError> {
        let count = count.to_string();
        let builder = self.request(Method::POST, "/quiz/create").query(&[
            ("category", category),
            ("numQ", count.as_str()),
            ("title", title),
        ]);
        let body = self.send(builder).await?;
        parse_created_quiz_id(&body)
    }

    #[instrument(skip(self, draft), fields(title = %draft.title))]
    async fn create_full_quiz(&self, draft: &QuizDraft) -> Result<QuizId, ServiceError> {
        let builder = self.request(Method::POST, "/quiz/create-full").json(draft);
        let body = self.send(builder).await?;
        parse_created_quiz_id(&body)
    }

    #[instrument(skip(self, responses), fields(responses = responses.len()))]
    async fn submit_quiz(
        &self,
        quiz_id: QuizId,
        responses: &[AnswerResponse],
    ) -> Result<String, ServiceError> {
        let builder = self
            .request(Method::POST, &format!("/quiz/submit/{quiz_id}"))
            .json(responses);
        self.send(builder).await
    }

    #[instrument(skip(self))]
    async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, ServiceError> {
        let value = self.get_json("/quiz/list").await?;
        let listings: Vec<QuizListing> = serde_json::from_value(value)
            .map_err(|e| ServiceError::InvalidResponseFormat(format!("bad quiz list: {e}")))?;
        Ok(listings.into_iter().map(QuizSummary::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<String>, ServiceError> {
        let value = self.get_json("/question/categories").await?;
        serde_json::from_value(value)
            .map_err(|e| ServiceError::InvalidResponseFormat(format!("bad category list: {e}")))
    }
}
