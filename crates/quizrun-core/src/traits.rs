//! Trait definitions for the quiz backend and the credential source.
//!
//! `QuizService` is implemented by `quizrun-client` over HTTP; tests use the
//! mock in that crate or small in-module fakes.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::model::{AnswerResponse, QuestionRecord, QuizDraft, QuizId, QuizSummary};

// ---------------------------------------------------------------------------
// Quiz backend
// ---------------------------------------------------------------------------

/// Remote quiz backend.
#[async_trait]
pub trait QuizService: Send + Sync {
    /// Fetch the ordered question set of a quiz.
    async fn get_question_set(&self, quiz_id: QuizId) -> Result<Vec<QuestionRecord>, ServiceError>;

    /// Create a quiz by drawing `count` questions from `category`.
    async fn create_quiz(
        &self,
        category: &str,
        count: u32,
        title: &str,
    ) -> Result<QuizId, ServiceError>;

    /// Create a quiz from an explicit list of questions.
    async fn create_full_quiz(&self, draft: &QuizDraft) -> Result<QuizId, ServiceError>;

    /// Submit answers. Returns the raw, unparsed score body.
    async fn submit_quiz(
        &self,
        quiz_id: QuizId,
        responses: &[AnswerResponse],
    ) -> Result<String, ServiceError>;

    /// List available quizzes.
    async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, ServiceError>;

    /// List question categories.
    async fn list_categories(&self) -> Result<Vec<String>, ServiceError>;
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Source of the current user's credential and role.
pub trait CredentialProvider: Send + Sync {
    /// Whether a usable credential is present.
    fn is_authenticated(&self) -> bool;

    /// Role of the current user.
    fn current_role(&self) -> Role;

    /// Bearer token to attach to backend requests.
    fn bearer_token(&self) -> Option<String>;

    fn is_admin(&self) -> bool {
        self.current_role() == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_display_and_parse() {
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" student ".parse::<Role>().unwrap(), Role::Student);
        assert!("moderator".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::Student);
    }

    struct Fixed(Role);

    impl CredentialProvider for Fixed {
        fn is_authenticated(&self) -> bool {
            true
        }
        fn current_role(&self) -> Role {
            self.0
        }
        fn bearer_token(&self) -> Option<String> {
            None
        }
    }

    #[test]
    fn is_admin_follows_role() {
        assert!(Fixed(Role::Admin).is_admin());
        assert!(!Fixed(Role::Student).is_admin());
    }
}
