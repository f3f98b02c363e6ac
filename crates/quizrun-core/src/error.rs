//! Error types for the quiz backend and the session state machine.
//!
//! `ServiceError` covers everything that can go wrong at the boundary with the
//! quiz backend. `SessionError` is returned when a session transition is not
//! permitted; a rejected transition never mutates the session.

use thiserror::Error;

/// Errors that can occur when talking to the quiz backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// No valid session credential is present. Nothing was sent.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The operation requires the admin role.
    #[error("not authorized: admin role required")]
    NotAuthorized,

    /// The backend answered with a body of the wrong shape.
    #[error("invalid response format: {0}")]
    InvalidResponseFormat(String),

    /// The request failed at the HTTP or transport layer.
    ///
    /// `status` is `0` when no HTTP status was received.
    #[error("fetch error (HTTP {status}): {message}")]
    FetchError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),
}

impl ServiceError {
    /// Returns `true` if the front end should offer a retry action.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidResponseFormat(_)
                | ServiceError::FetchError { .. }
                | ServiceError::Timeout(_)
        )
    }

    /// Returns `true` if the caller must be sent to a login surface.
    pub fn requires_login(&self) -> bool {
        matches!(self, ServiceError::NotAuthenticated)
    }
}

/// A session transition that was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The session is not presenting a question.
    #[error("session is not active")]
    NotActive,

    /// `advance` was called before an answer was recorded.
    #[error("no answer recorded for the current question")]
    NoAnswerRecorded,

    /// `retreat` was called on the first question.
    #[error("already at the first question")]
    AtFirstQuestion,

    /// A submission has already been dispatched for this session.
    #[error("submission already in progress")]
    SubmissionInProgress,

    /// The option slot is out of range or has no selectable text.
    #[error("option {0} is not selectable")]
    InvalidOption(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_classification() {
        assert!(!ServiceError::NotAuthenticated.is_retryable());
        assert!(!ServiceError::NotAuthorized.is_retryable());
        assert!(ServiceError::InvalidResponseFormat("x".into()).is_retryable());
        assert!(ServiceError::Timeout(30).is_retryable());
        assert!(ServiceError::FetchError {
            status: 502,
            message: "bad gateway".into()
        }
        .is_retryable());
    }

    #[test]
    fn only_missing_credentials_require_login() {
        assert!(ServiceError::NotAuthenticated.requires_login());
        assert!(!ServiceError::NotAuthorized.requires_login());
        assert!(!ServiceError::Timeout(1).requires_login());
    }

    #[test]
    fn fetch_error_message_carries_status() {
        let err = ServiceError::FetchError {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "fetch error (HTTP 500): boom");
    }
}
