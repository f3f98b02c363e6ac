//! Credential provider backed by configuration.

use quizrun_core::traits::{CredentialProvider, Role};

/// Token and role resolved once, from config or environment.
///
/// Note: Custom Debug impl masks the token.
#[derive(Clone)]
pub struct StaticCredentials {
    token: Option<String>,
    role: Role,
}

impl StaticCredentials {
    /// Blank tokens count as absent.
    pub fn new(token: Option<String>, role: Role) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
            role,
        }
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("role", &self.role)
            .finish()
    }
}

impl CredentialProvider for StaticCredentials {
    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn current_role(&self) -> Role {
        self.role
    }

    fn bearer_token(&self) -> Option<String> {
        self.token.clone()
    }
}
