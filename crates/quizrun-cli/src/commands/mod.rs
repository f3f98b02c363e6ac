pub mod categories;
pub mod create;
pub mod init;
pub mod list;
pub mod login;
pub mod start;
pub mod take;

use std::path::PathBuf;

use anyhow::Result;

use quizrun_client::config::{create_controller, load_config_from, QuizrunConfig};
use quizrun_core::{QuizSessionController, ServiceError};

/// Load config and build a controller from it.
pub(crate) fn connect(
    config_path: Option<PathBuf>,
) -> Result<(QuizrunConfig, QuizSessionController)> {
    let config = load_config_from(config_path.as_deref())?;
    tracing::debug!(?config, "loaded config");
    let controller = create_controller(&config)?;
    Ok((config, controller))
}

/// Turn a backend error into a user-facing one.
pub(crate) fn explain(err: ServiceError) -> anyhow::Error {
    if err.requires_login() {
        return anyhow::anyhow!("{err}: run `quizrun login --username <name>` first");
    }
    match err {
        ServiceError::NotAuthorized => {
            anyhow::anyhow!("{err}: this command needs `role = \"admin\"`")
        }
        other if other.is_retryable() => {
            anyhow::anyhow!("{other} (run the command again to retry)")
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explain_points_to_login() {
        let msg = explain(ServiceError::NotAuthenticated).to_string();
        assert!(msg.contains("quizrun login"));
    }

    #[test]
    fn explain_offers_retry_for_transient_errors() {
        let msg = explain(ServiceError::Timeout(30)).to_string();
        assert!(msg.contains("retry"));
        let msg = explain(ServiceError::NotAuthorized).to_string();
        assert!(msg.contains("admin"));
    }
}
