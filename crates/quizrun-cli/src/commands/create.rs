//! The `quizrun create` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quizrun_core::model::QuizDraft;

use super::{connect, explain};

pub async fn execute(file: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let draft = load_draft(&file)?;
    validate_draft(&draft)?;

    let (_, controller) = connect(config_path)?;
    let quiz_id = controller
        .create_full_quiz(&draft)
        .await
        .map_err(explain)?;

    println!("Created quiz {quiz_id}: {} ({} questions)", draft.title, draft.questions.len());
    println!("Take it with: quizrun take --quiz-id {quiz_id}");
    Ok(())
}

/// Load a quiz draft from a `.toml` or `.json` file.
fn load_draft(path: &Path) -> Result<QuizDraft> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display())),
        Some("toml") => {
            toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
        }
        _ => anyhow::bail!(
            "unsupported draft format: {} (expected .toml or .json)",
            path.display()
        ),
    }
}

/// Reject drafts the backend would store as unanswerable questions.
fn validate_draft(draft: &QuizDraft) -> Result<()> {
    if draft.title.trim().is_empty() {
        anyhow::bail!("quiz title must not be empty");
    }
    if draft.questions.is_empty() {
        anyhow::bail!("quiz '{}' has no questions", draft.title);
    }
    for (i, q) in draft.questions.iter().enumerate() {
        if q.right_answer.trim().is_empty() {
            anyhow::bail!(
                "question {} ('{}'): right answer must not be blank",
                i + 1,
                q.question_title
            );
        }
        // Blank slots are never shown, so they cannot hold the right answer.
        let options = [&q.option1, &q.option2, &q.option3, &q.option4];
        let matches = options
            .iter()
            .any(|o| !o.trim().is_empty() && **o == q.right_answer);
        if !matches {
            anyhow::bail!(
                "question {} ('{}'): right answer '{}' is not one of its options",
                i + 1,
                q.question_title,
                q.right_answer
            );
        }
    }
    Ok(())
}
