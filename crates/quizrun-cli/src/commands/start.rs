//! The `quizrun start` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::take::drive;
use super::{connect, explain};

pub async fn execute(
    category: String,
    count: Option<u32>,
    results_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, controller) = connect(config_path)?;
    let count = count.unwrap_or(config.default_question_count);

    let session = controller
        .start_category_quiz(&category, count)
        .await
        .map_err(explain)
        .with_context(|| format!("failed to start a {category} quiz"))?;
    println!("Started quiz {} ({category}, {} questions)", session.quiz_id(), session.len());

    let results_dir = results_dir.or(config.results_dir);
    drive(&controller, session, results_dir.as_deref()).await
}
