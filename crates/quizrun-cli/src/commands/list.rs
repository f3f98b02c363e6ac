//! The `quizrun list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizrun_core::model::QuizSummary;

use super::{connect, explain};

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let (_, controller) = connect(config_path)?;
    let quizzes = controller.list_quizzes().await.map_err(explain)?;

    if quizzes.is_empty() {
        println!("No quizzes available. Create one with `quizrun start --category <name>`.");
        return Ok(());
    }
    println!("{}", quiz_table(&quizzes));
    Ok(())
}

fn quiz_table(quizzes: &[QuizSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Questions"]);
    for quiz in quizzes {
        table.add_row(vec![
            Cell::new(quiz.id),
            Cell::new(&quiz.title),
            Cell::new(quiz.question_count),
        ]);
    }
    table
}
