//! The `quizrun categories` command.

use std::path::PathBuf;

use anyhow::Result;

use super::{connect, explain};

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let (_, controller) = connect(config_path)?;
    let categories = controller.list_categories().await.map_err(explain)?;

    if categories.is_empty() {
        println!("No categories available.");
        return Ok(());
    }
    for category in &categories {
        println!("{category}");
    }
    Ok(())
}
