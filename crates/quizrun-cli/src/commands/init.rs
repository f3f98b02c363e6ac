//! The `quizrun init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("quizrun.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("quizzes")?;
    write_if_missing(Path::new("quizzes/example.toml"), EXAMPLE_DRAFT)?;

    println!("\nNext steps:");
    println!("  1. Edit quizrun.toml with your server URL");
    println!("  2. Run: quizrun login --username <name>");
    println!("  3. Run: quizrun categories");
    println!("  4. Run: quizrun start --category <name>");
    println!("  5. Admins publish the example: quizrun create --file quizzes/example.toml");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizrun configuration

base_url = "http://localhost:8080/api"
# Written by `quizrun login`; QUIZRUN_TOKEN overrides it.
token = "${QUIZRUN_TOKEN}"
role = "student"
timeout_secs = 30
default_question_count = 10
# results_dir = "results"
"#;

const EXAMPLE_DRAFT: &str = r#"title = "Example Quiz"

[[questions]]
questionTitle = "Which keyword declares a mutable binding in Rust?"
option1 = "let mut"
option2 = "var"
option3 = "mut let"
option4 = "let"
rightAnswer = "let mut"
category = "Rust"

[[questions]]
questionTitle = "What does `Option::None` represent?"
option1 = "An error"
option2 = "The absence of a value"
option3 = "A null pointer"
option4 = "Zero"
rightAnswer = "The absence of a value"
category = "Rust"
"#;
