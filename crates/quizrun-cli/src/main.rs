//! quizrun CLI: take multiple-choice quizzes from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizrun", version, about = "Terminal client for the quiz service")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available quizzes
    List,

    /// List question categories
    Categories,

    /// Take an existing quiz
    Take {
        /// Quiz identifier
        #[arg(long)]
        quiz_id: i64,

        /// Directory to save the result JSON in (overrides config)
        #[arg(long)]
        results_dir: Option<PathBuf>,
    },

    /// Create a quiz from a category and take it
    Start {
        /// Category to draw questions from
        #[arg(long)]
        category: String,

        /// Number of questions (defaults to config)
        #[arg(long)]
        count: Option<u32>,

        /// Directory to save the result JSON in (overrides config)
        #[arg(long)]
        results_dir: Option<PathBuf>,
    },

    /// Create a quiz from a draft file (admin only)
    Create {
        /// Path to a .toml or .json quiz draft
        #[arg(long)]
        file: PathBuf,
    },

    /// Log in and store the token in quizrun.toml
    Login {
        /// Account name
        #[arg(long)]
        username: String,

        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Create starter config and example quiz draft
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizrun=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::List => commands::list::execute(config).await,
        Commands::Categories => commands::categories::execute(config).await,
        Commands::Take {
            quiz_id,
            results_dir,
        } => commands::take::execute(quiz_id, results_dir, config).await,
        Commands::Start {
            category,
            count,
            results_dir,
        } => commands::start::execute(category, count, results_dir, config).await,
        Commands::Create { file } => commands::create::execute(file, config).await,
        Commands::Login { username, password } => {
            commands::login::execute(username, password, config).await
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
