//! quizrun-client: quiz backend integration.
//!
//! Implements the `QuizService` trait over HTTP, loads client configuration,
//! and provides a config-backed credential provider and an in-memory mock.

pub mod config;
pub mod credentials;
pub mod http;
pub mod mock;

pub use config::{create_controller, load_config_from, QuizrunConfig};
pub use credentials::StaticCredentials;
pub use http::HttpQuizService;
