//! quizrun-core: quiz session engine.
//!
//! Holds the data model, the session state machine and navigation policy, the
//! answer encoder, score normalisation and result tiers, and the controller
//! that drives a session against a quiz backend.

pub mod controller;
pub mod encoder;
pub mod error;
pub mod model;
pub mod scoring;
pub mod session;
pub mod traits;

pub use controller::QuizSessionController;
pub use error::{ServiceError, SessionError};
pub use session::{Advance, Phase, QuizSession};
