//! quizloop-core: Lesson session engine and proficiency scoring.
//!
//! This crate defines the lesson data model, the adaptive requeue queue, the
//! proficiency scoring engine, and the session controller that ties them
//! together. Persistence is reached only through the [`traits::ProgressStore`]
//! trait.

pub mod error;
pub mod model;
pub mod parser;
pub mod persist;
pub mod queue;
pub mod report;
pub mod scoring;
pub mod session;
pub mod traits;

pub use error::StoreError;
pub use session::{LessonSession, SessionOutcome};
