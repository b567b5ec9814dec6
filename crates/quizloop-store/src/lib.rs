//! quizloop-store: Progress stores and configuration.
//!
//! Implements the `ProgressStore` trait with an in-memory store (for tests)
//! and a JSON file store, and loads the `quizloop.toml` configuration.

pub mod config;
pub mod json_file;
pub mod memory;

pub use config::{load_config, load_config_from, QuizloopConfig};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
