//! Session log files with JSON persistence.
//!
//! A session log captures the answer log of one study session so it can be
//! re-scored offline (`quizloop score`) or inspected later.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::AnswerResult;
use crate::session::{max_streak, total_secs, SessionOutcome};

/// A saved answer log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionLog {
    pub session_id: Uuid,
    pub lesson_id: String,
    pub learner: String,
    pub created_at: DateTime<Utc>,
    /// Answers in check order.
    pub answers: Vec<AnswerResult>,
}

/// Display figures derived from an answer log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSummary {
    pub checks: usize,
    pub correct: usize,
    pub distinct_items: usize,
    pub max_streak: u32,
    pub total_secs: u64,
}

impl SessionLog {
    pub fn from_outcome(learner: impl Into<String>, outcome: &SessionOutcome) -> Self {
        Self {
            session_id: outcome.session_id,
            lesson_id: outcome.lesson_id.clone(),
            learner: learner.into(),
            created_at: outcome.completed_at,
            answers: outcome.answers.clone(),
        }
    }

    /// Save the log as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize session log")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write session log to {}", path.display()))?;
        Ok(())
    }

    /// Load a log from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session log from {}", path.display()))?;
        let log: SessionLog =
            serde_json::from_str(&content).context("failed to parse session log JSON")?;
        Ok(log)
    }

    pub fn summary(&self) -> LogSummary {
        let distinct: std::collections::HashSet<&str> =
            self.answers.iter().map(|a| a.item_id.as_str()).collect();
        LogSummary {
            checks: self.answers.len(),
            correct: self.answers.iter().filter(|a| a.is_correct).count(),
            distinct_items: distinct.len(),
            max_streak: max_streak(&self.answers),
            total_secs: total_secs(&self.answers),
        }
    }
}
