//! The `quizloop score` command.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

use quizloop_core::report::SessionLog;
use quizloop_core::scoring::score_session;
use quizloop_store::config::load_config_from;

pub fn execute(
    log_path: PathBuf,
    proficiency_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let log = SessionLog::load_json(&log_path)?;

    // Without a snapshot every answered item is scored as brand new.
    let existing: HashMap<String, f64> = match &proficiency_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read proficiency from {}", path.display()))?;
            serde_json::from_str(&content).context("failed to parse proficiency JSON")?
        }
        None => log
            .answers
            .iter()
            .map(|a| (a.item_id.clone(), 0.0))
            .collect(),
    };

    let score = score_session(&log.answers, &existing, &config.scoring);
    let output = serde_json::json!({
        "session_id": log.session_id,
        "lesson_id": log.lesson_id,
        "learner": log.learner,
        "summary": log.summary(),
        "exp_gained": score.exp_gained,
        "per_item": score.per_item,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
