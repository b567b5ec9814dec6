//! The `quizloop progress` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizloop_core::traits::ProgressStore;
use quizloop_store::config::load_config_from;

pub async fn execute(learner: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let learner = learner.unwrap_or_else(|| config.default_learner.clone());
    let store = config.open_store();

    let profile = store.learner_profile(&learner).await?;

    println!(
        "{}: {} EXP, {} session(s), best streak {}",
        profile.learner, profile.total_exp, profile.sessions_completed, profile.best_streak
    );

    if profile.proficiency.is_empty() {
        println!("No words studied yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Word", "Proficiency", "Last seen"]);
    for (id, record) in &profile.proficiency {
        table.add_row(vec![
            Cell::new(id),
            Cell::new(format!("{:.0}%", record.proficiency * 100.0)),
            Cell::new(record.last_seen_at.format("%Y-%m-%d %H:%M")),
        ]);
    }
    println!("{table}");

    Ok(())
}
