//! The `quizloop leaderboard` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizloop_core::traits::ProgressStore;
use quizloop_store::config::load_config_from;

pub async fn execute(limit: usize, config_path: Option<PathBuf>) -> Result<()> {
    anyhow::ensure!(limit >= 1, "limit must be at least 1");

    let config = load_config_from(config_path.as_deref())?;
    let store = config.open_store();
    let board = store.leaderboard(limit).await?;

    if board.is_empty() {
        println!("No sessions recorded yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Learner", "EXP", "Sessions"]);
    for entry in &board {
        table.add_row(vec![
            Cell::new(entry.rank),
            Cell::new(&entry.learner),
            Cell::new(entry.total_exp),
            Cell::new(entry.sessions_completed),
        ]);
    }
    println!("{table}");

    Ok(())
}
