//! Workspace configuration and store factory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizloop_core::persist::RetryPolicy;
use quizloop_core::scoring::ScoringConfig;

use crate::json_file::JsonFileStore;

const MAX_EXP_PER_CORRECT: u32 = 1000;

/// Top-level quizloop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizloopConfig {
    /// Where learner progress is kept. `${VAR}` references are expanded.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Learner used when `--learner` is not given.
    #[serde(default = "default_learner")]
    pub default_learner: String,
    /// Max retries when persisting a session fails.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Scoring engine overrides.
    #[serde(default)]
    pub scoring: ScoringConfig,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./quizloop-data/progress.json")
}
fn default_learner() -> String {
    "learner".to_string()
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    200
}

impl Default for QuizloopConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            default_learner: default_learner(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl QuizloopConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    /// Open the configured progress store.
    pub fn open_store(&self) -> JsonFileStore {
        JsonFileStore::new(self.store_path.clone())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizloop.toml` in the current directory
/// 2. `~/.config/quizloop/config.toml`
///
/// Environment variable override: `QUIZLOOP_STORE_PATH`.
pub fn load_config() -> Result<QuizloopConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizloopConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizloop.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            toml::from_str::<QuizloopConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizloopConfig::default(),
    };

    // Apply env var overrides
    if let Ok(store_path) = std::env::var("QUIZLOOP_STORE_PATH") {
        config.store_path = PathBuf::from(store_path);
    }

    config.store_path = PathBuf::from(resolve_env_vars(&config.store_path.to_string_lossy()));

    let scoring = &config.scoring;
    for (name, value) in [
        ("decay", scoring.decay),
        ("gain", scoring.gain),
        ("slow_weight", scoring.slow_weight),
        ("time_drop", scoring.time_drop),
    ] {
        anyhow::ensure!(
            (0.0..=1.0).contains(&value),
            "scoring.{name} must be between 0.0 and 1.0"
        );
    }
    anyhow::ensure!(
        scoring.exp_per_correct <= MAX_EXP_PER_CORRECT,
        "scoring.exp_per_correct must be at most {MAX_EXP_PER_CORRECT}"
    );
    anyhow::ensure!(
        config.scoring.fast_secs < config.scoring.slow_secs,
        "scoring.fast_secs must be below scoring.slow_secs"
    );

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizloop"))
}
