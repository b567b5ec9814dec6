//! Progress store backed by a single JSON document on disk.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use quizloop_core::error::StoreError;
use quizloop_core::session::SessionOutcome;
use quizloop_core::traits::{rank_learners, LeaderboardEntry, LearnerProfile, ProgressStore};

const FORMAT_VERSION: u32 = 1;

/// On-disk layout of the progress file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ProgressDocument {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    learners: BTreeMap<String, LearnerProfile>,
}

fn default_version() -> u32 {
    FORMAT_VERSION
}

/// Stores every learner's progress in one JSON file.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous document intact.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<ProgressDocument> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ProgressDocument::default());
            }
            Err(e) => {
                return Err(StoreError::Io(e))
                    .with_context(|| format!("failed to read {}", self.path.display()));
            }
        };

        let doc: ProgressDocument = serde_json::from_str(&content)
            .map_err(|e| StoreError::Corrupt(e.to_string()))
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        if doc.version != FORMAT_VERSION {
            return Err(StoreError::Corrupt(format!(
                "unsupported progress file version {}",
                doc.version
            ))
            .into());
        }
        Ok(doc)
    }

    async fn write_document(&self, doc: &ProgressDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(StoreError::Io)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }

        let json = serde_json::to_string_pretty(doc).context("failed to serialize progress")?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(StoreError::Io)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(StoreError::Io)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for JsonFileStore {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn load_proficiency(
        &self,
        learner: &str,
        item_ids: &[String],
    ) -> anyhow::Result<HashMap<String, f64>> {
        let doc = self.read_document().await?;
        let ids = item_ids.iter().map(String::as_str);
        Ok(match doc.learners.get(learner) {
            Some(profile) => profile.snapshot(ids),
            None => LearnerProfile::new(learner).snapshot(ids),
        })
    }

    async fn record_session(&self, learner: &str, outcome: &SessionOutcome) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_document().await?;
        doc.learners
            .entry(learner.to_string())
            .or_insert_with(|| LearnerProfile::new(learner))
            .apply(outcome);
        self.write_document(&doc).await?;
        tracing::debug!(path = %self.path.display(), learner, "progress file updated");
        Ok(())
    }

    async fn learner_profile(&self, learner: &str) -> anyhow::Result<LearnerProfile> {
        let mut doc = self.read_document().await?;
        doc.learners
            .remove(learner)
            .ok_or_else(|| StoreError::LearnerNotFound(learner.to_string()).into())
    }

    async fn leaderboard(&self, limit: usize) -> anyhow::Result<Vec<LeaderboardEntry>> {
        let doc = self.read_document().await?;
        Ok(rank_learners(doc.learners.values(), limit))
    }
}
