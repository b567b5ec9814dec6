//! In-memory progress store for testing.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use quizloop_core::error::StoreError;
use quizloop_core::session::SessionOutcome;
use quizloop_core::traits::{rank_learners, LeaderboardEntry, LearnerProfile, ProgressStore};

/// A progress store that keeps everything in memory.
///
/// Can be told to fail the next N writes with [`StoreError::Unavailable`] to
/// exercise retry paths.
pub struct MemoryStore {
    profiles: RwLock<BTreeMap<String, LearnerProfile>>,
    /// Writes still to fail before succeeding.
    failures_left: AtomicU32,
    /// Number of `record_session` calls made.
    write_count: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(BTreeMap::new()),
            failures_left: AtomicU32::new(0),
            write_count: AtomicU32::new(0),
        }
    }

    /// Create a store seeded with existing profiles.
    pub fn with_profiles(profiles: impl IntoIterator<Item = LearnerProfile>) -> Self {
        let mut store = Self::new();
        let map = profiles
            .into_iter()
            .map(|p| (p.learner.clone(), p))
            .collect();
        store.profiles = RwLock::new(map);
        store
    }

    /// Fail the next `n` writes.
    pub fn fail_next_writes(&self, n: u32) {
        self.failures_left.store(n, Ordering::Relaxed);
    }

    /// Get the number of write attempts made against this store.
    pub fn write_count(&self) -> u32 {
        self.write_count.load(Ordering::Relaxed)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load_proficiency(
        &self,
        learner: &str,
        item_ids: &[String],
    ) -> anyhow::Result<HashMap<String, f64>> {
        let profiles = self.profiles.read().await;
        let ids = item_ids.iter().map(String::as_str);
        Ok(match profiles.get(learner) {
            Some(profile) => profile.snapshot(ids),
            None => LearnerProfile::new(learner).snapshot(ids),
        })
    }

    async fn record_session(&self, learner: &str, outcome: &SessionOutcome) -> anyhow::Result<()> {
        self.write_count.fetch_add(1, Ordering::Relaxed);
        let pending = self.failures_left.load(Ordering::Relaxed);
        if pending > 0 {
            self.failures_left.store(pending - 1, Ordering::Relaxed);
            return Err(StoreError::Unavailable("injected failure".into()).into());
        }

        let mut profiles = self.profiles.write().await;
        profiles
            .entry(learner.to_string())
            .or_insert_with(|| LearnerProfile::new(learner))
            .apply(outcome);
        Ok(())
    }

    async fn learner_profile(&self, learner: &str) -> anyhow::Result<LearnerProfile> {
        let profiles = self.profiles.read().await;
        profiles
            .get(learner)
            .cloned()
            .ok_or_else(|| StoreError::LearnerNotFound(learner.to_string()).into())
    }

    async fn leaderboard(&self, limit: usize) -> anyhow::Result<Vec<LeaderboardEntry>> {
        let profiles = self.profiles.read().await;
        Ok(rank_learners(profiles.values(), limit))
    }
}
