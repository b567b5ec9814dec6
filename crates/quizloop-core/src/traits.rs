//! Persistence trait and the records it exchanges.
//!
//! The session engine never stores anything itself. A `ProgressStore`
//! supplies the existing proficiency snapshot at session start and receives
//! the finished [`SessionOutcome`] at the end. Implemented by the
//! `quizloop-store` crate.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionOutcome;

/// Stored mastery estimate for one vocabulary item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProficiencyRecord {
    /// Mastery in `[0, 1]`.
    pub proficiency: f64,
    /// When the item was last touched by a completed session.
    pub last_seen_at: DateTime<Utc>,
}

/// Everything recorded for one learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerProfile {
    pub learner: String,
    #[serde(default)]
    pub total_exp: u64,
    #[serde(default)]
    pub sessions_completed: u32,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default)]
    pub proficiency: BTreeMap<String, ProficiencyRecord>,
}

impl LearnerProfile {
    pub fn new(learner: impl Into<String>) -> Self {
        Self {
            learner: learner.into(),
            total_exp: 0,
            sessions_completed: 0,
            best_streak: 0,
            proficiency: BTreeMap::new(),
        }
    }

    /// Fold a completed session into this profile.
    ///
    /// Each scored item's proficiency is overwritten and stamped with the
    /// session's completion time.
    pub fn apply(&mut self, outcome: &SessionOutcome) {
        for (item_id, &proficiency) in &outcome.per_item {
            self.proficiency.insert(
                item_id.clone(),
                ProficiencyRecord {
                    proficiency,
                    last_seen_at: outcome.completed_at,
                },
            );
        }
        self.total_exp += u64::from(outcome.exp_gained);
        self.sessions_completed += 1;
        self.best_streak = self.best_streak.max(outcome.max_streak);
    }

    /// Proficiency values for `ids`, defaulting unseen items to `0.0`.
    pub fn snapshot<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> HashMap<String, f64> {
        ids.into_iter()
            .map(|id| {
                let value = self
                    .proficiency
                    .get(id)
                    .map(|r| r.proficiency)
                    .unwrap_or(0.0);
                (id.to_string(), value)
            })
            .collect()
    }
}

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub learner: String,
    pub total_exp: u64,
    pub sessions_completed: u32,
}

/// Rank profiles by total EXP descending, ties by learner name.
pub fn rank_learners<'a>(
    profiles: impl IntoIterator<Item = &'a LearnerProfile>,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let mut sorted: Vec<&LearnerProfile> = profiles.into_iter().collect();
    sorted.sort_by(|a, b| {
        b.total_exp
            .cmp(&a.total_exp)
            .then_with(|| a.learner.cmp(&b.learner))
    });
    sorted
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, p)| LeaderboardEntry {
            rank: i + 1,
            learner: p.learner.clone(),
            total_exp: p.total_exp,
            sessions_completed: p.sessions_completed,
        })
        .collect()
}

/// Trait for backends that keep learner progress between sessions.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Human-readable store name (e.g. "json-file").
    fn name(&self) -> &str;

    /// Existing proficiency for `item_ids`. Items never seen map to `0.0`.
    async fn load_proficiency(
        &self,
        learner: &str,
        item_ids: &[String],
    ) -> anyhow::Result<HashMap<String, f64>>;

    /// Persist a completed session for `learner`.
    async fn record_session(&self, learner: &str, outcome: &SessionOutcome) -> anyhow::Result<()>;

    /// The full profile of a learner.
    async fn learner_profile(&self, learner: &str) -> anyhow::Result<LearnerProfile>;

    /// Top `limit` learners by total EXP.
    async fn leaderboard(&self, limit: usize) -> anyhow::Result<Vec<LeaderboardEntry>>;
}
