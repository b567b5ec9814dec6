//! Proficiency scoring and EXP rewards.
//!
//! Maps a session's answer log plus each item's existing proficiency to the
//! next proficiency value. Accuracy is weighted by responsiveness, the old
//! value decays by a flat factor once per session, and the session EXP is a
//! fixed reward per correct check.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::AnswerResult;

/// Average response time used when an item has no recorded durations.
pub const FALLBACK_AVG_SECS: f64 = 10.0;

/// Tunable constants of the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Multiplier applied to the existing proficiency once per session.
    pub decay: f64,
    /// Share of the session delta added on top of the decayed value.
    pub gain: f64,
    /// Average times at or below this many seconds get full time weight.
    pub fast_secs: f64,
    /// Average times at or above this many seconds get `slow_weight`.
    pub slow_secs: f64,
    /// Time weight of a slow answer.
    pub slow_weight: f64,
    /// Weight lost between `fast_secs` and `slow_secs` on the linear segment.
    pub time_drop: f64,
    /// EXP awarded per correct check.
    pub exp_per_correct: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            decay: 0.85,
            gain: 0.6,
            fast_secs: 3.0,
            slow_secs: 10.0,
            slow_weight: 0.2,
            time_drop: 0.6,
            exp_per_correct: 2,
        }
    }
}

impl ScoringConfig {
    /// Responsiveness score: 1.0 when fast, `slow_weight` when slow, linear in between.
    pub fn time_weight(&self, avg_secs: f64) -> f64 {
        if avg_secs <= self.fast_secs {
            1.0
        } else if avg_secs >= self.slow_secs {
            self.slow_weight
        } else {
            let span = self.slow_secs - self.fast_secs;
            1.0 - ((avg_secs - self.fast_secs) / span) * self.time_drop
        }
    }

    /// Session delta: accuracy scaled by `0.2 + 0.8 * time_weight`.
    pub fn delta(&self, accuracy: f64, avg_secs: f64) -> f64 {
        let weight = self.time_weight(avg_secs);
        clamp01(round2(accuracy * (0.2 + 0.8 * weight)))
    }

    /// Next proficiency from the existing value and this session's performance.
    pub fn next_proficiency(&self, existing: f64, accuracy: f64, avg_secs: f64) -> f64 {
        let decayed = existing * self.decay;
        clamp01(round2(decayed + self.delta(accuracy, avg_secs) * self.gain))
    }

    /// EXP for a whole answer log: a fixed reward per correct check.
    pub fn exp_for(&self, results: &[AnswerResult]) -> u32 {
        let correct = u32::try_from(results.iter().filter(|r| r.is_correct).count())
            .unwrap_or(u32::MAX);
        correct.saturating_mul(self.exp_per_correct)
    }
}

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Per-item aggregate over a session's answer log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    pub item_id: String,
    pub attempts: u32,
    pub correct: u32,
    pub total_secs: u64,
}

impl ItemStats {
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.correct as f64 / self.attempts as f64
        }
    }

    pub fn avg_secs(&self) -> f64 {
        if self.attempts == 0 {
            FALLBACK_AVG_SECS
        } else {
            self.total_secs as f64 / self.attempts as f64
        }
    }
}

/// Group results by item id, in first-seen order.
pub fn aggregate_items(results: &[AnswerResult]) -> Vec<ItemStats> {
    let mut order: Vec<ItemStats> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for r in results {
        let slot = *index.entry(r.item_id.as_str()).or_insert_with(|| {
            order.push(ItemStats {
                item_id: r.item_id.clone(),
                attempts: 0,
                correct: 0,
                total_secs: 0,
            });
            order.len() - 1
        });
        let stats = &mut order[slot];
        stats.attempts += 1;
        if r.is_correct {
            stats.correct += 1;
        }
        stats.total_secs += u64::from(r.duration_secs);
    }

    order
}

/// Result of scoring one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    /// Next proficiency per item id that had an existing value.
    pub per_item: BTreeMap<String, f64>,
    pub exp_gained: u32,
}

/// Score a session's answer log against the existing proficiency snapshot.
///
/// Ids missing from `existing` get no proficiency update, but their correct
/// checks still earn EXP.
pub fn score_session(
    results: &[AnswerResult],
    existing: &HashMap<String, f64>,
    config: &ScoringConfig,
) -> ScoreOutcome {
    let mut per_item = BTreeMap::new();

    for stats in aggregate_items(results) {
        let Some(&current) = existing.get(&stats.item_id) else {
            tracing::debug!(item = %stats.item_id, "no proficiency snapshot, skipping update");
            continue;
        };
        let next = config.next_proficiency(current, stats.accuracy(), stats.avg_secs());
        per_item.insert(stats.item_id, next);
    }

    ScoreOutcome {
        per_item,
        exp_gained: config.exp_for(results),
    }
}
