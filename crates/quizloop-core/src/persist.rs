//! Handing a finished session to a progress store.
//!
//! The outcome is computed once by the session; this module only retries the
//! write. Transient store failures back off exponentially; permanent ones
//! (see [`StoreError::is_permanent`]) are returned immediately.

use std::time::Duration;

use anyhow::Result;

use crate::error::StoreError;
use crate::session::SessionOutcome;
use crate::traits::ProgressStore;

/// Retry behaviour for persistence.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry. Doubles each time, capped at 30s.
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(200),
        }
    }
}

const MAX_DELAY: Duration = Duration::from_secs(30);

/// Record `outcome` for `learner`, retrying transient failures.
pub async fn persist_outcome(
    store: &dyn ProgressStore,
    learner: &str,
    outcome: &SessionOutcome,
    policy: &RetryPolicy,
) -> Result<()> {
    let mut delay = policy.initial_delay;
    let mut last_error = None;

    for attempt in 0..=policy.max_retries {
        if attempt > 0 {
            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(MAX_DELAY);
        }
        match store.record_session(learner, outcome).await {
            Ok(()) => {
                tracing::info!(
                    store = store.name(),
                    learner,
                    session = %outcome.session_id,
                    "session persisted"
                );
                return Ok(());
            }
            Err(e) => {
                if is_permanent(&e) {
                    return Err(e);
                }
                tracing::warn!(
                    store = store.name(),
                    attempt = attempt + 1,
                    "persisting session failed: {e:#}"
                );
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error")))
}

fn is_permanent(error: &anyhow::Error) -> bool {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<StoreError>())
        .is_some_and(StoreError::is_permanent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::traits::{LeaderboardEntry, LearnerProfile};

    /// Fails the first `failures` writes with the given error kind.
    struct FlakyStore {
        failures: u32,
        permanent: bool,
        calls: AtomicU32,
    }

    impl FlakyStore {
        fn new(failures: u32, permanent: bool) -> Self {
            Self {
                failures,
                permanent,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl ProgressStore for FlakyStore {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn load_proficiency(
            &self,
            _: &str,
            _: &[String],
        ) -> anyhow::Result<HashMap<String, f64>> {
            Ok(HashMap::new())
        }

        async fn record_session(&self, _: &str, _: &SessionOutcome) -> anyhow::Result<()> {
            let call = self.calls.fetch_add(1, Ordering::Relaxed);
            if call < self.failures {
                let err = if self.permanent {
                    StoreError::Corrupt("bad document".into())
                } else {
                    StoreError::Unavailable("busy".into())
                };
                return Err(anyhow::Error::new(err).context("writing progress"));
            }
            Ok(())
        }

        async fn learner_profile(&self, learner: &str) -> anyhow::Result<LearnerProfile> {
            Ok(LearnerProfile::new(learner))
        }

        async fn leaderboard(&self, _: usize) -> anyhow::Result<Vec<LeaderboardEntry>> {
            Ok(vec![])
        }
    }

    fn outcome() -> SessionOutcome {
        SessionOutcome {
            session_id: Uuid::nil(),
            lesson_id: "l".into(),
            completed_at: Utc::now(),
            exp_gained: 2,
            per_item: BTreeMap::new(),
            max_streak: 1,
            total_secs: 1,
            answers: vec![],
        }
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn retries_transient_failures() {
        let store = FlakyStore::new(2, false);
        persist_outcome(&store, "ana", &outcome(), &fast_policy(3))
            .await
            .unwrap();
        assert_eq!(store.calls.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let store = FlakyStore::new(10, false);
        let err = persist_outcome(&store, "ana", &outcome(), &fast_policy(2))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("unavailable"));
        assert_eq!(store.calls.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retried() {
        let store = FlakyStore::new(10, true);
        let err = persist_outcome(&store, "ana", &outcome(), &fast_policy(5))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("corrupt"));
        assert_eq!(store.calls.load(Ordering::Relaxed), 1);
    }
}
