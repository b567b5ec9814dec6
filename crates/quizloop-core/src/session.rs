//! Lesson session controller.
//!
//! Drives a [`SessionQueue`] for one lesson and, when the last pending item
//! is mastered, scores the whole answer log exactly once and hands back a
//! [`SessionOutcome`]. Persisting that outcome is left to the caller.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{AnswerResult, Lesson, QuizItem};
use crate::queue::{Advance, SessionQueue};
use crate::scoring::{score_session, ScoringConfig};

/// Final result of a completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub session_id: Uuid,
    pub lesson_id: String,
    pub completed_at: DateTime<Utc>,
    pub exp_gained: u32,
    /// Next proficiency per scored item id.
    pub per_item: BTreeMap<String, f64>,
    /// Longest run of consecutive correct checks.
    pub max_streak: u32,
    /// Sum of all answer durations, in seconds.
    pub total_secs: u64,
    /// The full answer log, in check order.
    pub answers: Vec<AnswerResult>,
}

impl SessionOutcome {
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|r| r.is_correct).count()
    }
}

/// Longest run of consecutive correct results.
pub fn max_streak(results: &[AnswerResult]) -> u32 {
    let mut current = 0u32;
    let mut best = 0u32;
    for r in results {
        if r.is_correct {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

/// Sum of all answer durations, in seconds.
pub fn total_secs(results: &[AnswerResult]) -> u64 {
    results.iter().map(|r| u64::from(r.duration_secs)).sum()
}

/// One lesson session: queue state, the proficiency snapshot it will be
/// scored against, and the completion guard.
#[derive(Debug, Clone)]
pub struct LessonSession {
    id: Uuid,
    lesson_id: String,
    queue: SessionQueue,
    existing: HashMap<String, f64>,
    scoring: ScoringConfig,
    finalized: bool,
}

impl LessonSession {
    /// Start a session over all quiz items of `lesson`.
    pub fn new(lesson: &Lesson, existing: HashMap<String, f64>, scoring: ScoringConfig) -> Self {
        Self::from_items(lesson.id.clone(), lesson.items.clone(), existing, scoring)
    }

    pub fn from_items(
        lesson_id: impl Into<String>,
        items: Vec<QuizItem>,
        existing: HashMap<String, f64>,
        scoring: ScoringConfig,
    ) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            lesson_id: lesson_id.into(),
            queue: SessionQueue::new(items),
            existing,
            scoring,
            finalized: false,
        };
        tracing::debug!(
            session = %session.id,
            lesson = %session.lesson_id,
            items = session.queue.items().len(),
            "session started"
        );
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn lesson_id(&self) -> &str {
        &self.lesson_id
    }

    pub fn current(&self) -> Option<&QuizItem> {
        self.queue.current_item()
    }

    pub fn is_checked(&self) -> bool {
        self.queue.is_checked()
    }

    pub fn selected(&self) -> Option<usize> {
        self.queue.selected()
    }

    pub fn remaining(&self) -> usize {
        self.queue.remaining()
    }

    pub fn total_items(&self) -> usize {
        self.queue.items().len()
    }

    pub fn is_complete(&self) -> bool {
        self.queue.is_complete()
    }

    pub fn results(&self) -> &[AnswerResult] {
        self.queue.results()
    }

    pub fn select(&mut self, choice: usize) {
        self.queue.select(choice);
    }

    pub fn check(&mut self, duration_secs: u32) -> Option<&AnswerResult> {
        self.queue.check(duration_secs)
    }

    /// Continue past the checked item.
    ///
    /// Returns the outcome exactly once, on the call that empties the queue.
    /// A session built over no items is complete from the start; its first
    /// `advance` returns an empty outcome. Every other call returns `None`.
    pub fn advance(&mut self) -> Option<SessionOutcome> {
        if self.finalized {
            return None;
        }
        match self.queue.advance() {
            Advance::Completed(_) => Some(self.finalize()),
            Advance::Ignored if self.queue.items().is_empty() => Some(self.finalize()),
            _ => None,
        }
    }

    /// Item ids that got at least one wrong answer, in first-seen order.
    pub fn mistakes(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.results()
            .iter()
            .filter(|r| !r.is_correct)
            .filter(|r| seen.insert(r.item_id.as_str()))
            .map(|r| r.item_id.clone())
            .collect()
    }

    /// A fresh session over the items answered wrong at least once.
    ///
    /// The snapshot is this session's scored values where available, so the
    /// review builds on the progress just made.
    pub fn review_mistakes(&self, outcome: Option<&SessionOutcome>) -> Option<LessonSession> {
        let mistakes = self.mistakes();
        if mistakes.is_empty() {
            return None;
        }
        let wanted: HashSet<&str> = mistakes.iter().map(String::as_str).collect();
        let items: Vec<QuizItem> = self
            .queue
            .items()
            .iter()
            .filter(|item| wanted.contains(item.id.as_str()))
            .cloned()
            .collect();

        let mut existing = self.existing.clone();
        if let Some(outcome) = outcome {
            for (id, &value) in &outcome.per_item {
                existing.insert(id.clone(), value);
            }
        }

        Some(LessonSession::from_items(
            self.lesson_id.clone(),
            items,
            existing,
            self.scoring.clone(),
        ))
    }

    fn finalize(&mut self) -> SessionOutcome {
        self.finalized = true;
        let answers = self.queue.results().to_vec();
        let score = score_session(&answers, &self.existing, &self.scoring);
        let outcome = SessionOutcome {
            session_id: self.id,
            lesson_id: self.lesson_id.clone(),
            completed_at: Utc::now(),
            exp_gained: score.exp_gained,
            per_item: score.per_item,
            max_streak: max_streak(&answers),
            total_secs: total_secs(&answers),
            answers,
        };
        tracing::info!(
            session = %outcome.session_id,
            lesson = %outcome.lesson_id,
            exp = outcome.exp_gained,
            streak = outcome.max_streak,
            checks = outcome.answers.len(),
            "session complete"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuizKind;

    fn item(id: &str, correct: usize) -> QuizItem {
        let options: Vec<String> = ["alpha", "beta", "gamma", "delta"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        QuizItem {
            id: id.into(),
            prompt: format!("Which one is {id}?"),
            correct_answer: options[correct].clone(),
            options,
            kind: QuizKind::MultipleChoice,
        }
    }

    fn session(n: usize) -> LessonSession {
        let items = (0..n).map(|i| item(&format!("w{i}"), i % 4)).collect();
        let existing = (0..n).map(|i| (format!("w{i}"), 0.0)).collect();
        LessonSession::from_items("lesson-1", items, existing, ScoringConfig::default())
    }

    fn answer(s: &mut LessonSession, choice: usize, secs: u32) -> Option<SessionOutcome> {
        s.select(choice);
        s.check(secs);
        s.advance()
    }

    fn flags(results: &[bool]) -> Vec<AnswerResult> {
        results
            .iter()
            .map(|&ok| AnswerResult::new("w", if ok { "y" } else { "n" }, "y", 1))
            .collect()
    }

    #[test]
    fn streak_resets_on_wrong_answer() {
        assert_eq!(max_streak(&flags(&[true, true, false, true])), 2);
        assert_eq!(max_streak(&flags(&[false, false])), 0);
        assert_eq!(max_streak(&flags(&[true, false, true, true, true])), 3);
        assert_eq!(max_streak(&[]), 0);
    }

    #[test]
    fn total_secs_sums_durations() {
        let log = vec![
            AnswerResult::new("a", "x", "x", 3),
            AnswerResult::new("b", "x", "y", 0),
        ];
        assert_eq!(total_secs(&log), 4);
    }

    #[test]
    fn scenario_wrong_then_all_right() {
        let mut s = session(3);

        assert!(answer(&mut s, 3, 2).is_none()); // w0 wrong
        assert!(answer(&mut s, 1, 2).is_none()); // w1 right
        assert!(answer(&mut s, 2, 2).is_none()); // w2 right
        let outcome = answer(&mut s, 0, 2).expect("session should complete");

        assert!(s.is_complete());
        assert_eq!(outcome.answers.len(), 4);
        assert_eq!(outcome.correct_count(), 3);
        assert_eq!(outcome.exp_gained, 6);
        assert_eq!(outcome.max_streak, 3);
        assert_eq!(outcome.total_secs, 8);
        assert_eq!(outcome.lesson_id, "lesson-1");
        assert_eq!(outcome.session_id, s.id());
        // w1 and w2: accuracy 1, fast -> 0.6; w0: accuracy 0.5 -> delta 0.5 -> 0.3
        assert_eq!(outcome.per_item["w1"], 0.6);
        assert_eq!(outcome.per_item["w0"], 0.3);
    }

    #[test]
    fn outcome_is_emitted_once() {
        let mut s = session(1);
        assert!(answer(&mut s, 0, 1).is_some());
        assert!(s.advance().is_none());
        assert!(answer(&mut s, 0, 1).is_none());
        assert_eq!(s.results().len(), 1);
    }

    #[test]
    fn n_failures_then_success_takes_n_plus_one_attempts() {
        let mut s = session(1);
        for _ in 0..4 {
            assert!(answer(&mut s, 2, 5).is_none());
        }
        let outcome = answer(&mut s, 0, 5).unwrap();
        let for_item: Vec<_> = outcome.answers.iter().filter(|r| r.item_id == "w0").collect();
        assert_eq!(for_item.len(), 5);
        assert_eq!(for_item.iter().filter(|r| r.is_correct).count(), 1);
        assert!(for_item.last().unwrap().is_correct);
        assert_eq!(outcome.exp_gained, 2);
    }

    #[test]
    fn mistakes_lists_each_missed_item_once() {
        let mut s = session(3);
        answer(&mut s, 3, 1); // w0 wrong
        answer(&mut s, 0, 1); // w1 wrong
        answer(&mut s, 2, 1); // w2 right
        answer(&mut s, 3, 1); // w0 wrong again
        assert_eq!(s.mistakes(), vec!["w0".to_string(), "w1".to_string()]);
    }

    #[test]
    fn review_mistakes_starts_new_session() {
        let mut s = session(2);
        answer(&mut s, 1, 1); // w0 wrong
        answer(&mut s, 1, 1); // w1 right
        let outcome = answer(&mut s, 0, 1).unwrap();

        let review = s.review_mistakes(Some(&outcome)).unwrap();
        assert_ne!(review.id(), s.id());
        assert_eq!(review.total_items(), 1);
        assert_eq!(review.current().unwrap().id, "w0");
        assert!(review.results().is_empty());
    }

    #[test]
    fn review_mistakes_none_when_flawless() {
        let mut s = session(1);
        let outcome = answer(&mut s, 0, 1);
        assert!(s.review_mistakes(outcome.as_ref()).is_none());
    }

    #[test]
    fn empty_session_emits_empty_outcome_once() {
        let mut s = session(0);
        assert!(s.is_complete());

        let outcome = s.advance().unwrap();
        assert!(outcome.answers.is_empty());
        assert!(outcome.per_item.is_empty());
        assert_eq!(outcome.exp_gained, 0);
        assert_eq!(outcome.max_streak, 0);
        assert!(s.advance().is_none());
    }

    #[test]
    fn outcome_serde_roundtrip() {
        let mut s = session(1);
        let outcome = answer(&mut s, 0, 1).unwrap();
        let json = serde_json::to_string(&outcome).unwrap();
        let back: SessionOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outcome);
    }
}
