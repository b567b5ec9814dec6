//! Session queue engine.
//!
//! Decides which quiz item is current and how the pending queue evolves
//! after each check/continue action. Items answered incorrectly go to the
//! back of the queue and come around again until they are answered correctly
//! once. Misuse (double check, continue before check, input after completion)
//! is ignored rather than reported, so a repeated tap cannot corrupt state.

use std::collections::{HashMap, VecDeque};

use crate::model::{AnswerResult, QuizItem};

/// Transient state of the outstanding attempt at one item index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Attempt {
    selected: Option<usize>,
    checked: bool,
}

/// What an [`SessionQueue::advance`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Nothing happened: the head was not checked, or the session is complete.
    Ignored,
    /// The head was answered correctly and left the queue.
    Removed(usize),
    /// The head was answered incorrectly and moved to the tail.
    Requeued(usize),
    /// The head was answered correctly and it was the last pending item.
    Completed(usize),
}

/// Ordered queue of item indices not yet mastered in one session.
#[derive(Debug, Clone)]
pub struct SessionQueue {
    items: Vec<QuizItem>,
    pending: VecDeque<usize>,
    attempts: HashMap<usize, Attempt>,
    results: Vec<AnswerResult>,
}

impl SessionQueue {
    /// Start a session over `items`, with the queue set to `0..items.len()`.
    pub fn new(items: Vec<QuizItem>) -> Self {
        let pending = (0..items.len()).collect();
        Self {
            items,
            pending,
            attempts: HashMap::new(),
            results: Vec::new(),
        }
    }

    /// Index of the current item, or `None` once every item has been mastered.
    pub fn current(&self) -> Option<usize> {
        self.pending.front().copied()
    }

    pub fn current_item(&self) -> Option<&QuizItem> {
        self.current().and_then(|idx| self.items.get(idx))
    }

    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether the outstanding attempt at the current item has been checked.
    pub fn is_checked(&self) -> bool {
        self.head_attempt().checked
    }

    /// The tentative choice for the current item.
    pub fn selected(&self) -> Option<usize> {
        self.head_attempt().selected
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn pending(&self) -> impl Iterator<Item = usize> + '_ {
        self.pending.iter().copied()
    }

    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }

    /// Every result logged so far, in check order.
    pub fn results(&self) -> &[AnswerResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<AnswerResult> {
        self.results
    }

    /// Record a tentative choice for the current item.
    ///
    /// Selecting after a check reopens the attempt. Out-of-range choices are
    /// ignored.
    pub fn select(&mut self, choice: usize) {
        let Some(head) = self.current() else {
            return;
        };
        if choice >= self.items[head].options.len() {
            return;
        }
        let attempt = self.attempts.entry(head).or_default();
        attempt.selected = Some(choice);
        attempt.checked = false;
    }

    /// Check the selected answer for the current item and log the result.
    ///
    /// Returns `None` without logging if nothing is selected, the attempt is
    /// already checked, or the session is complete.
    pub fn check(&mut self, duration_secs: u32) -> Option<&AnswerResult> {
        let head = self.current()?;
        let attempt = self.attempts.entry(head).or_default();
        if attempt.checked {
            return None;
        }
        let choice = attempt.selected?;
        attempt.checked = true;

        let item = &self.items[head];
        let result = AnswerResult::new(
            item.id.clone(),
            item.options[choice].clone(),
            item.correct_answer.clone(),
            duration_secs,
        );
        tracing::debug!(
            item = %item.id,
            correct = result.is_correct,
            secs = result.duration_secs,
            "answer checked"
        );
        self.results.push(result);
        self.results.last()
    }

    /// Continue past the current item once it has been checked.
    pub fn advance(&mut self) -> Advance {
        if !self.is_checked() {
            return Advance::Ignored;
        }
        let Some(head) = self.pending.pop_front() else {
            return Advance::Ignored;
        };

        let item_id = &self.items[head].id;
        let last_correct = self
            .results
            .iter()
            .rev()
            .find(|r| r.item_id == *item_id)
            .is_some_and(|r| r.is_correct);

        self.attempts.remove(&head);

        if last_correct {
            if self.pending.is_empty() {
                tracing::debug!(index = head, "last item mastered");
                Advance::Completed(head)
            } else {
                Advance::Removed(head)
            }
        } else {
            self.pending.push_back(head);
            tracing::debug!(index = head, remaining = self.pending.len(), "item requeued");
            Advance::Requeued(head)
        }
    }

    fn head_attempt(&self) -> Attempt {
        self.current()
            .and_then(|idx| self.attempts.get(&idx).copied())
            .unwrap_or_default()
    }
}
