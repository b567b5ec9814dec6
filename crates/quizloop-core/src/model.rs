//! Core data model types for quizloop.
//!
//! These are the fundamental types that the entire quizloop system uses
//! to represent lessons, quiz items, and submitted answers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marker substring standing in for the missing word of a fill-in-blank prompt.
pub const BLANK_MARKER: &str = "___";

/// A single question unit shown during a lesson session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizItem {
    /// Vocabulary concept being tested. Stable across repeated appearances.
    pub id: String,
    /// Question text. Fill-in-blank prompts contain [`BLANK_MARKER`].
    pub prompt: String,
    /// Candidate answers, in display order.
    pub options: Vec<String>,
    /// The exact string among `options` that is correct.
    pub correct_answer: String,
    /// Question style. Does not change queue behavior.
    #[serde(default)]
    pub kind: QuizKind,
}

impl QuizItem {
    /// Position of the correct answer in `options`, matched exactly.
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.correct_answer)
    }

    /// Option text at `choice`, if in range.
    pub fn option(&self, choice: usize) -> Option<&str> {
        self.options.get(choice).map(String::as_str)
    }
}

/// Question styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizKind {
    FillInBlank,
    #[default]
    MultipleChoice,
}

impl fmt::Display for QuizKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizKind::FillInBlank => write!(f, "fill-in-blank"),
            QuizKind::MultipleChoice => write!(f, "multiple-choice"),
        }
    }
}

impl FromStr for QuizKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fill-in-blank" | "fill_in_blank" | "blank" => Ok(QuizKind::FillInBlank),
            "multiple-choice" | "multiple_choice" | "choice" | "mc" => {
                Ok(QuizKind::MultipleChoice)
            }
            other => Err(format!("unknown quiz kind: {other}")),
        }
    }
}

/// A word introduced at the start of a lesson, before the quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWord {
    pub id: String,
    pub word: String,
    pub meaning: String,
    #[serde(default)]
    pub example: Option<String>,
}

/// A lesson payload: new words to introduce plus the quiz items to drill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    /// Unique identifier for this lesson.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub new_words: Vec<NewWord>,
    #[serde(default)]
    pub items: Vec<QuizItem>,
}

/// Record of one check action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub item_id: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    /// Response latency in whole seconds, never below 1.
    pub duration_secs: u32,
}

impl AnswerResult {
    /// Build a result, deriving correctness and clamping the duration to at least 1s.
    pub fn new(
        item_id: impl Into<String>,
        user_answer: impl Into<String>,
        correct_answer: impl Into<String>,
        duration_secs: u32,
    ) -> Self {
        let user_answer = user_answer.into();
        let correct_answer = correct_answer.into();
        Self {
            item_id: item_id.into(),
            is_correct: user_answer == correct_answer,
            user_answer,
            correct_answer,
            duration_secs: duration_secs.max(1),
        }
    }
}
