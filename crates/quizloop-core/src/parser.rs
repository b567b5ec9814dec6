//! TOML lesson parser.
//!
//! Loads lessons from TOML files and directories, and validates their content.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Lesson, NewWord, QuizItem, QuizKind, BLANK_MARKER};

/// Intermediate TOML structure for parsing lesson files.
#[derive(Debug, Deserialize)]
struct TomlLessonFile {
    lesson: TomlLessonHeader,
    #[serde(default)]
    new_words: Vec<TomlNewWord>,
    #[serde(default)]
    items: Vec<TomlQuizItem>,
}

#[derive(Debug, Deserialize)]
struct TomlLessonHeader {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlNewWord {
    id: String,
    word: String,
    meaning: String,
    #[serde(default)]
    example: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlQuizItem {
    id: String,
    prompt: String,
    options: Vec<String>,
    answer: String,
    #[serde(default)]
    kind: Option<String>,
}

/// Parse a single TOML file into a `Lesson`.
pub fn parse_lesson(path: &Path) -> Result<Lesson> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read lesson file: {}", path.display()))?;

    parse_lesson_str(&content, path)
}

/// Parse a TOML string into a `Lesson` (useful for testing).
pub fn parse_lesson_str(content: &str, source_path: &Path) -> Result<Lesson> {
    let parsed: TomlLessonFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let items = parsed
        .items
        .into_iter()
        .map(|i| {
            let kind = match i.kind {
                Some(k) => k.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?,
                None if i.prompt.contains(BLANK_MARKER) => QuizKind::FillInBlank,
                None => QuizKind::MultipleChoice,
            };
            Ok(QuizItem {
                id: i.id,
                prompt: i.prompt,
                options: i.options,
                correct_answer: i.answer,
                kind,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let new_words = parsed
        .new_words
        .into_iter()
        .map(|w| NewWord {
            id: w.id,
            word: w.word,
            meaning: w.meaning,
            example: w.example,
        })
        .collect();

    Ok(Lesson {
        id: parsed.lesson.id,
        title: parsed.lesson.title,
        description: parsed.lesson.description,
        new_words,
        items,
    })
}

/// Recursively load all `.toml` lesson files from a directory.
pub fn load_lesson_directory(dir: &Path) -> Result<Vec<Lesson>> {
    let mut lessons = Vec::new();
    load_recursive(dir, &mut lessons)?;
    lessons.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(lessons)
}

fn load_recursive(dir: &Path, lessons: &mut Vec<Lesson>) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            load_recursive(&path, lessons)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            lessons.push(parse_lesson(&path)?);
        }
    }

    Ok(())
}

/// A content problem found during validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The item ID (if applicable).
    pub item_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a lesson for content defects.
///
/// None of these stop a session from running; an item whose correct answer
/// is not among its options simply can never be answered correctly.
pub fn validate_lesson(lesson: &Lesson) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let warn = |item: &QuizItem, message: String| ValidationWarning {
        item_id: Some(item.id.clone()),
        message,
    };

    if lesson.items.is_empty() {
        warnings.push(ValidationWarning {
            item_id: None,
            message: "lesson has no quiz items".into(),
        });
    }

    let mut seen_ids = std::collections::HashSet::new();
    for item in &lesson.items {
        if !seen_ids.insert(&item.id) {
            warnings.push(warn(item, format!("duplicate item ID: {}", item.id)));
        }
    }

    for item in &lesson.items {
        if item.prompt.trim().is_empty() {
            warnings.push(warn(item, "prompt is empty".into()));
        }

        if item.options.len() < 2 {
            warnings.push(warn(
                item,
                format!("needs at least 2 options, has {}", item.options.len()),
            ));
        }

        match item
            .options
            .iter()
            .filter(|o| **o == item.correct_answer)
            .count()
        {
            0 => warnings.push(warn(
                item,
                format!("answer '{}' is not among the options", item.correct_answer),
            )),
            1 => {}
            n => warnings.push(warn(
                item,
                format!("answer '{}' appears {n} times in options", item.correct_answer),
            )),
        }

        if item.kind == QuizKind::FillInBlank && !item.prompt.contains(BLANK_MARKER) {
            warnings.push(warn(
                item,
                format!("fill-in-blank prompt has no {BLANK_MARKER} marker"),
            ));
        }
    }

    let mut seen_words = std::collections::HashSet::new();
    for word in &lesson.new_words {
        if !seen_words.insert(&word.id) {
            warnings.push(ValidationWarning {
                item_id: Some(word.id.clone()),
                message: format!("duplicate new word ID: {}", word.id),
            });
        }
    }

    warnings
}
