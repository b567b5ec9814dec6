//! The `quizloop study` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use quizloop_core::model::Lesson;
use quizloop_core::parser;
use quizloop_core::persist::persist_outcome;
use quizloop_core::report::SessionLog;
use quizloop_core::session::{LessonSession, SessionOutcome};
use quizloop_core::traits::ProgressStore;
use quizloop_store::config::load_config_from;

pub async fn execute(
    lesson_path: PathBuf,
    learner: Option<String>,
    skip_intro: bool,
    log_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let lesson = parser::parse_lesson(&lesson_path)?;
    anyhow::ensure!(
        !lesson.items.is_empty(),
        "lesson '{}' has no quiz items",
        lesson.id
    );

    let warnings = parser::validate_lesson(&lesson);
    if !warnings.is_empty() {
        eprintln!(
            "Warning: lesson '{}' has {} content issue(s); run `quizloop validate` for details.",
            lesson.id,
            warnings.len()
        );
    }

    let learner = learner.unwrap_or_else(|| config.default_learner.clone());
    let store = config.open_store();
    let policy = config.retry_policy();

    let item_ids: Vec<String> = lesson.items.iter().map(|i| i.id.clone()).collect();
    let existing = store.load_proficiency(&learner, &item_ids).await?;
    tracing::debug!(
        store = store.name(),
        learner = %learner,
        items = existing.len(),
        "loaded proficiency"
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    if !skip_intro {
        print_intro(&lesson, &mut out)?;
    }

    let mut session = LessonSession::new(&lesson, existing, config.scoring.clone());
    let Some(outcome) = run_session(&mut session, &mut input, &mut out)? else {
        writeln!(out, "\nSession abandoned, progress not saved.")?;
        return Ok(());
    };

    print_summary(&outcome, &mut out)?;
    // The log is the only copy of the outcome if the store write fails.
    if let Some(path) = &log_path {
        SessionLog::from_outcome(&learner, &outcome).save_json(path)?;
        writeln!(out, "Answer log saved to: {}", path.display())?;
    }
    persist_outcome(&store, &learner, &outcome, &policy)
        .await
        .context("progress was not saved")?;

    // Keep reviewing mistakes until the learner declines or makes none.
    let mut previous = (session, outcome);
    while let Some(mut review) = previous.0.review_mistakes(Some(&previous.1)) {
        write!(
            out,
            "\nReview {} missed word(s)? [y/N] ",
            review.total_items()
        )?;
        out.flush()?;
        if !read_yes(&mut input)? {
            break;
        }

        let Some(outcome) = run_session(&mut review, &mut input, &mut out)? else {
            writeln!(out, "\nReview abandoned, progress not saved.")?;
            return Ok(());
        };
        print_summary(&outcome, &mut out)?;
        persist_outcome(&store, &learner, &outcome, &policy)
            .await
            .context("review progress was not saved")?;
        previous = (review, outcome);
    }

    Ok(())
}

fn print_intro(lesson: &Lesson, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", lesson.title)?;
    if !lesson.description.is_empty() {
        writeln!(out, "{}", lesson.description)?;
    }
    if lesson.new_words.is_empty() {
        return Ok(());
    }
    writeln!(out, "\nNew words:")?;
    for word in &lesson.new_words {
        writeln!(out, "  {} - {}", word.word, word.meaning)?;
        if let Some(example) = &word.example {
            writeln!(out, "      e.g. {example}")?;
        }
    }
    Ok(())
}

/// Drive `session` from line-based input until it completes.
///
/// Returns `None` if the input ends or the learner quits first.
pub(crate) fn run_session(
    session: &mut LessonSession,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Option<SessionOutcome>> {
    while let Some(item) = session.current().cloned() {
        writeln!(out, "\n[{} left] {}", session.remaining(), item.prompt)?;
        for (i, option) in item.options.iter().enumerate() {
            writeln!(out, "  {}) {}", i + 1, option)?;
        }

        let shown = Instant::now();
        let choice = loop {
            write!(out, "> ")?;
            out.flush()?;
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let line = line.trim();
            if line.eq_ignore_ascii_case("q") {
                return Ok(None);
            }
            match line.parse::<usize>() {
                Ok(n) if (1..=item.options.len()).contains(&n) => break n - 1,
                _ => writeln!(
                    out,
                    "Enter a number between 1 and {}, or q to quit.",
                    item.options.len()
                )?,
            }
        };

        session.select(choice);
        let secs = u32::try_from(shown.elapsed().as_secs()).unwrap_or(u32::MAX);
        if let Some(result) = session.check(secs) {
            if result.is_correct {
                writeln!(out, "Correct!")?;
            } else {
                writeln!(out, "Not quite. The answer is: {}", result.correct_answer)?;
            }
        }

        if let Some(outcome) = session.advance() {
            return Ok(Some(outcome));
        }
    }

    Ok(None)
}

fn read_yes(input: &mut impl BufRead) -> Result<bool> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_summary(outcome: &SessionOutcome, out: &mut impl Write) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Checks", "Correct", "EXP", "Best streak", "Time"]);
    table.add_row(vec![
        Cell::new(outcome.answers.len()),
        Cell::new(outcome.correct_count()),
        Cell::new(format!("+{}", outcome.exp_gained)),
        Cell::new(outcome.max_streak),
        Cell::new(format!("{}s", outcome.total_secs)),
    ]);
    writeln!(out, "\nSession complete!\n{table}")?;

    if !outcome.per_item.is_empty() {
        let mut words = Table::new();
        words.set_header(vec!["Word", "Proficiency"]);
        for (id, value) in &outcome.per_item {
            words.add_row(vec![Cell::new(id), Cell::new(format!("{:.0}%", value * 100.0))]);
        }
        writeln!(out, "{words}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use quizloop_core::model::{QuizItem, QuizKind};
    use quizloop_core::scoring::ScoringConfig;

    fn session() -> LessonSession {
        let items = vec![
            QuizItem {
                id: "cow".into(),
                prompt: "The ___ gives milk.".into(),
                options: vec!["cow".into(), "hen".into()],
                correct_answer: "cow".into(),
                kind: QuizKind::FillInBlank,
            },
            QuizItem {
                id: "hen".into(),
                prompt: "Which lays eggs?".into(),
                options: vec!["cow".into(), "hen".into()],
                correct_answer: "hen".into(),
                kind: QuizKind::MultipleChoice,
            },
        ];
        let existing = HashMap::from([("cow".to_string(), 0.0), ("hen".to_string(), 0.0)]);
        LessonSession::from_items("farm", items, existing, ScoringConfig::default())
    }

    #[test]
    fn scripted_input_completes_session() {
        let mut s = session();
        // cow wrong, hen right, cow right
        let mut input = "2\n2\n1\n".as_bytes();
        let mut out = Vec::new();

        let outcome = run_session(&mut s, &mut input, &mut out).unwrap().unwrap();
        assert_eq!(outcome.answers.len(), 3);
        assert_eq!(outcome.exp_gained, 4);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Not quite. The answer is: cow"));
        assert!(text.contains("Correct!"));
    }

    #[test]
    fn invalid_input_is_reprompted() {
        let mut s = session();
        let mut input = "banana\n7\n1\n2\n".as_bytes();
        let mut out = Vec::new();

        let outcome = run_session(&mut s, &mut input, &mut out).unwrap().unwrap();
        assert_eq!(outcome.answers.len(), 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Enter a number between 1 and 2").count(), 2);
    }

    #[test]
    fn eof_abandons_session() {
        let mut s = session();
        let mut input = "1\n".as_bytes();
        let mut out = Vec::new();

        assert!(run_session(&mut s, &mut input, &mut out).unwrap().is_none());
        assert!(!s.is_complete());
    }

    #[test]
    fn quit_abandons_session() {
        let mut s = session();
        let mut input = "q\n".as_bytes();
        let mut out = Vec::new();
        assert!(run_session(&mut s, &mut input, &mut out).unwrap().is_none());
        assert!(s.results().is_empty());
    }

    #[test]
    fn read_yes_accepts_y_and_yes() {
        assert!(read_yes(&mut "y\n".as_bytes()).unwrap());
        assert!(read_yes(&mut "YES\n".as_bytes()).unwrap());
        assert!(!read_yes(&mut "n\n".as_bytes()).unwrap());
        assert!(!read_yes(&mut "".as_bytes()).unwrap());
    }
}
