//! The `quizloop validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(lesson_path: PathBuf) -> Result<()> {
    let lessons = if lesson_path.is_dir() {
        quizloop_core::parser::load_lesson_directory(&lesson_path)?
    } else {
        vec![quizloop_core::parser::parse_lesson(&lesson_path)?]
    };

    let mut total_warnings = 0;

    for lesson in &lessons {
        println!(
            "Lesson: {} ({} items, {} new words)",
            lesson.title,
            lesson.items.len(),
            lesson.new_words.len()
        );

        let warnings = quizloop_core::parser::validate_lesson(lesson);
        for w in &warnings {
            let prefix = w
                .item_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All lessons valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
