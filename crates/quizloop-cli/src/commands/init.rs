//! The `quizloop init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create quizloop.toml
    if std::path::Path::new("quizloop.toml").exists() {
        println!("quizloop.toml already exists, skipping.");
    } else {
        std::fs::write("quizloop.toml", SAMPLE_CONFIG)?;
        println!("Created quizloop.toml");
    }

    // Create example lesson
    std::fs::create_dir_all("lessons")?;
    let example_path = std::path::Path::new("lessons/example.toml");
    if example_path.exists() {
        println!("lessons/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_LESSON)?;
        println!("Created lessons/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit quizloop.toml to set your learner name");
    println!("  2. Run: quizloop validate --lesson lessons/example.toml");
    println!("  3. Run: quizloop study --lesson lessons/example.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizloop configuration

store_path = "./quizloop-data/progress.json"
default_learner = "learner"
max_retries = 3
retry_delay_ms = 200

# Scoring engine overrides (defaults shown)
[scoring]
decay = 0.85
gain = 0.6
fast_secs = 3.0
slow_secs = 10.0
slow_weight = 0.2
time_drop = 0.6
exp_per_correct = 2
"#;

const EXAMPLE_LESSON: &str = r#"[lesson]
id = "example"
title = "Example Lesson"
description = "A few everyday verbs to get started"

[[new_words]]
id = "borrow"
word = "borrow"
meaning = "to take something with the promise to give it back"
example = "Can I borrow your pen?"

[[new_words]]
id = "lend"
word = "lend"
meaning = "to give something to someone for a short time"
example = "She will lend me her bike."

[[items]]
id = "borrow"
prompt = "May I ___ your umbrella until tomorrow?"
options = ["borrow", "lend", "keep", "owe"]
answer = "borrow"

[[items]]
id = "lend"
prompt = "Which word means to give something for a short time?"
options = ["borrow", "steal", "lend", "sell"]
answer = "lend"
"#;
