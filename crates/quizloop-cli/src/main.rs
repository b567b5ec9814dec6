//! quizloop CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizloop", version, about = "Terminal vocabulary lessons with adaptive review")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Study a lesson interactively
    Study {
        /// Path to a .toml lesson file
        #[arg(long)]
        lesson: PathBuf,

        /// Learner name (default: from config)
        #[arg(long)]
        learner: Option<String>,

        /// Skip the new-word introduction
        #[arg(long)]
        skip_intro: bool,

        /// Also write the answer log as JSON to this path
        #[arg(long)]
        log: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score a saved answer log offline
    Score {
        /// Session log JSON written by `study --log`
        #[arg(long)]
        log: PathBuf,

        /// JSON object mapping item id to existing proficiency
        #[arg(long)]
        proficiency: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate lesson TOML files
    Validate {
        /// Path to lesson file or directory
        #[arg(long)]
        lesson: PathBuf,
    },

    /// Show stored proficiency for a learner
    Progress {
        /// Learner name (default: from config)
        #[arg(long)]
        learner: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Rank learners by total EXP
    Leaderboard {
        /// Number of learners to show
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example lesson
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizloop=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Study {
            lesson,
            learner,
            skip_intro,
            log,
            config,
        } => commands::study::execute(lesson, learner, skip_intro, log, config).await,
        Commands::Score {
            log,
            proficiency,
            config,
        } => commands::score::execute(log, proficiency, config),
        Commands::Validate { lesson } => commands::validate::execute(lesson),
        Commands::Progress { learner, config } => {
            commands::progress::execute(learner, config).await
        }
        Commands::Leaderboard { limit, config } => {
            commands::leaderboard::execute(limit, config).await
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
