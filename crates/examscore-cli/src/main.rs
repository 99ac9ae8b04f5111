//! examscore CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "examscore",
    version,
    about = "Exam answer scoring and candidate reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score an answer sheet against a question bank
    Evaluate {
        /// Path to .toml question bank or directory
        #[arg(long)]
        questions: PathBuf,

        /// Answer sheet JSON (question id -> answer)
        #[arg(long)]
        answers: PathBuf,

        /// Compare answers case-sensitively
        #[arg(long)]
        case_sensitive: bool,

        /// Award partial credit for near misses
        #[arg(long)]
        partial_credit: bool,

        /// Enable fuzzy matching
        #[arg(long)]
        fuzzy: bool,

        /// Similarity needed for a fuzzy match (0.0 - 1.0)
        #[arg(long)]
        fuzzy_threshold: Option<f64>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate candidate reports for completed sessions
    Report {
        /// Session ids (comma-separated), or "all"
        #[arg(long)]
        session: String,

        /// Exam data export (file or directory), overrides the config
        #[arg(long)]
        data: Option<PathBuf>,

        /// Output format: json, html, markdown, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Max reports generated concurrently
        #[arg(long)]
        parallelism: Option<usize>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to question bank file or directory
        #[arg(long)]
        questions: PathBuf,
    },

    /// Create starter config, question bank and sample data
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examscore=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            questions,
            answers,
            case_sensitive,
            partial_credit,
            fuzzy,
            fuzzy_threshold,
            format,
            config,
        } => commands::evaluate::execute(commands::evaluate::EvaluateArgs {
            questions,
            answers,
            case_sensitive,
            partial_credit,
            fuzzy,
            fuzzy_threshold,
            format,
            config,
        }),
        Commands::Report {
            session,
            data,
            format,
            output,
            parallelism,
            config,
        } => commands::report::execute(session, data, format, output, parallelism, config).await,
        Commands::Validate { questions } => commands::validate::execute(questions),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
