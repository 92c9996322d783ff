use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use newsrag_cli::{
    format_answer, format_cleaning_report, format_eval_summary, format_indexing_result,
    print_error, AskOptions, CleanOptions, EvaluateOptions, IndexOptions, Settings,
};

#[derive(Parser)]
#[command(name = "newsrag")]
#[command(about = "Clean, index, query and evaluate a news-article RAG pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize the content of a raw corpus CSV
    Clean {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// TOML file replacing the built-in cleaning tables
        #[arg(long)]
        tables: Option<PathBuf>,
    },
    /// Chunk, embed and store a processed corpus
    Index {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Answer a question from the indexed corpus
    Ask {
        question: String,
        #[arg(short = 'k', long, default_value_t = 5)]
        top_k: usize,
        /// Processed corpus to index into memory when QDRANT_URL is unset
        #[arg(long)]
        corpus: Option<PathBuf>,
    },
    /// Score answers to gold questions and write a CSV report
    Evaluate {
        #[arg(short, long)]
        gold: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short = 'k', long, default_value_t = 5)]
        top_k: usize,
        #[arg(long)]
        corpus: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Clean {
            input,
            output,
            tables,
        } => {
            let report = newsrag_cli::clean(&CleanOptions {
                input,
                output,
                tables,
            })?;
            println!("{}", format_cleaning_report(&report));
        }
        Command::Index { input } => {
            let settings = Settings::from_env()?;
            let result = newsrag_cli::index(&IndexOptions { input }, &settings).await?;
            println!("{}", format_indexing_result(&result));
        }
        Command::Ask {
            question,
            top_k,
            corpus,
        } => {
            let settings = Settings::from_env()?;
            let options = AskOptions {
                question,
                top_k,
                corpus,
            };
            let answer = newsrag_cli::ask(&options, &settings).await?;
            println!("{}", format_answer(&answer));
        }
        Command::Evaluate {
            gold,
            output,
            top_k,
            corpus,
        } => {
            let settings = Settings::from_env()?;
            let options = EvaluateOptions {
                gold,
                output,
                top_k,
                corpus,
            };
            let report = newsrag_cli::evaluate(&options, &settings).await?;
            println!("{}", format_eval_summary(&report.summary));
            println!("Report written to {}", options.output.display());
        }
    }

    Ok(())
}
