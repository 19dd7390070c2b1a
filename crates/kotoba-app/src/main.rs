use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use kotoba_config::{Config, Credentials};
use kotoba_pipeline::Pipeline;
use kotoba_store::Store;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kotoba", about = "Generate Japanese Anki cards from raw input")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process one Japanese input into a card
    Process {
        input: String,
        /// API key override for this run
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Process a newline-delimited input file, one card per line
    Bulk {
        file: PathBuf,
        #[arg(long)]
        api_key: Option<String>,
    },
    /// List stored cards, newest first
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one card by id
    Show { id: String },
    /// Store statistics
    Stats,
    /// Print the default system prompt
    Prompt,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::new();

    match cli.command {
        Command::Process { input, api_key } => process(config, input, api_key).await,
        Command::Bulk { file, api_key } => bulk(config, file, api_key).await,
        Command::List { page, limit, search } => list(config, page, limit, search),
        Command::Show { id } => show(config, &id),
        Command::Stats => stats(config),
        Command::Prompt => {
            println!("{}", kotoba_llm::default_system_prompt());
            Ok(())
        }
    }
}

/// Log pipeline progress as it arrives.
fn spawn_progress_drain() -> kotoba_pipeline::ProgressSender {
    let (tx, rx): (kotoba_pipeline::ProgressSender, _) = kanal::unbounded_async();
    tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            tracing::info!(stage = %event.stage, "{}", event.message);
        }
    });
    tx
}

async fn process(config: Config, input: String, api_key: Option<String>) -> anyhow::Result<()> {
    let pipeline = Pipeline::new(config)?;
    let credentials = Credentials { api_key };
    let progress = spawn_progress_drain();

    match pipeline
        .process_input(&input, Some(&credentials), Some(&progress))
        .await?
    {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        None => {
            tracing::warn!("empty input, nothing to process");
        }
    }
    Ok(())
}

async fn bulk(config: Config, file: PathBuf, api_key: Option<String>) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("could not read input file {}", file.display()))?;
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    anyhow::ensure!(!lines.is_empty(), "no valid inputs found in file");

    tracing::info!("found {} input(s) to process", lines.len());

    let pipeline = Pipeline::new(config)?;
    let credentials = Credentials { api_key };
    let progress = spawn_progress_drain();

    let report = pipeline
        .process_lines(lines, Some(&credentials), Some(&progress))
        .await;

    for error in &report.errors {
        tracing::error!("failed: {} ({})", error.input, error.error);
    }
    tracing::info!(
        "completed: processed {} of {} inputs ({} failed)",
        report.processed,
        report.total,
        report.failed
    );
    tracing::info!(
        "output: {} / {}",
        pipeline.store().data_json_path().display(),
        pipeline.store().csv_path().display()
    );
    Ok(())
}

fn list(config: Config, page: usize, limit: usize, search: Option<String>) -> anyhow::Result<()> {
    let store = Store::new(&config.storage);
    let result = store.paginate(page, limit, search.as_deref());
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn show(config: Config, id: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.storage);
    match store.card_by_id(id) {
        Some(card) => {
            println!("{}", serde_json::to_string_pretty(&card)?);
            Ok(())
        }
        None => anyhow::bail!("card not found: {id}"),
    }
}

fn stats(config: Config) -> anyhow::Result<()> {
    let store = Store::new(&config.storage);
    println!("{}", serde_json::to_string_pretty(&store.stats())?);
    Ok(())
}
