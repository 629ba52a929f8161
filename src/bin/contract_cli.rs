use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use contract_assistant::{config::Config, logging, processing::ContractService};

#[derive(Parser)]
#[command(
    name = "contract-cli",
    about = "Extract, summarize, query, and search a contract file locally"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the extracted text.
    Extract {
        #[arg(long)]
        file: PathBuf,
    },
    /// Print summary bullets.
    Summarize {
        #[arg(long)]
        file: PathBuf,
    },
    /// Answer a question about the contract.
    Ask {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        question: String,
        /// Summarize first so the answer can use the summary bullets.
        #[arg(long)]
        with_summary: bool,
    },
    /// Print every occurrence of a phrase with context.
    Search {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        query: String,
    },
}

impl Command {
    fn file(&self) -> &PathBuf {
        match self {
            Self::Extract { file }
            | Self::Summarize { file }
            | Self::Ask { file, .. }
            | Self::Search { file, .. } => file,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init_cli_tracing();
    let cli = Cli::parse();
    let config = Config::from_env().context("loading configuration")?;
    let service = ContractService::from_config(&config);

    let path = cli.command.file();
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let filename = path.file_name().and_then(|name| name.to_str());
    let upload = service
        .upload(filename, bytes)
        .await
        .with_context(|| format!("extracting {}", path.display()))?;
    tracing::info!(
        num_characters = upload.num_characters,
        ocr_used = upload.ocr_used,
        "Contract loaded"
    );
    let id = upload.document_id.as_str();

    match &cli.command {
        Command::Extract { .. } => {
            let text = service.document_text(id).unwrap_or_default();
            println!("{text}");
        }
        Command::Summarize { .. } => {
            let summary = service.summarize(id).await?;
            for bullet in &summary.summary {
                println!("- {bullet}");
            }
            eprintln!("(model: {})", summary.model_name);
        }
        Command::Ask {
            question,
            with_summary,
            ..
        } => {
            if *with_summary {
                service.summarize(id).await?;
            }
            let chat = service.ask(id, question).await?;
            println!("{}", chat.answer);
            eprintln!("(model: {})", chat.model_name);
        }
        Command::Search { query, .. } => {
            let results = service.search(id, query).await?;
            if results.is_empty() {
                eprintln!("No matches for '{query}'");
            }
            for (index, snippet) in results.iter().enumerate() {
                println!("[{}] {}", index + 1, snippet.replace('\n', " "));
            }
        }
    }
    Ok(())
}
