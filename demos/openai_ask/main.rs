//! # OpenAI Ask
//!
//! The production setup: OpenAI embeddings, `gpt-4o` at temperature 0 and a
//! persisted `FileVectorStore`.
//!
//! Requires `OPENAI_API_KEY`.
//!
//! Run: `cargo run --example openai_ask --features openai -- --document guidelines.txt "What is the dosage for artesunate?"`

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use clinrag::openai::{OpenAIChatModel, OpenAIEmbeddingProvider};
use clinrag::{FileVectorStore, RagConfig, RagPipeline};

#[derive(Parser, Debug)]
#[command(name = "openai_ask", about = "Answer a question from clinical guidelines with OpenAI models")]
struct Cli {
    /// Rebuild the index from this document before answering.
    #[arg(long)]
    document: Option<PathBuf>,

    /// Optional JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// The question to answer.
    question: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RagConfig::from_json_file(path)?,
        None => RagConfig::default(),
    };

    let pipeline = RagPipeline::builder()
        .vector_store(Arc::new(FileVectorStore::new(&config.index_path)))
        .config(config)
        .embedding_provider(Arc::new(OpenAIEmbeddingProvider::from_env()?))
        .language_model(Arc::new(OpenAIChatModel::from_env()?))
        .build()?;

    if let Some(document) = &cli.document {
        let report = pipeline.ingest(document).await?;
        if let Some(failure) = report.partial_failure() {
            eprintln!("warning: {failure}");
        }
        println!("Indexed {} passage(s) from {}", report.stored, document.display());
    }

    println!("{}", pipeline.ask(&cli.question).await?);
    Ok(())
}
