//! # Ingest and Ask
//!
//! Builds the guideline index from a paginated document, then answers
//! questions from it.
//!
//! Uses `FileVectorStore`, a deterministic `HashingEmbedder` and an
//! `ExtractiveModel` mock so it runs with **zero API keys**. The index is
//! written under the configured `index_path`; pass `--skip-ingest` on a
//! second run to query the persisted index without rebuilding it.
//!
//! Run: `cargo run --example ingest_and_ask -- --question "What is the dosage for artesunate?"`

#[path = "../common/mod.rs"]
mod common;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use clinrag::{FileVectorStore, Preset, RagConfig, RagPipeline};
use common::{ExtractiveModel, HashingEmbedder};

#[derive(Parser, Debug)]
#[command(name = "ingest_and_ask", about = "Index a guideline document and ask it questions")]
struct Cli {
    /// Guideline document (.txt with form-feed page breaks, or .pdf with the `pdf` feature).
    #[arg(long)]
    document: Option<PathBuf>,

    /// Optional JSON config file; defaults to the malaria preset.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Question to ask; repeat for several.
    #[arg(long = "question", short = 'q')]
    questions: Vec<String>,

    /// Query the existing index instead of rebuilding it.
    #[arg(long)]
    skip_ingest: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    common::init_tracing();
    let cli = Cli::parse();

    // -- 1. Configure ------------------------------------------------------
    let config = match &cli.config {
        Some(path) => RagConfig::from_json_file(path)?,
        None => RagConfig::builder()
            .preset(Preset::MalariaGuidelines)
            .chunk_size(400)
            .chunk_overlap(80)
            .index_path(std::env::temp_dir().join("clinrag_demo_index"))
            .build()?,
    };

    // -- 2. Build the pipeline ---------------------------------------------
    let pipeline = RagPipeline::builder()
        .vector_store(Arc::new(FileVectorStore::new(&config.index_path)))
        .config(config)
        .embedding_provider(Arc::new(HashingEmbedder::new(256)))
        .language_model(Arc::new(ExtractiveModel))
        .build()?;

    // -- 3. Ingest -----------------------------------------------------------
    if !cli.skip_ingest {
        let document =
            cli.document.unwrap_or_else(|| common::data_dir().join("malaria_guidelines.txt"));
        let report = pipeline.ingest(&document).await?;
        println!(
            "Indexed {} passage(s) from {} into '{}' ({} of {} batches failed)",
            report.stored,
            document.display(),
            pipeline.config().collection,
            report.failed_batches,
            report.batches,
        );
    }

    // -- 4. Ask ---------------------------------------------------------------
    let questions = if cli.questions.is_empty() {
        vec![
            "What is the dosage for artesunate?".to_string(),
            "How is malaria diagnosis confirmed?".to_string(),
            "What is the first-line treatment for dengue fever?".to_string(),
        ]
    } else {
        cli.questions
    };

    for question in &questions {
        let grounded = pipeline.ask_with_context(question).await?;
        println!("\nQ: {question}");
        println!("A: {}", grounded.answer);
        for (i, result) in grounded.contexts.iter().enumerate() {
            let preview: String = result.passage.text.chars().take(80).collect();
            println!("   {}. [score={:.4}] {} | {}", i + 1, result.score, result.passage.id, preview.replace('\n', " "));
        }
    }

    Ok(())
}
