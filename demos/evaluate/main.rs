//! # Evaluate
//!
//! Ingests the bundled malaria guideline, runs the labeled test set through
//! the answer composer and prints the score card.
//!
//! Scores come from `LexicalEvaluator`, a word-overlap evaluator that needs
//! no judge model.
//!
//! Run: `cargo run --example evaluate -- --limit 3`

#[path = "../common/mod.rs"]
mod common;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use clinrag::{InMemoryVectorStore, Preset, RagConfig, RagPipeline};
use clinrag_eval::{EvaluationHarness, LexicalEvaluator};
use common::{ExtractiveModel, HashingEmbedder};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "evaluate", about = "Score the pipeline against a labeled question set")]
struct Cli {
    /// JSON Lines file of {"question", "ground_truth"} objects.
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Only evaluate the first N questions.
    #[arg(long)]
    limit: Option<usize>,

    /// Where to write per-question results (JSON Lines).
    #[arg(long, default_value = "evaluation_results.jsonl")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    common::init_tracing();
    let cli = Cli::parse();

    let pipeline = RagPipeline::builder()
        .config(RagConfig::builder().preset(Preset::MalariaGuidelines).chunk_size(400).chunk_overlap(80).build()?)
        .embedding_provider(Arc::new(HashingEmbedder::new(256)))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .language_model(Arc::new(ExtractiveModel))
        .build()?;

    let report = pipeline.ingest(common::data_dir().join("malaria_guidelines.txt")).await?;
    info!(stored = report.stored, "guideline indexed");

    let mut harness = EvaluationHarness::new(pipeline.composer(), Arc::new(LexicalEvaluator::new()));
    if let Some(limit) = cli.limit {
        harness = harness.with_limit(limit);
    }

    let dataset = cli.dataset.unwrap_or_else(|| common::data_dir().join("clinical_testset.jsonl"));
    let report = harness.run_file(&dataset).await?;

    println!("{report}");
    for row in &report.rows {
        println!("\nQ: {}\nA: {}", row.record.question, row.record.answer);
    }

    report.write_results(&cli.output)?;
    println!("\nDetailed results saved to: {}", cli.output.display());
    Ok(())
}
