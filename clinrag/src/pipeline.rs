//! Guideline pipeline orchestrator.
//!
//! [`RagPipeline`] wires the build-time path
//! (extract → clean → chunk → index) and the query-time path
//! (retrieve → compose) from one [`RagConfig`] and explicitly supplied
//! providers.
//!
//! # Example
//!
//! ```rust,ignore
//! use clinrag::{FileVectorStore, RagConfig, RagPipeline};
//!
//! let config = RagConfig::default();
//! let pipeline = RagPipeline::builder()
//!     .vector_store(Arc::new(FileVectorStore::new(&config.index_path)))
//!     .config(config)
//!     .embedding_provider(Arc::new(embedder))
//!     .language_model(Arc::new(model))
//!     .build()?;
//!
//! let report = pipeline.ingest("data/raw_pdfs/guidelines.pdf").await?;
//! let answer = pipeline.ask("What is the dosage for artesunate?").await?;
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::chunking::{BoundaryChunker, Chunker};
use crate::composer::{AnswerComposer, GroundedAnswer};
use crate::config::RagConfig;
use crate::document::{Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::extract::{AutoExtractor, TextExtractor};
use crate::index::{IndexStore, IngestReport};
use crate::llm::LanguageModel;
use crate::noise::NoiseFilter;
use crate::retriever::Retriever;
use crate::vectorstore::VectorStore;

/// The ingestion and question-answering pipeline.
///
/// Construct one via [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    extractor: Arc<dyn TextExtractor>,
    noise_filter: NoiseFilter,
    chunker: Arc<dyn Chunker>,
    index: Arc<IndexStore>,
    composer: Arc<AnswerComposer>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// The index over the configured collection.
    pub fn index(&self) -> &Arc<IndexStore> {
        &self.index
    }

    /// The answer composer, shared with callers such as the evaluation harness.
    pub fn composer(&self) -> Arc<AnswerComposer> {
        Arc::clone(&self.composer)
    }

    /// Rebuild the collection from the document at `path`.
    ///
    /// The collection is dropped and recreated first, so re-running ingestion
    /// is idempotent. Batch failures do not abort the run; they are counted in
    /// the returned report and logged at the end.
    ///
    /// # Errors
    ///
    /// - [`RagError::NotFoundError`] / [`RagError::ExtractionError`] from extraction.
    /// - [`RagError::EmptyInputError`] if nothing is left after cleaning.
    /// - Store errors from recreating the collection.
    pub async fn ingest(&self, path: impl AsRef<Path>) -> Result<IngestReport> {
        let path = path.as_ref();
        let document = self.extractor.extract(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "extraction failed");
            e
        })?;
        info!(path = %path.display(), page_count = document.pages.len(), "extracted document");
        self.ingest_document(&document).await
    }

    /// Rebuild the collection from already-extracted pages.
    pub async fn ingest_text(&self, source: &str, pages: Vec<String>) -> Result<IngestReport> {
        self.ingest_document(&Document::new(source, pages)).await
    }

    async fn ingest_document(&self, document: &Document) -> Result<IngestReport> {
        let cleaned = self.noise_filter.clean_document(document);
        let source = self.config.source_name.as_deref().unwrap_or(&document.source);
        let passages = self.chunker.chunk(source, &cleaned)?;
        info!(source, passage_count = passages.len(), cleaned_chars = cleaned.len(), "chunked document");

        self.index.recreate().await?;
        let report = self.index.upsert(&passages).await;

        match report.partial_failure() {
            Some(failure) => warn!(source, error = %failure, "ingestion finished with skipped batches"),
            None => info!(source, stored = report.stored, "ingestion finished"),
        }
        Ok(report)
    }

    /// Retrieve the configured top-k passages for a question.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>> {
        self.composer.retriever().retrieve(question).await
    }

    /// Answer a question from the indexed guidelines.
    pub async fn ask(&self, question: &str) -> Result<String> {
        self.composer.answer(question).await
    }

    /// Answer a question and return the passages used as context.
    pub async fn ask_with_context(&self, question: &str) -> Result<GroundedAnswer> {
        self.composer.answer_with_context(question).await
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// The embedding provider, vector store and language model are required.
/// The config defaults to [`RagConfig::default()`], the extractor to
/// [`AutoExtractor`] and the chunker to a [`BoundaryChunker`] sized from the
/// config.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    language_model: Option<Arc<dyn LanguageModel>>,
    extractor: Option<Arc<dyn TextExtractor>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the language model used to compose answers.
    pub fn language_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.language_model = Some(model);
        self
    }

    /// Replace the default text extractor.
    pub fn extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Replace the default chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RagPipeline`], validating the config and required fields.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if a required field is missing or
    /// the configuration is inconsistent.
    pub fn build(self) -> Result<RagPipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let language_model = self
            .language_model
            .ok_or_else(|| RagError::ConfigError("language_model is required".to_string()))?;

        let chunker: Arc<dyn Chunker> = match self.chunker {
            Some(chunker) => chunker,
            None => Arc::new(BoundaryChunker::new(config.chunk_size, config.chunk_overlap)?),
        };
        let extractor: Arc<dyn TextExtractor> = match self.extractor {
            Some(extractor) => extractor,
            None => Arc::new(AutoExtractor),
        };

        let index = Arc::new(IndexStore::new(
            embedding_provider,
            vector_store,
            config.collection.clone(),
            config.batch_size,
        ));
        let retriever = Retriever::new(Arc::clone(&index), config.top_k);
        let composer = Arc::new(
            AnswerComposer::new(retriever, language_model).with_temperature(config.temperature),
        );

        Ok(RagPipeline {
            noise_filter: NoiseFilter::new(config.noise_policy),
            config,
            extractor,
            chunker,
            index,
            composer,
        })
    }
}
