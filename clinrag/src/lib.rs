//! # clinrag
//!
//! Grounded question answering over clinical guideline documents.
//!
//! ```text
//! build time:  document -> extract -> noise filter -> chunk -> embed -> index
//! query time:  question -> embed -> top-k retrieve -> grounding prompt -> model -> answer
//! ```
//!
//! Embedding and language-model providers are passed in explicitly as trait
//! objects, so the whole pipeline runs against deterministic mocks in tests.
//!
//! ## Features
//!
//! - `openai` – [`openai::OpenAIEmbeddingProvider`] and [`openai::OpenAIChatModel`]
//! - `pdf` – PDF text extraction via `lopdf`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
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
//! pipeline.ingest("guidelines.pdf").await?;
//! println!("{}", pipeline.ask("What is the dosage for artesunate?").await?);
//! ```

pub mod chunking;
pub mod composer;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod filestore;
pub mod index;
pub mod inmemory;
pub mod llm;
pub mod noise;
pub mod pipeline;
pub mod retriever;
pub mod vectorstore;

#[cfg(feature = "openai")]
pub mod openai;

pub use chunking::{BoundaryChunker, Chunker};
pub use composer::{
    AnswerComposer, CONTEXT_SEPARATOR, FALLBACK_ANSWER, GroundedAnswer, SYSTEM_INSTRUCTION,
    format_context, format_user_prompt,
};
pub use config::{Preset, RagConfig, RagConfigBuilder};
pub use document::{Document, EmbeddingRecord, Passage, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
#[cfg(feature = "pdf")]
pub use extract::PdfExtractor;
pub use extract::{AutoExtractor, PlainTextExtractor, TextExtractor};
pub use filestore::FileVectorStore;
pub use index::{IndexStore, IngestReport};
pub use inmemory::InMemoryVectorStore;
pub use llm::LanguageModel;
pub use noise::{NoiseFilter, NoisePolicy};
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use retriever::Retriever;
pub use vectorstore::VectorStore;
