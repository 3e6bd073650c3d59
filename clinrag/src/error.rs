//! Error types for the `clinrag` crate.

use thiserror::Error;

/// Errors that can occur while ingesting guidelines or answering questions.
#[derive(Debug, Error)]
pub enum RagError {
    /// A document path or a named collection does not exist.
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// The document exists but its content could not be read.
    #[error("Extraction error ({path}): {message}")]
    ExtractionError {
        /// The document path that failed to extract.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// There was nothing left to chunk after cleaning.
    #[error("Empty input: {0}")]
    EmptyInputError(String),

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// Answer generation failed, either while embedding the question or
    /// while calling the language model.
    #[error("Generation error ({provider}): {message}")]
    GenerationError {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// One or more index batches were skipped during a bulk upsert.
    ///
    /// Non-fatal: ingestion continues and reports this at the end of the run.
    #[error("{failed} of {total} index batches failed")]
    BatchPartialFailure {
        /// Number of batches that were skipped.
        failed: usize,
        /// Number of batches attempted.
        total: usize,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl RagError {
    /// Re-label a provider failure as a [`RagError::GenerationError`].
    ///
    /// Missing collections and other non-provider errors pass through unchanged.
    pub(crate) fn into_generation(self) -> Self {
        match self {
            RagError::EmbeddingError { provider, message } => {
                RagError::GenerationError { provider, message }
            }
            RagError::VectorStoreError { backend, message } => {
                RagError::GenerationError { provider: backend, message }
            }
            other => other,
        }
    }
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
