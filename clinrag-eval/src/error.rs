//! Error types for the evaluation harness.

use clinrag::RagError;
use thiserror::Error;

/// Errors that can occur during an evaluation run.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A pipeline call failed while answering a question.
    #[error(transparent)]
    Rag(#[from] RagError),

    /// The dataset file does not exist.
    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    /// A dataset line could not be parsed.
    #[error("Invalid dataset '{path}' at line {line}: {message}")]
    Dataset {
        /// Dataset file being read.
        path: String,
        /// 1-based line number of the bad entry.
        line: usize,
        /// Parser message for the line.
        message: String,
    },

    /// The metric evaluator failed or returned unusable output.
    #[error("Metric evaluator '{evaluator}' failed: {message}")]
    Metric {
        /// Name of the evaluator that failed.
        evaluator: String,
        /// What went wrong.
        message: String,
    },

    /// Reading the dataset or writing results failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing results failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;
