//! Data types for documents, passages, embedding records and search results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata key holding the source document name.
pub const META_SOURCE: &str = "source";
/// Metadata key holding the passage ordinal within its source.
pub const META_CHUNK_INDEX: &str = "chunk_index";
/// Metadata key holding the passage's char offset in the cleaned text.
pub const META_START_CHAR: &str = "start_char";

/// An extracted source document: page texts in document order.
///
/// Lives for one ingestion run and is discarded after chunking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Name of the source, attached to every passage as metadata.
    pub source: String,
    /// Extracted text of each page, embedded line breaks preserved.
    pub pages: Vec<String>,
}

impl Document {
    /// Create a document from its source name and page texts.
    pub fn new(source: impl Into<String>, pages: Vec<String>) -> Self {
        Self { source: source.into(), pages }
    }

    /// All page texts joined by newlines.
    pub fn joined_text(&self) -> String {
        self.pages.join("\n")
    }
}

/// A contiguous, bounded slice of the cleaned document text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Passage {
    /// Identifier derived from source name and position (`{source}_{index}`).
    pub id: String,
    /// The passage text.
    pub text: String,
    /// Source name, ordinal and offset, keyed by the `META_*` constants.
    pub metadata: HashMap<String, String>,
}

impl Passage {
    /// The passage ordinal, if the metadata carries one.
    pub fn chunk_index(&self) -> Option<usize> {
        self.metadata.get(META_CHUNK_INDEX).and_then(|v| v.parse().ok())
    }

    /// The source document name, if recorded.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(META_SOURCE).map(String::as_str)
    }
}

/// A [`Passage`] paired with its vector embedding, as stored in an index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingRecord {
    /// The embedded passage. Its `id` keys the record.
    pub passage: Passage,
    /// The vector embedding of the passage text.
    pub embedding: Vec<f32>,
}

impl EmbeddingRecord {
    /// The record identifier (the passage identifier).
    pub fn id(&self) -> &str {
        &self.passage.id
    }
}

/// A retrieved [`Passage`] paired with a similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved passage.
    pub passage: Passage,
    /// The similarity score (higher is more similar).
    pub score: f32,
}
