//! Top-k passage retrieval for a question.

use std::sync::Arc;

use crate::document::SearchResult;
use crate::error::Result;
use crate::index::IndexStore;

/// Returns the passages most similar to a question.
#[derive(Clone)]
pub struct Retriever {
    index: Arc<IndexStore>,
    top_k: usize,
}

impl Retriever {
    /// Number of passages returned when none is configured.
    pub const DEFAULT_TOP_K: usize = 3;

    /// Create a retriever returning up to `top_k` passages per question.
    pub fn new(index: Arc<IndexStore>, top_k: usize) -> Self {
        Self { index, top_k }
    }

    /// The configured number of passages per question.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Retrieve up to `top_k` passages, most similar first.
    ///
    /// An empty collection yields an empty result, not an error.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>> {
        self.retrieve_k(question, self.top_k).await
    }

    /// Retrieve up to `k` passages, overriding the configured `top_k`.
    pub async fn retrieve_k(&self, question: &str, k: usize) -> Result<Vec<SearchResult>> {
        self.index.query(question, k).await
    }
}
