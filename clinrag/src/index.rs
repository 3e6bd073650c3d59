//! Embedding-backed index over one named collection.
//!
//! [`IndexStore`] pairs an [`EmbeddingProvider`] with a [`VectorStore`] so the
//! same embedding function is used at index time and at query time.
//! Bulk upserts are split into batches to stay under provider payload limits;
//! a failed batch is logged and skipped, and the rest keep going.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::document::{EmbeddingRecord, Passage, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Outcome of a bulk upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Passages handed to the index.
    pub passages: usize,
    /// Batches attempted.
    pub batches: usize,
    /// Batches skipped because embedding or storage failed.
    pub failed_batches: usize,
    /// Records written by the batches that succeeded.
    pub stored: usize,
}

impl IngestReport {
    /// Whether every batch succeeded.
    pub fn is_complete(&self) -> bool {
        self.failed_batches == 0
    }

    /// A [`RagError::BatchPartialFailure`] describing the skipped batches, if any.
    pub fn partial_failure(&self) -> Option<RagError> {
        (self.failed_batches > 0).then_some(RagError::BatchPartialFailure {
            failed: self.failed_batches,
            total: self.batches,
        })
    }
}

/// A vector index over a single named collection.
pub struct IndexStore {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    collection: String,
    batch_size: usize,
}

impl IndexStore {
    /// Batch size used when none is configured.
    pub const DEFAULT_BATCH_SIZE: usize = 100;

    /// Create an index over `collection`.
    ///
    /// A `batch_size` of zero is treated as one.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        collection: impl Into<String>,
        batch_size: usize,
    ) -> Self {
        Self { embedder, store, collection: collection.into(), batch_size: batch_size.max(1) }
    }

    /// The collection this index addresses.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Passages per upsert batch.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Drop the collection (if present) and create it empty.
    pub async fn recreate(&self) -> Result<()> {
        self.store.delete_collection(&self.collection).await?;
        self.store.create_collection(&self.collection, self.embedder.dimensions()).await?;
        info!(collection = %self.collection, "recreated collection");
        Ok(())
    }

    /// Number of records currently stored.
    pub async fn count(&self) -> Result<usize> {
        self.store.count(&self.collection).await
    }

    /// Embed and store passages batch by batch.
    ///
    /// Never fails as a whole: failed batches are counted in the returned
    /// [`IngestReport`].
    pub async fn upsert(&self, passages: &[Passage]) -> IngestReport {
        let mut report = IngestReport { passages: passages.len(), ..IngestReport::default() };

        for (batch, chunk) in passages.chunks(self.batch_size).enumerate() {
            report.batches += 1;
            match self.upsert_batch(chunk).await {
                Ok(()) => {
                    report.stored += chunk.len();
                    debug!(collection = %self.collection, batch, size = chunk.len(), "stored batch");
                }
                Err(e) => {
                    report.failed_batches += 1;
                    error!(
                        collection = %self.collection,
                        batch,
                        size = chunk.len(),
                        error = %e,
                        "skipping failed batch"
                    );
                }
            }
        }

        if report.is_complete() {
            info!(collection = %self.collection, stored = report.stored, batches = report.batches, "indexed passages");
        } else {
            warn!(
                collection = %self.collection,
                stored = report.stored,
                failed_batches = report.failed_batches,
                batches = report.batches,
                "indexed passages with failed batches"
            );
        }
        report
    }

    async fn upsert_batch(&self, passages: &[Passage]) -> Result<()> {
        let texts: Vec<&str> = passages.iter().map(|p| p.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != passages.len() {
            return Err(RagError::EmbeddingError {
                provider: "index".into(),
                message: format!(
                    "expected {} embeddings, provider returned {}",
                    passages.len(),
                    embeddings.len()
                ),
            });
        }

        let records: Vec<EmbeddingRecord> = passages
            .iter()
            .cloned()
            .zip(embeddings)
            .map(|(passage, embedding)| EmbeddingRecord { passage, embedding })
            .collect();
        self.store.upsert(&self.collection, &records).await
    }

    /// Embed `text` and return the `k` nearest passages, most similar first.
    ///
    /// # Errors
    ///
    /// - [`RagError::NotFoundError`] if the collection does not exist.
    /// - [`RagError::EmbeddingError`] if the query cannot be embedded.
    pub async fn query(&self, text: &str, k: usize) -> Result<Vec<SearchResult>> {
        if self.store.count(&self.collection).await? == 0 {
            debug!(collection = %self.collection, "query against empty collection");
            return Ok(Vec::new());
        }

        let embedding = self.embedder.embed(text).await?;
        let results = self.store.search(&self.collection, &embedding, k).await?;
        debug!(collection = %self.collection, k, result_count = results.len(), "query completed");
        Ok(results)
    }
}
