//! Vector store trait for storing and searching passage embeddings.

use async_trait::async_trait;

use crate::document::{EmbeddingRecord, SearchResult};
use crate::error::Result;

/// A storage backend for embedding records with similarity search.
///
/// Records live in named collections, one collection per document corpus.
/// Operations on a collection that does not exist fail with
/// [`RagError::NotFoundError`](crate::RagError::NotFoundError), except
/// [`delete_collection`](VectorStore::delete_collection), which is a no-op.
///
/// Writers must be serialized by the caller: concurrent `upsert` or
/// `delete_collection` calls on one collection are not coordinated across
/// processes. Concurrent searches are fine.
///
/// # Example
///
/// ```rust,ignore
/// use clinrag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.create_collection("clinical_guidelines", 384).await?;
/// store.upsert("clinical_guidelines", &records).await?;
/// let results = store.search("clinical_guidelines", &query_embedding, 3).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection. No-op if it already exists.
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Delete a named collection and all its records. No-op if it is absent.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Insert records, replacing any with the same identifier.
    async fn upsert(&self, collection: &str, records: &[EmbeddingRecord]) -> Result<()>;

    /// Number of records stored in a collection.
    async fn count(&self, collection: &str) -> Result<usize>;

    /// Search for the `top_k` most similar records to the given embedding.
    ///
    /// Returns results ordered by descending similarity score.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Score every record against `embedding` and keep the `top_k` best.
pub(crate) fn rank<'a>(
    records: impl Iterator<Item = &'a EmbeddingRecord>,
    embedding: &[f32],
    top_k: usize,
) -> Vec<SearchResult> {
    let mut scored: Vec<SearchResult> = records
        .map(|record| SearchResult {
            passage: record.passage.clone(),
            score: cosine_similarity(&record.embedding, embedding),
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_parallel_vectors_is_one() {
        assert!((cosine_similarity(&[1.0, 2.0], &[2.0, 4.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_with_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
