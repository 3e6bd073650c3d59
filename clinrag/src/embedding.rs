//! Embedding provider interface.

use async_trait::async_trait;

use crate::error::Result;

/// Turns text into fixed-length vectors for similarity search.
///
/// The same provider (and model) must be used when indexing passages and
/// when embedding questions, otherwise similarities are meaningless.
/// Providers are passed into the pipeline explicitly, so tests can swap in
/// deterministic mocks.
///
/// The default [`embed_batch`](EmbeddingProvider::embed_batch) calls
/// [`embed`](EmbeddingProvider::embed) once per input; backends with a native
/// batch endpoint should override it.
///
/// # Example
///
/// ```rust,ignore
/// use clinrag::EmbeddingProvider;
///
/// let vector = provider.embed("artesunate dosage").await?;
/// assert_eq!(vector.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of inputs, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
