//! Splitting cleaned guideline text into overlapping passages.
//!
//! [`BoundaryChunker`] cuts fixed-size character windows with a fixed overlap
//! and pulls each cut back to the nearest paragraph, sentence or word break,
//! so passages do not end mid-word. The next passage always starts exactly
//! `overlap` characters before the previous one ended, which means removing
//! the first `overlap` characters of every passage but the first rebuilds the
//! cleaned text.

use std::collections::HashMap;

use crate::document::{META_CHUNK_INDEX, META_SOURCE, META_START_CHAR, Passage};
use crate::error::{RagError, Result};

/// A strategy for splitting cleaned text into passages.
pub trait Chunker: Send + Sync {
    /// Split `text` into ordered passages tagged with `source`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyInputError`] if `text` is empty.
    fn chunk(&self, source: &str, text: &str) -> Result<Vec<Passage>>;
}

/// Fixed-size, fixed-overlap chunker that ends passages on natural breaks.
///
/// Sizes are counted in characters, not bytes.
///
/// # Example
///
/// ```rust,ignore
/// use clinrag::BoundaryChunker;
///
/// let chunker = BoundaryChunker::new(1000, 200)?;
/// let passages = chunker.chunk("who_guidelines.pdf", &cleaned)?;
/// ```
#[derive(Debug, Clone)]
pub struct BoundaryChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl BoundaryChunker {
    /// Default maximum passage length in characters.
    pub const DEFAULT_CHUNK_SIZE: usize = 1000;
    /// Default overlap between consecutive passages in characters.
    pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

    /// Create a chunker producing passages of at most `chunk_size` characters
    /// that overlap by `chunk_overlap` characters.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::ConfigError("chunk_size must be greater than zero".into()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::ConfigError(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }

    /// Maximum passage length in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Overlap between consecutive passages in characters.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Compute passage spans as `(start, end)` char offsets into `chars`.
    fn spans(&self, chars: &[char]) -> Vec<(usize, usize)> {
        let len = chars.len();
        let mut spans = Vec::new();
        let mut start = 0;

        loop {
            let hard_end = (start + self.chunk_size).min(len);
            if hard_end == len {
                spans.push((start, len));
                break;
            }
            let end = self.snap_end(chars, start, hard_end);
            spans.push((start, end));
            start = end - self.chunk_overlap;
        }

        spans
    }

    /// Pick where a non-final passage ends.
    ///
    /// Candidates lie in the second half of the window and strictly beyond
    /// the overlap, so every step moves forward. Paragraph breaks win over
    /// sentence ends, which win over plain whitespace.
    fn snap_end(&self, chars: &[char], start: usize, hard_end: usize) -> usize {
        let lower = (start + self.chunk_overlap + 1).max(start + self.chunk_size / 2);

        let paragraph = |e: usize| e >= 2 && chars[e - 1] == '\n' && chars[e - 2] == '\n';
        let sentence =
            |e: usize| e >= 2 && chars[e - 1].is_whitespace() && matches!(chars[e - 2], '.' | '!' | '?');
        let word = |e: usize| chars[e - 1].is_whitespace() || chars[e].is_whitespace();

        let latest = |pred: &dyn Fn(usize) -> bool| (lower..=hard_end).rev().find(|&e| pred(e));

        latest(&paragraph).or_else(|| latest(&sentence)).or_else(|| latest(&word)).unwrap_or(hard_end)
    }
}

impl Default for BoundaryChunker {
    fn default() -> Self {
        Self { chunk_size: Self::DEFAULT_CHUNK_SIZE, chunk_overlap: Self::DEFAULT_CHUNK_OVERLAP }
    }
}

impl Chunker for BoundaryChunker {
    fn chunk(&self, source: &str, text: &str) -> Result<Vec<Passage>> {
        if text.is_empty() {
            return Err(RagError::EmptyInputError(format!("no text to chunk for '{source}'")));
        }

        let chars: Vec<char> = text.chars().collect();
        let passages = self
            .spans(&chars)
            .into_iter()
            .enumerate()
            .map(|(index, (start, end))| {
                let metadata = HashMap::from([
                    (META_SOURCE.to_string(), source.to_string()),
                    (META_CHUNK_INDEX.to_string(), index.to_string()),
                    (META_START_CHAR.to_string(), start.to_string()),
                ]);
                Passage {
                    id: format!("{source}_{index}"),
                    text: chars[start..end].iter().collect(),
                    metadata,
                }
            })
            .collect();

        Ok(passages)
    }
}
