//! Offline providers shared by the demos, so they run with zero API keys.

#![allow(dead_code)]

use std::path::PathBuf;

use clinrag::{EmbeddingProvider, FALLBACK_ANSWER, LanguageModel};

/// Directory holding the bundled sample guideline and its test set.
pub fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Initialise `tracing` from `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

const STOPWORDS: &[&str] =
    &["what", "the", "for", "and", "with", "how", "which", "are", "all", "who", "long"];

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|w| w.len() >= 3 && !STOPWORDS.contains(&w.as_str()))
        .collect()
}

// ---------------------------------------------------------------------------
// HashingEmbedder — deterministic bag-of-words embeddings
// ---------------------------------------------------------------------------

pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> clinrag::Result<Vec<f32>> {
        let mut emb = vec![0.0f32; self.dimensions];
        for word in words(text) {
            let hash = word.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
            emb[(hash % self.dimensions as u64) as usize] += 1.0;
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ---------------------------------------------------------------------------
// ExtractiveModel — answers with the best-matching context sentence
// ---------------------------------------------------------------------------

/// Picks the context sentence sharing the most words with the question, and
/// falls back to the refusal sentence when fewer than half the question's
/// words appear in it.
pub struct ExtractiveModel;

#[async_trait::async_trait]
impl LanguageModel for ExtractiveModel {
    async fn complete(&self, _system: &str, user: &str, _temperature: f32) -> clinrag::Result<String> {
        let body = user.strip_prefix("Context:\n").unwrap_or(user);
        let (context, question) = body.split_once("\n\nQuestion: ").unwrap_or((body, ""));
        let wanted = words(question);

        let best = context
            .lines()
            .flat_map(|line| line.split(". "))
            .map(|sentence| {
                let have = words(sentence);
                (wanted.iter().filter(|w| have.contains(w)).count(), sentence.trim())
            })
            .max_by_key(|(hits, _)| *hits);

        Ok(match best {
            Some((hits, sentence)) if hits * 2 >= wanted.len() && hits > 0 => sentence.to_string(),
            _ => FALLBACK_ANSWER.to_string(),
        })
    }

    fn name(&self) -> &str {
        "extractive-mock"
    }
}
