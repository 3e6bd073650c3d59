//! Deterministic providers shared by the integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use clinrag::{EmbeddingProvider, FALLBACK_ANSWER, LanguageModel, RagError, Result};

const STOPWORDS: &[&str] = &["what", "the", "for", "and", "with", "are", "is", "of", "how", "which"];

/// Lower-cased content words of a text, stopwords removed.
pub fn keywords(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|w| w.len() >= 3 && !STOPWORDS.contains(&w.as_str()))
        .collect()
}

fn bucket(word: &str, dims: usize) -> usize {
    let hash = word.bytes().fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
        (acc ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    });
    (hash % dims as u64) as usize
}

/// Bag-of-words embedder: each content word bumps one hashed dimension.
pub struct KeywordEmbedder {
    pub dims: usize,
}

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self { dims: 512 }
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![0.0f32; self.dims];
        for word in keywords(text) {
            v[bucket(&word, self.dims)] += 1.0;
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }
}

/// Records the size of every `embed_batch` call and fails the batches listed.
pub struct RecordingEmbedder {
    pub batch_sizes: Mutex<Vec<usize>>,
    pub fail_batches: Vec<usize>,
}

impl RecordingEmbedder {
    pub fn new() -> Self {
        Self { batch_sizes: Mutex::new(Vec::new()), fail_batches: Vec::new() }
    }

    pub fn failing(batches: &[usize]) -> Self {
        Self { batch_sizes: Mutex::new(Vec::new()), fail_batches: batches.to_vec() }
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingProvider for RecordingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(vec![text.len() as f32, 1.0])
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let batch = {
            let mut sizes = self.batch_sizes.lock().unwrap();
            sizes.push(texts.len());
            sizes.len() - 1
        };
        if self.fail_batches.contains(&batch) {
            return Err(RagError::EmbeddingError {
                provider: "recording".into(),
                message: format!("payload too large in batch {batch}"),
            });
        }
        Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
    }

    fn dimensions(&self) -> usize {
        2
    }
}

/// Embedder whose every call fails, like a provider with a revoked key.
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(RagError::EmbeddingError { provider: "failing".into(), message: "401 unauthorized".into() })
    }

    fn dimensions(&self) -> usize {
        4
    }
}

/// Split the composer's user prompt into (context, question).
pub fn split_prompt(user_prompt: &str) -> (&str, &str) {
    let body = user_prompt.strip_prefix("Context:\n").unwrap_or(user_prompt);
    let (context, rest) = body.split_once("\n\nQuestion: ").unwrap_or((body, ""));
    let question = rest.strip_suffix("\n\nAnswer:").unwrap_or(rest);
    (context, question)
}

/// A model that follows the grounding contract literally: it answers with the
/// first context sentence mentioning every question keyword, or with the
/// fallback sentence when there is none.
#[derive(Default)]
pub struct ContractModel {
    pub calls: Mutex<Vec<(String, String, f32)>>,
}

#[async_trait]
impl LanguageModel for ContractModel {
    async fn complete(&self, system_prompt: &str, user_prompt: &str, temperature: f32) -> Result<String> {
        self.calls.lock().unwrap().push((
            system_prompt.to_string(),
            user_prompt.to_string(),
            temperature,
        ));

        let (context, question) = split_prompt(user_prompt);
        let wanted = keywords(question);
        let answer = context
            .split('\n')
            .flat_map(|line| line.split(". "))
            .find(|sentence| {
                let words = keywords(sentence);
                !wanted.is_empty() && wanted.iter().all(|w| words.contains(w))
            })
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| FALLBACK_ANSWER.to_string());
        Ok(answer)
    }

    fn name(&self) -> &str {
        "contract-model"
    }
}

/// A model that is always over quota.
pub struct QuotaExceededModel;

#[async_trait]
impl LanguageModel for QuotaExceededModel {
    async fn complete(&self, _system: &str, _user: &str, _temperature: f32) -> Result<String> {
        Err(RagError::GenerationError { provider: "quota".into(), message: "429 quota exceeded".into() })
    }

    fn name(&self) -> &str {
        "quota-exceeded"
    }
}

/// Three guideline pages with a running header and page footers; the
/// artesunate dosage sentence is on page 2.
pub fn malaria_pages() -> Vec<String> {
    vec![
        "WHO Guidelines for Malaria\n\
         Malaria is diagnosed by microscopy or rapid diagnostic tests.\n\
         All suspected cases should be confirmed before treatment begins.\n\n\
         Uncomplicated cases are managed in outpatient settings.\n\
         Page 1 of 3"
            .to_string(),
        "WHO Guidelines for Malaria\n\
         Severe malaria requires parenteral therapy.\n\n\
         The dosage for artesunate is 2.4 mg/kg given intravenously at 0, 12 and 24 hours, then once daily.\n\n\
         Switch to oral therapy once the patient tolerates it.\n\
         Page 2 of 3"
            .to_string(),
        "WHO Guidelines for Malaria\n\
         Prevention relies on insecticide-treated nets and indoor residual spraying.\n\n\
         Chemoprevention is advised for travellers to endemic areas.\n\
         Page 3 of 3"
            .to_string(),
    ]
}
