//! Configuration for the guideline pipeline.
//!
//! One [`RagConfig`] replaces per-variant scripts: chunk sizes, prompt
//! temperature, collection names and index paths are all fields, and the
//! commonly used combinations are available as [`Preset`]s.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};
use crate::noise::NoisePolicy;

/// Configuration parameters for the RAG pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RagConfig {
    /// Maximum passage length in characters.
    pub chunk_size: usize,
    /// Overlapping characters between consecutive passages.
    pub chunk_overlap: usize,
    /// Number of passages retrieved per question.
    pub top_k: usize,
    /// Passages embedded and stored per upsert batch.
    pub batch_size: usize,
    /// Name of the vector collection holding the corpus.
    pub collection: String,
    /// Directory where a persistent vector index lives.
    pub index_path: PathBuf,
    /// Decoding temperature for answer generation. Grounded answering is
    /// deterministic, so validation only accepts `0.0`.
    pub temperature: f32,
    /// Header/footer heuristic applied before chunking.
    pub noise_policy: NoisePolicy,
    /// Source name recorded on passages. Defaults to the document file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 3,
            batch_size: 100,
            collection: "clinical_guidelines".to_string(),
            index_path: PathBuf::from("data/vector_store"),
            temperature: 0.0,
            noise_policy: NoisePolicy::RepeatedLines,
            source_name: None,
        }
    }
}

/// Named configurations for the corpora this pipeline is run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// General clinical guidelines: 1000/200 passages, top 3.
    ClinicalGuidelines,
    /// Same settings, kept in the `malaria_guidelines` collection.
    MalariaGuidelines,
    /// Smaller passages with more of them retrieved per question.
    Compact,
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }

    /// The configuration for a named preset.
    pub fn preset(preset: Preset) -> Self {
        let base = Self::default();
        match preset {
            Preset::ClinicalGuidelines => base,
            Preset::MalariaGuidelines => {
                Self { collection: "malaria_guidelines".to_string(), ..base }
            }
            Preset::Compact => Self {
                chunk_size: 500,
                chunk_overlap: 100,
                top_k: 5,
                collection: "clinical_guidelines_compact".to_string(),
                ..base
            },
        }
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// - [`RagError::NotFoundError`] if the file does not exist.
    /// - [`RagError::ConfigError`] if it cannot be parsed or fails validation.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                RagError::NotFoundError(format!("config file '{}'", path.display()))
            }
            _ => RagError::ConfigError(format!("failed to read '{}': {e}", path.display())),
        })?;
        let config: RagConfig = serde_json::from_str(&raw)
            .map_err(|e| RagError::ConfigError(format!("invalid config '{}': {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `chunk_size == 0` or `chunk_overlap >= chunk_size`
    /// - `top_k == 0` or `batch_size == 0`
    /// - `collection` is empty
    /// - `temperature` is anything other than `0.0`
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(RagError::ConfigError("chunk_size must be greater than zero".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(RagError::ConfigError(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if self.batch_size == 0 {
            return Err(RagError::ConfigError("batch_size must be greater than zero".to_string()));
        }
        if self.collection.trim().is_empty() {
            return Err(RagError::ConfigError("collection name must not be empty".to_string()));
        }
        if self.temperature != 0.0 {
            return Err(RagError::ConfigError(format!(
                "temperature must be 0.0 for grounded answers, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Start from a preset instead of the defaults.
    pub fn preset(mut self, preset: Preset) -> Self {
        self.config = RagConfig::preset(preset);
        self
    }

    /// Set the maximum passage length in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive passages in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of passages retrieved per question.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the upsert batch size.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Set the collection name.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.config.collection = name.into();
        self
    }

    /// Set the directory of the persistent index.
    pub fn index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.index_path = path.into();
        self
    }

    /// Set the decoding temperature. [`build`](Self::build) rejects any
    /// value other than `0.0`.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Set the noise filtering policy.
    pub fn noise_policy(mut self, policy: NoisePolicy) -> Self {
        self.config.noise_policy = policy;
        self
    }

    /// Override the source name recorded on passages.
    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.config.source_name = Some(name.into());
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// See [`RagConfig::validate`].
    pub fn build(self) -> Result<RagConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
