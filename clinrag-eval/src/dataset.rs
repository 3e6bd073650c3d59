//! Labeled question sets.
//!
//! A dataset is a JSON Lines file with one case per line:
//!
//! ```text
//! {"question": "What is the dosage for artesunate?", "ground_truth": "2.4 mg/kg IV at 0, 12 and 24 hours"}
//! ```
//!
//! Blank lines are skipped. Any other field is ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EvalError, Result};

/// One question with its reference answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalCase {
    /// Question put to the pipeline.
    pub question: String,
    /// Reference answer the pipeline's answer is scored against.
    pub ground_truth: String,
}

impl EvalCase {
    /// Create a case from a question and its reference answer.
    pub fn new(question: impl Into<String>, ground_truth: impl Into<String>) -> Self {
        Self { question: question.into(), ground_truth: ground_truth.into() }
    }
}

/// Load every case from a JSON Lines file, in file order.
///
/// # Errors
///
/// - [`EvalError::DatasetNotFound`] if `path` does not exist.
/// - [`EvalError::Dataset`] naming the 1-based line that failed to parse.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Vec<EvalCase>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => EvalError::DatasetNotFound(path.display().to_string()),
        _ => EvalError::Io(e),
    })?;

    let mut cases = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let case: EvalCase = serde_json::from_str(&line).map_err(|e| EvalError::Dataset {
            path: path.display().to_string(),
            line: idx + 1,
            message: e.to_string(),
        })?;
        cases.push(case);
    }

    info!(path = %path.display(), case_count = cases.len(), "loaded evaluation dataset");
    Ok(cases)
}
