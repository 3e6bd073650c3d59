//! Aggregated results of an evaluation run.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EvalError, Result};
use crate::metrics::MetricScores;
use crate::record::EvaluationRecord;

/// One scored question, as written to the results file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRow {
    /// The answered question.
    #[serde(flatten)]
    pub record: EvaluationRecord,
    /// Its scores.
    #[serde(flatten)]
    pub scores: MetricScores,
}

/// Mean of each metric over the rows where it is defined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Number of rows summarized.
    pub questions: usize,
    /// Mean faithfulness.
    pub faithfulness: Option<f64>,
    /// Mean answer relevancy.
    pub answer_relevancy: Option<f64>,
    /// Mean context precision.
    pub context_precision: Option<f64>,
    /// Mean context recall.
    pub context_recall: Option<f64>,
}

fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let present: Vec<f64> = values.flatten().collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}

impl ScoreSummary {
    /// Average each metric over `rows`, skipping undefined scores.
    pub fn from_rows(rows: &[EvaluationRow]) -> Self {
        Self {
            questions: rows.len(),
            faithfulness: mean(rows.iter().map(|r| r.scores.faithfulness)),
            answer_relevancy: mean(rows.iter().map(|r| r.scores.answer_relevancy)),
            context_precision: mean(rows.iter().map(|r| r.scores.context_precision)),
            context_recall: mean(rows.iter().map(|r| r.scores.context_recall)),
        }
    }
}

/// Per-question rows plus their summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// One row per question, in dataset order.
    pub rows: Vec<EvaluationRow>,
    /// Means over `rows`.
    pub summary: ScoreSummary,
    /// When the report was assembled.
    pub generated_at: DateTime<Utc>,
}

impl EvaluationReport {
    /// Pair records with their scores and summarize.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Metric`] if there is not exactly one score entry
    /// per record.
    pub fn new(evaluator: &str, records: Vec<EvaluationRecord>, scores: Vec<MetricScores>) -> Result<Self> {
        if records.len() != scores.len() {
            return Err(EvalError::Metric {
                evaluator: evaluator.to_string(),
                message: format!("expected {} score entries, got {}", records.len(), scores.len()),
            });
        }

        let rows: Vec<EvaluationRow> = records
            .into_iter()
            .zip(scores)
            .map(|(record, scores)| EvaluationRow { record, scores })
            .collect();
        let summary = ScoreSummary::from_rows(&rows);
        Ok(Self { rows, summary, generated_at: Utc::now() })
    }

    /// Write one JSON object per row to `path`, creating parent directories.
    pub fn write_results(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        for row in &self.rows {
            serde_json::to_writer(&mut writer, row)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = self.rows.len(), "wrote evaluation results");
        Ok(())
    }
}

fn score(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.3}")).unwrap_or_else(|| "n/a".to_string())
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(48);
        writeln!(f, "{rule}")?;
        writeln!(f, " Clinical score card ({} questions)", self.summary.questions)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "faithfulness:      {}", score(self.summary.faithfulness))?;
        writeln!(f, "answer relevancy:  {}", score(self.summary.answer_relevancy))?;
        writeln!(f, "context precision: {}", score(self.summary.context_precision))?;
        writeln!(f, "context recall:    {}", score(self.summary.context_recall))?;
        write!(f, "generated at:      {}", self.generated_at.to_rfc3339())
    }
}
