//! Bulk question answering and scoring.

use std::path::Path;
use std::sync::Arc;

use clinrag::AnswerComposer;
use tracing::{info, warn};

use crate::dataset::{EvalCase, load_dataset};
use crate::error::Result;
use crate::metrics::MetricEvaluator;
use crate::record::EvaluationRecord;
use crate::report::EvaluationReport;

/// Runs a question set through an [`AnswerComposer`] and scores the answers.
///
/// Questions are answered one at a time, in dataset order. A failed answer
/// aborts the run; nothing is scored for a partial run.
///
/// # Example
///
/// ```rust,ignore
/// use clinrag_eval::{EvaluationHarness, LexicalEvaluator};
///
/// let harness = EvaluationHarness::new(pipeline.composer(), Arc::new(LexicalEvaluator::new()))
///     .with_limit(3);
/// let report = harness.run_file("data/clinical_testset.jsonl").await?;
/// println!("{report}");
/// report.write_results("data/evaluation_results.jsonl")?;
/// ```
pub struct EvaluationHarness {
    composer: Arc<AnswerComposer>,
    evaluator: Arc<dyn MetricEvaluator>,
    limit: Option<usize>,
}

impl EvaluationHarness {
    /// Create a harness that answers with `composer` and scores with `evaluator`.
    pub fn new(composer: Arc<AnswerComposer>, evaluator: Arc<dyn MetricEvaluator>) -> Self {
        Self { composer, evaluator, limit: None }
    }

    /// Only evaluate the first `limit` cases.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Answer every case and assemble the records, without scoring.
    pub async fn collect(&self, cases: &[EvalCase]) -> Result<Vec<EvaluationRecord>> {
        let take = self.limit.unwrap_or(cases.len()).min(cases.len());
        let mut records = Vec::with_capacity(take);

        for (i, case) in cases[..take].iter().enumerate() {
            info!(index = i + 1, total = take, question = %case.question, "answering");
            let grounded = self.composer.answer_with_context(&case.question).await.map_err(|e| {
                warn!(index = i + 1, error = %e, "evaluation aborted");
                e
            })?;
            records.push(EvaluationRecord::from_answer(case, &grounded));
        }

        Ok(records)
    }

    /// Answer and score the cases.
    pub async fn run(&self, cases: &[EvalCase]) -> Result<EvaluationReport> {
        let records = self.collect(cases).await?;
        info!(evaluator = self.evaluator.name(), records = records.len(), "scoring");
        let scores = self.evaluator.evaluate(&records).await?;
        let report = EvaluationReport::new(self.evaluator.name(), records, scores)?;
        info!(questions = report.summary.questions, "evaluation finished");
        Ok(report)
    }

    /// Load a dataset file and run it.
    pub async fn run_file(&self, path: impl AsRef<Path>) -> Result<EvaluationReport> {
        let cases = load_dataset(path)?;
        self.run(&cases).await
    }
}
