//! Scoring of evaluation records.
//!
//! The harness only assembles records and aggregates scores; the scores
//! themselves come from a [`MetricEvaluator`]. A judge-model evaluator can be
//! plugged in behind the trait. [`LexicalEvaluator`] is a deterministic
//! offline stand-in based on content-word overlap.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::EvaluationRecord;

/// The four scores for one record, each in `[0, 1]`.
///
/// A score is `None` when it cannot be computed for that record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricScores {
    /// Is the answer supported by the retrieved contexts?
    pub faithfulness: Option<f64>,
    /// Does the answer address the question?
    pub answer_relevancy: Option<f64>,
    /// Are relevant contexts ranked above irrelevant ones?
    pub context_precision: Option<f64>,
    /// Do the contexts cover the ground truth?
    pub context_recall: Option<f64>,
}

/// Computes [`MetricScores`] for a batch of records.
#[async_trait]
pub trait MetricEvaluator: Send + Sync {
    /// Score every record. Must return exactly one entry per record, in order.
    async fn evaluate(&self, records: &[EvaluationRecord]) -> Result<Vec<MetricScores>>;

    /// Name used in logs and errors.
    fn name(&self) -> &str;
}

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "was", "were", "with", "that", "this", "from", "what", "which",
    "when", "how", "who", "should", "can", "does", "into", "than", "then", "their", "there",
    "been", "have", "has", "not", "but", "per", "its",
];

/// Lower-cased content words: alphanumeric runs of 3+ chars minus stopwords.
/// Decimal numbers like `2.4` are kept whole.
fn content_words(text: &str) -> HashSet<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '.'))
        .map(|w| w.trim_matches('.').to_lowercase())
        .filter(|w| w.chars().count() >= 3 && !STOPWORDS.contains(&w.as_str()))
        .collect()
}

/// Share of `wanted` found in `available`, or `None` if `wanted` is empty.
fn coverage(wanted: &HashSet<String>, available: &HashSet<String>) -> Option<f64> {
    if wanted.is_empty() {
        return None;
    }
    let hits = wanted.iter().filter(|w| available.contains(*w)).count();
    Some(hits as f64 / wanted.len() as f64)
}

/// Word-overlap evaluator that needs no model.
///
/// - faithfulness: share of answer words present in the contexts
/// - answer relevancy: share of question words present in the answer
/// - context precision: average precision over the ranked contexts, where a
///   context is relevant if it covers at least `relevance_threshold` of the
///   ground-truth words
/// - context recall: share of ground-truth words present in the contexts
#[derive(Debug, Clone)]
pub struct LexicalEvaluator {
    relevance_threshold: f64,
}

impl Default for LexicalEvaluator {
    fn default() -> Self {
        Self { relevance_threshold: Self::DEFAULT_RELEVANCE_THRESHOLD }
    }
}

impl LexicalEvaluator {
    /// Ground-truth word coverage above which a context counts as relevant.
    pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 0.3;

    /// Create an evaluator with [`Self::DEFAULT_RELEVANCE_THRESHOLD`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the relevance threshold used by context precision.
    pub fn with_relevance_threshold(mut self, threshold: f64) -> Self {
        self.relevance_threshold = threshold;
        self
    }

    /// Score a single record.
    pub fn score(&self, record: &EvaluationRecord) -> MetricScores {
        let question = content_words(&record.question);
        let answer = content_words(&record.answer);
        let truth = content_words(&record.ground_truth);
        let per_context: Vec<HashSet<String>> =
            record.contexts.iter().map(|c| content_words(c)).collect();
        let all_context: HashSet<String> = per_context.iter().flatten().cloned().collect();

        MetricScores {
            faithfulness: coverage(&answer, &all_context),
            answer_relevancy: coverage(&question, &answer),
            context_precision: self.average_precision(&per_context, &truth),
            context_recall: coverage(&truth, &all_context),
        }
    }

    fn average_precision(&self, contexts: &[HashSet<String>], truth: &HashSet<String>) -> Option<f64> {
        if contexts.is_empty() || truth.is_empty() {
            return None;
        }

        let mut relevant = 0usize;
        let mut precision_sum = 0.0;
        for (rank, context) in contexts.iter().enumerate() {
            if coverage(truth, context).unwrap_or(0.0) >= self.relevance_threshold {
                relevant += 1;
                precision_sum += relevant as f64 / (rank + 1) as f64;
            }
        }

        Some(if relevant == 0 { 0.0 } else { precision_sum / relevant as f64 })
    }
}

#[async_trait]
impl MetricEvaluator for LexicalEvaluator {
    async fn evaluate(&self, records: &[EvaluationRecord]) -> Result<Vec<MetricScores>> {
        Ok(records.iter().map(|r| self.score(r)).collect())
    }

    fn name(&self) -> &str {
        "lexical"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(answer: &str, contexts: &[&str]) -> EvaluationRecord {
        EvaluationRecord {
            question: "What is the dosage for artesunate?".into(),
            answer: answer.into(),
            contexts: contexts.iter().map(|c| c.to_string()).collect(),
            ground_truth: "Artesunate dosage is 2.4 mg/kg".into(),
        }
    }

    #[test]
    fn grounded_answer_scores_high() {
        let scores = LexicalEvaluator::new().score(&record(
            "The dosage for artesunate is 2.4 mg/kg.",
            &["The dosage for artesunate is 2.4 mg/kg given intravenously."],
        ));
        assert_eq!(scores.faithfulness, Some(1.0));
        assert_eq!(scores.answer_relevancy, Some(1.0));
        assert_eq!(scores.context_precision, Some(1.0));
        assert_eq!(scores.context_recall, Some(1.0));
    }

    #[test]
    fn precision_rewards_relevant_context_ranked_first() {
        let evaluator = LexicalEvaluator::new();
        let relevant = "Artesunate dosage is 2.4 mg/kg";
        let noise = "Bed nets reduce transmission";

        let first = evaluator.score(&record("x", &[relevant, noise])).context_precision.unwrap();
        let second = evaluator.score(&record("x", &[noise, relevant])).context_precision.unwrap();
        assert_eq!(first, 1.0);
        assert_eq!(second, 0.5);
    }

    #[test]
    fn no_contexts_leaves_precision_undefined() {
        let scores = LexicalEvaluator::new().score(&record("I cannot find this in the guidelines.", &[]));
        assert_eq!(scores.context_precision, None);
        assert_eq!(scores.context_recall, Some(0.0));
        assert_eq!(scores.faithfulness, Some(0.0));
    }

    #[test]
    fn decimal_doses_are_single_words() {
        let words = content_words("Give 2.4 mg/kg.");
        assert!(words.contains("2.4"));
        assert!(words.contains("give"));
    }
}
