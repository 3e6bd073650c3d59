//! The per-question record handed to metric evaluators.

use clinrag::GroundedAnswer;
use serde::{Deserialize, Serialize};

use crate::dataset::EvalCase;

/// A question, the pipeline's answer, the passages it retrieved and the
/// reference answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Question put to the pipeline.
    pub question: String,
    /// Answer the pipeline gave.
    pub answer: String,
    /// Retrieved passage texts, in retrieval order.
    pub contexts: Vec<String>,
    /// Reference answer for the question.
    pub ground_truth: String,
}

impl EvaluationRecord {
    /// Assemble a record from a case and the composer's output for it.
    pub fn from_answer(case: &EvalCase, grounded: &GroundedAnswer) -> Self {
        Self {
            question: case.question.clone(),
            answer: grounded.answer.clone(),
            contexts: grounded.context_texts(),
            ground_truth: case.ground_truth.clone(),
        }
    }
}
