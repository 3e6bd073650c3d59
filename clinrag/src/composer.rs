//! Grounded answer composition.
//!
//! Answering a question is two steps, always in this order:
//!
//! 1. **Retrieve** passages for the question and join them, in retrieval
//!    order, into one context block.
//! 2. **Generate** with a fixed system instruction that restricts the model
//!    to that context, at temperature 0.
//!
//! The model's reply is returned verbatim. Whether it actually stayed inside
//! the context is measured by the evaluation harness, not checked here.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::document::SearchResult;
use crate::error::Result;
use crate::llm::LanguageModel;
use crate::retriever::Retriever;

/// The sentence the model is told to give when the context has no answer.
pub const FALLBACK_ANSWER: &str = "I cannot find this in the guidelines.";

/// System instruction sent with every question.
pub const SYSTEM_INSTRUCTION: &str = "You are a strictly clinical assistant answering questions \
about clinical guidelines. Answer only from the provided context. If the answer is not present \
in the context, respond with exactly: I cannot find this in the guidelines. Do not use outside \
knowledge.";

/// Separator placed between retrieved passages in the context block.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// An answer together with the passages it was composed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundedAnswer {
    /// The model's response, unmodified.
    pub answer: String,
    /// Retrieved passages in retrieval order.
    pub contexts: Vec<SearchResult>,
}

impl GroundedAnswer {
    /// The retrieved passage texts in retrieval order.
    pub fn context_texts(&self) -> Vec<String> {
        self.contexts.iter().map(|r| r.passage.text.clone()).collect()
    }
}

/// Join passage texts into a single context block, preserving order.
pub fn format_context(results: &[SearchResult]) -> String {
    results.iter().map(|r| r.passage.text.as_str()).collect::<Vec<_>>().join(CONTEXT_SEPARATOR)
}

/// Build the user prompt carrying the context and the question.
pub fn format_user_prompt(context: &str, question: &str) -> String {
    format!("Context:\n{context}\n\nQuestion: {question}\n\nAnswer:")
}

/// Retrieves context for a question and asks a language model to answer from it.
pub struct AnswerComposer {
    retriever: Retriever,
    model: Arc<dyn LanguageModel>,
    temperature: f32,
}

impl AnswerComposer {
    /// Create a composer decoding at temperature 0.
    pub fn new(retriever: Retriever, model: Arc<dyn LanguageModel>) -> Self {
        Self { retriever, model, temperature: 0.0 }
    }

    /// Override the decoding temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// The retriever used for the first step.
    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Answer a question, returning only the model text.
    ///
    /// # Errors
    ///
    /// - [`RagError::GenerationError`](crate::RagError::GenerationError) if
    ///   embedding the question or calling the model fails.
    /// - [`RagError::NotFoundError`](crate::RagError::NotFoundError) if the
    ///   collection does not exist.
    pub async fn answer(&self, question: &str) -> Result<String> {
        Ok(self.answer_with_context(question).await?.answer)
    }

    /// Answer a question and also return the passages used as context.
    pub async fn answer_with_context(&self, question: &str) -> Result<GroundedAnswer> {
        let contexts = self.retriever.retrieve(question).await.map_err(|e| {
            error!(error = %e, "retrieval failed");
            e.into_generation()
        })?;
        debug!(passage_count = contexts.len(), "retrieved context");

        let user_prompt = format_user_prompt(&format_context(&contexts), question);
        let answer = self
            .model
            .complete(SYSTEM_INSTRUCTION, &user_prompt, self.temperature)
            .await
            .map_err(|e| {
                error!(model = self.model.name(), error = %e, "generation failed");
                e.into_generation()
            })?;

        info!(model = self.model.name(), passage_count = contexts.len(), "composed answer");
        Ok(GroundedAnswer { answer, contexts })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::document::Passage;

    fn result(text: &str) -> SearchResult {
        SearchResult {
            passage: Passage { id: text.into(), text: text.into(), metadata: HashMap::new() },
            score: 1.0,
        }
    }

    #[test]
    fn context_keeps_retrieval_order() {
        let context = format_context(&[result("second best"), result("third")]);
        assert_eq!(context, "second best\n\n---\n\nthird");
    }

    #[test]
    fn empty_retrieval_gives_empty_context() {
        assert_eq!(format_context(&[]), "");
    }

    #[test]
    fn user_prompt_carries_context_then_question() {
        let prompt = format_user_prompt("ctx", "What dose?");
        assert_eq!(prompt, "Context:\nctx\n\nQuestion: What dose?\n\nAnswer:");
    }

    #[test]
    fn instruction_names_the_fallback_sentence() {
        assert!(SYSTEM_INSTRUCTION.contains(FALLBACK_ANSWER));
    }
}
