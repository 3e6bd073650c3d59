//! Language model interface used to compose answers.

use async_trait::async_trait;

use crate::error::Result;

/// A chat-style language model taking a system and a user prompt.
///
/// Implementations must honor `temperature`; grounded answering always
/// requests `0.0`. Failures (network, auth, quota) are reported as
/// [`RagError::GenerationError`](crate::RagError::GenerationError). No retries
/// happen above this trait, so any retry policy belongs to the implementation
/// or to the caller.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Return the model's text response to the two prompts.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String>;

    /// A short identifier used in logs.
    fn name(&self) -> &str;
}
