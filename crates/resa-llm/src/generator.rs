use crate::error::LlmError;

/// Text produced by a model for one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    /// Input plus output tokens, when the provider reports them.
    pub tokens_used: Option<u64>,
}

/// A hosted model that turns a prompt into text.
///
/// The analyzers only depend on this trait, so tests can substitute a fake.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model identifier recorded in report metadata.
    fn model_name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<Generation, LlmError>;
}
