//! Narrative analysis of the collected items.

use resa_core::{AnalysisDepth, DataItem};
use serde::Serialize;

use crate::error::LlmError;
use crate::generator::TextGenerator;
use crate::prompts::analysis_prompt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisMetadata {
    pub model: String,
    pub tokens_used: Option<u64>,
    pub depth: AnalysisDepth,
    pub items_analyzed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    /// Markdown narrative written by the model.
    pub text: String,
    pub metadata: AnalysisMetadata,
}

/// Ask `generator` for a research analysis of `items`.
///
/// # Errors
///
/// Returns [`LlmError::NoData`] when `items` is empty, otherwise whatever
/// the generator fails with.
pub async fn analyze<G>(
    generator: &G,
    topic: &str,
    items: &[DataItem],
    depth: AnalysisDepth,
) -> Result<AnalysisOutcome, LlmError>
where
    G: TextGenerator + ?Sized,
{
    if items.is_empty() {
        tracing::warn!(topic, "no data to analyze");
        return Err(LlmError::NoData);
    }

    tracing::info!(
        topic,
        items = items.len(),
        model = generator.model_name(),
        %depth,
        "analyzing collected items"
    );
    let prompt = analysis_prompt(topic, items, depth);
    let generation = generator.generate(&prompt).await?;

    Ok(AnalysisOutcome {
        text: generation.text,
        metadata: AnalysisMetadata {
            model: generator.model_name().to_owned(),
            tokens_used: generation.tokens_used,
            depth,
            items_analyzed: items.len(),
        },
    })
}
