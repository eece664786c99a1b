//! Hosted-model text generation for research narratives.
//!
//! [`TextGenerator`] is the only seam the rest of the workspace depends on.
//! [`ClaudeClient`] and [`GeminiClient`] implement it over HTTP, and
//! [`LlmClient`] picks between them from configuration.

pub mod analyzer;
pub mod claude;
pub mod client;
pub mod error;
pub mod followup;
pub mod gemini;
pub mod generator;
pub mod prompts;

pub use analyzer::{analyze, AnalysisMetadata, AnalysisOutcome};
pub use claude::ClaudeClient;
pub use client::LlmClient;
pub use error::LlmError;
pub use followup::{answer_question, extract_relevant_items, MAX_FOLLOWUP_ITEMS};
pub use gemini::GeminiClient;
pub use generator::{Generation, TextGenerator};
pub use prompts::{analysis_prompt, followup_prompt, FollowupContext};
