//! Provider selection and shared HTTP plumbing.

use std::time::Duration;

use reqwest::{Client, Response};
use resa_core::{AppConfig, ModelProvider};

use crate::claude::ClaudeClient;
use crate::error::LlmError;
use crate::gemini::GeminiClient;
use crate::generator::{Generation, TextGenerator};

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<Client, LlmError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .build()?)
}

/// Build an [`LlmError::Api`] from a non-success response, preferring the
/// provider's `error.message` over the raw body.
pub(crate) async fn error_from_response(provider: &'static str, response: Response) -> LlmError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.pointer("/error/message")?.as_str().map(str::to_owned))
        .unwrap_or(body);
    tracing::warn!(provider, status, message = %message, "model API returned an error");
    LlmError::Api {
        provider,
        status,
        message,
    }
}

/// Whichever provider the run was configured with.
pub enum LlmClient {
    Claude(ClaudeClient),
    Gemini(GeminiClient),
}

impl LlmClient {
    /// Build the client for `provider` from the app configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] when the provider's API key is missing,
    /// or [`LlmError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig, provider: ModelProvider) -> Result<Self, LlmError> {
        let api_key = config.require_model_key(provider)?;
        let model = config.model_name(provider);
        let timeout = config.http_timeout_secs.max(60);
        Ok(match provider {
            ModelProvider::Claude => Self::Claude(ClaudeClient::new(
                api_key,
                model,
                config.claude_max_tokens,
                config.llm_temperature,
                timeout,
            )?),
            ModelProvider::Gemini => Self::Gemini(GeminiClient::new(
                api_key,
                model,
                config.gemini_max_tokens,
                config.llm_temperature,
                timeout,
            )?),
        })
    }

    #[must_use]
    pub fn provider(&self) -> ModelProvider {
        match self {
            Self::Claude(_) => ModelProvider::Claude,
            Self::Gemini(_) => ModelProvider::Gemini,
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for LlmClient {
    fn model_name(&self) -> &str {
        match self {
            Self::Claude(c) => c.model_name(),
            Self::Gemini(c) => c.model_name(),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<Generation, LlmError> {
        match self {
            Self::Claude(c) => c.generate(prompt).await,
            Self::Gemini(c) => c.generate(prompt).await,
        }
    }
}
