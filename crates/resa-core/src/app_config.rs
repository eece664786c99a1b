use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;

/// Which hosted model writes the narrative analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModelProvider {
    #[default]
    Claude,
    Gemini,
}

impl ModelProvider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ModelProvider::Claude => "claude",
            ModelProvider::Gemini => "gemini",
        }
    }

    /// Environment variable holding this provider's API key.
    #[must_use]
    pub fn api_key_var(self) -> &'static str {
        match self {
            ModelProvider::Claude => "ANTHROPIC_API_KEY",
            ModelProvider::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "claude" => Ok(ModelProvider::Claude),
            "gemini" => Ok(ModelProvider::Gemini),
            other => Err(ConfigError::UnknownVariant {
                kind: "model",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub anthropic_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub twitter_auth_token: Option<String>,
    pub twitter_ct0: Option<String>,
    pub claude_model: String,
    pub claude_max_tokens: u32,
    pub gemini_model: String,
    pub gemini_max_tokens: u32,
    pub llm_temperature: f32,
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub retry_max_delay_ms: u64,
    pub default_max_items: usize,
}

impl AppConfig {
    /// Return the API key for `provider`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming the provider's key
    /// variable when it was not set.
    pub fn require_model_key(&self, provider: ModelProvider) -> Result<&str, ConfigError> {
        let key = match provider {
            ModelProvider::Claude => self.anthropic_api_key.as_deref(),
            ModelProvider::Gemini => self.gemini_api_key.as_deref(),
        };
        key.filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(provider.api_key_var().to_string()))
    }

    /// Model identifier sent to `provider`.
    #[must_use]
    pub fn model_name(&self, provider: ModelProvider) -> &str {
        match provider {
            ModelProvider::Claude => &self.claude_model,
            ModelProvider::Gemini => &self.gemini_model,
        }
    }

    /// `bird` CLI cookies, when both are configured.
    #[must_use]
    pub fn twitter_credentials(&self) -> Option<(&str, &str)> {
        match (&self.twitter_auth_token, &self.twitter_ct0) {
            (Some(a), Some(c)) if !a.is_empty() && !c.is_empty() => Some((a.as_str(), c.as_str())),
            _ => None,
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[redacted]");
        f.debug_struct("AppConfig")
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("twitter_auth_token", &redact(&self.twitter_auth_token))
            .field("twitter_ct0", &redact(&self.twitter_ct0))
            .field("claude_model", &self.claude_model)
            .field("claude_max_tokens", &self.claude_max_tokens)
            .field("gemini_model", &self.gemini_model)
            .field("gemini_max_tokens", &self.gemini_max_tokens)
            .field("llm_temperature", &self.llm_temperature)
            .field("output_dir", &self.output_dir)
            .field("log_dir", &self.log_dir)
            .field("log_level", &self.log_level)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("retry_max_delay_ms", &self.retry_max_delay_ms)
            .field("default_max_items", &self.default_max_items)
            .finish()
    }
}
