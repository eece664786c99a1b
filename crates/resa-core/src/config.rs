use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but malformed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but malformed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap`.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but malformed.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let anthropic_api_key = optional("ANTHROPIC_API_KEY");
    let gemini_api_key = optional("GEMINI_API_KEY");
    let twitter_auth_token = optional("TWITTER_AUTH_TOKEN");
    let twitter_ct0 = optional("TWITTER_CT0");

    let claude_model = or_default("RESA_CLAUDE_MODEL", "claude-sonnet-4-20250514");
    let claude_max_tokens = parse_number::<u32>(&or_default, "RESA_CLAUDE_MAX_TOKENS", "4096")?;
    let gemini_model = or_default("RESA_GEMINI_MODEL", "gemini-2.0-flash");
    let gemini_max_tokens = parse_number::<u32>(&or_default, "RESA_GEMINI_MAX_TOKENS", "8192")?;
    let llm_temperature = parse_number::<f32>(&or_default, "RESA_LLM_TEMPERATURE", "0.7")?;
    if !(0.0..=2.0).contains(&llm_temperature) {
        return Err(ConfigError::InvalidEnvVar {
            var: "RESA_LLM_TEMPERATURE".to_string(),
            reason: format!("{llm_temperature} is outside 0.0..=2.0"),
        });
    }

    let output_dir = PathBuf::from(or_default("RESA_OUTPUT_DIR", "./reports"));
    let log_dir = PathBuf::from(or_default("RESA_LOG_DIR", "./logs"));
    let log_level = or_default("RESA_LOG_LEVEL", "info");

    let http_timeout_secs = parse_number::<u64>(&or_default, "RESA_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("RESA_USER_AGENT", "resa/0.1 (research-automation)");
    let max_retries = parse_number::<u32>(&or_default, "RESA_MAX_RETRIES", "4")?;
    let retry_backoff_base_ms =
        parse_number::<u64>(&or_default, "RESA_RETRY_BACKOFF_BASE_MS", "2000")?;
    let retry_max_delay_ms = parse_number::<u64>(&or_default, "RESA_RETRY_MAX_DELAY_MS", "30000")?;
    let default_max_items = parse_number::<usize>(&or_default, "RESA_DEFAULT_MAX_ITEMS", "20")?;

    Ok(AppConfig {
        anthropic_api_key,
        gemini_api_key,
        twitter_auth_token,
        twitter_ct0,
        claude_model,
        claude_max_tokens,
        gemini_model,
        gemini_max_tokens,
        llm_temperature,
        output_dir,
        log_dir,
        log_level,
        http_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        retry_max_delay_ms,
        default_max_items,
    })
}

fn parse_number<T>(
    or_default: &dyn Fn(&str, &str) -> String,
    var: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = or_default(var, default);
    raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
