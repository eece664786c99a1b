//! Turning collection failures into something a user can act on.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use resa_core::SourceKind;

use crate::error::SourceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    ApiAuth,
    RateLimit,
    Timeout,
    Network,
    InvalidResponse,
    Unknown,
}

impl ErrorCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::ApiAuth => "api_auth",
            ErrorCategory::RateLimit => "api_rate_limit",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Network => "network",
            ErrorCategory::InvalidResponse => "invalid_response",
            ErrorCategory::Unknown => "unknown",
        }
    }

    #[must_use]
    pub fn suggestions(self) -> &'static [&'static str] {
        match self {
            ErrorCategory::ApiAuth => &[
                "Check that your API key is correctly set in .env file",
                "Verify the API key hasn't expired",
                "Ensure there are no extra spaces in the API key",
            ],
            ErrorCategory::RateLimit => &[
                "Wait a few minutes before retrying",
                "Consider reducing --max-items value",
                "Check your API quota/usage limits",
            ],
            ErrorCategory::Network => &[
                "Check your internet connection",
                "Try again in a few moments",
                "Check if the API service is experiencing downtime",
            ],
            ErrorCategory::InvalidResponse => &[
                "The API returned unexpected data format",
                "Try with a different topic or search term",
                "Check if the service has updated their API",
            ],
            ErrorCategory::Timeout => &[
                "The request took too long to complete",
                "Try reducing --max-items value",
                "Check your network connection speed",
            ],
            ErrorCategory::Unknown => &[
                "Review the error message above",
                "Check your configuration in .env file",
                "Try running with --help for usage information",
            ],
        }
    }
}

fn categorize_status(status: u16) -> ErrorCategory {
    match status {
        401 | 403 => ErrorCategory::ApiAuth,
        429 => ErrorCategory::RateLimit,
        408 | 504 => ErrorCategory::Timeout,
        500..=599 => ErrorCategory::Network,
        _ => ErrorCategory::Unknown,
    }
}

/// Keyword heuristics for errors that only carry a message.
fn categorize_message(message: &str) -> ErrorCategory {
    let message = message.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| message.contains(n));
    if has(&["auth", "401", "403"]) {
        ErrorCategory::ApiAuth
    } else if has(&["rate limit", "429"]) {
        ErrorCategory::RateLimit
    } else if has(&["timeout", "timed out"]) {
        ErrorCategory::Timeout
    } else if has(&["network", "connection"]) {
        ErrorCategory::Network
    } else if has(&["invalid", "json"]) {
        ErrorCategory::InvalidResponse
    } else {
        ErrorCategory::Unknown
    }
}

#[must_use]
pub fn categorize(err: &SourceError) -> ErrorCategory {
    match err {
        SourceError::Http(e) => {
            if let Some(status) = e.status() {
                categorize_status(status.as_u16())
            } else if e.is_timeout() {
                ErrorCategory::Timeout
            } else if e.is_connect() || e.is_request() {
                ErrorCategory::Network
            } else if e.is_decode() || e.is_body() {
                ErrorCategory::InvalidResponse
            } else {
                categorize_message(&e.to_string())
            }
        }
        SourceError::UnexpectedStatus { status, .. } => categorize_status(*status),
        SourceError::Xml(_) | SourceError::Deserialize { .. } => ErrorCategory::InvalidResponse,
        SourceError::Twitter(message) => categorize_message(message),
    }
}

/// Troubleshooting steps for `err`, most useful first.
#[must_use]
pub fn suggest_fixes(err: &SourceError) -> &'static [&'static str] {
    categorize(err).suggestions()
}

/// One-line console message for a failed source.
#[must_use]
pub fn collection_failure_message(source: SourceKind, err: &SourceError) -> String {
    format!("❌ {} collection failed: {err}", source.label())
}

/// Write the details of a collection failure to
/// `{dir}/error_{source}_{YYYYmmdd_HHMMSS}.log`.
///
/// # Errors
///
/// Returns the I/O error if the directory or file cannot be written.
pub fn log_error_to_file(
    dir: &Path,
    source: SourceKind,
    error: &SourceError,
    context: &[(&str, String)],
) -> Result<PathBuf, io::Error> {
    fs::create_dir_all(dir)?;
    let now = chrono::Local::now();
    let path = dir.join(format!(
        "error_{}_{}.log",
        source.as_str(),
        now.format("%Y%m%d_%H%M%S")
    ));

    let mut body = format!(
        "Error Report - {}\nTimestamp: {}\n\nContext:\n",
        source.label(),
        now.format("%Y-%m-%d %H:%M:%S")
    );
    for (key, value) in context {
        let _ = writeln!(body, "  {key}: {value}");
    }
    let _ = write!(
        body,
        "\nError Type: {}\nError Message: {error}\n",
        categorize(error).as_str()
    );

    fs::write(&path, body)?;
    tracing::debug!(path = %path.display(), "error details logged");
    Ok(path)
}

/// Summary line for a run where some sources failed.
#[must_use]
pub fn partial_success_message(
    succeeded: &[SourceKind],
    failed: &[SourceKind],
    total_items: usize,
) -> String {
    let labels = |kinds: &[SourceKind]| {
        kinds
            .iter()
            .map(|k| k.label())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut parts = Vec::new();
    if !succeeded.is_empty() {
        parts.push(format!(
            "✓ Successfully collected {total_items} items from: {}",
            labels(succeeded)
        ));
    }
    if !failed.is_empty() {
        parts.push(format!("⚠️  Failed to collect from: {}", labels(failed)));
    }
    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> SourceError {
        SourceError::UnexpectedStatus {
            status,
            url: "https://news.example".to_owned(),
        }
    }

    #[test]
    fn statuses_map_to_categories() {
        assert_eq!(categorize(&status(401)), ErrorCategory::ApiAuth);
        assert_eq!(categorize(&status(403)), ErrorCategory::ApiAuth);
        assert_eq!(categorize(&status(429)), ErrorCategory::RateLimit);
        assert_eq!(categorize(&status(504)), ErrorCategory::Timeout);
        assert_eq!(categorize(&status(502)), ErrorCategory::Network);
        assert_eq!(categorize(&status(404)), ErrorCategory::Unknown);
    }

    #[test]
    fn decode_failures_are_invalid_responses() {
        let json = serde_json::from_str::<()>("nope").unwrap_err();
        let err = SourceError::Deserialize {
            context: "bird".to_owned(),
            source: json,
        };
        assert_eq!(categorize(&err), ErrorCategory::InvalidResponse);
    }

    #[test]
    fn cli_messages_use_keyword_heuristics() {
        let cases = [
            ("401 Unauthorized", ErrorCategory::ApiAuth),
            ("Rate limit exceeded", ErrorCategory::RateLimit),
            ("request timed out", ErrorCategory::Timeout),
            ("connection reset by peer", ErrorCategory::Network),
            ("something odd", ErrorCategory::Unknown),
        ];
        for (message, expected) in cases {
            let err = SourceError::Twitter(message.to_owned());
            assert_eq!(categorize(&err), expected, "{message}");
        }
    }

    #[test]
    fn suggestions_follow_category() {
        assert_eq!(
            suggest_fixes(&status(429))[0],
            "Wait a few minutes before retrying"
        );
        assert_eq!(suggest_fixes(&status(404)).len(), 3);
    }

    #[test]
    fn failure_message_names_the_source() {
        assert_eq!(
            collection_failure_message(SourceKind::Web, &status(500)),
            "❌ Web collection failed: unexpected HTTP status 500 from https://news.example"
        );
    }

    #[test]
    fn partial_success_lists_both_sides() {
        assert_eq!(
            partial_success_message(&[SourceKind::Web], &[SourceKind::X], 12),
            "✓ Successfully collected 12 items from: Web | ⚠️  Failed to collect from: X"
        );
        assert_eq!(
            partial_success_message(&[], &[SourceKind::X, SourceKind::Web], 0),
            "⚠️  Failed to collect from: X, Web"
        );
    }

    #[test]
    fn error_log_file_carries_context() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        let path = log_error_to_file(
            &logs,
            SourceKind::X,
            &SourceError::Twitter("bird exited with 1".to_owned()),
            &[("topic", "Uniswap".to_owned()), ("max_items", "20".to_owned())],
        )
        .unwrap();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("error_x_"), "{name}");
        assert!(name.ends_with(".log"));

        let body = fs::read_to_string(&path).unwrap();
        assert!(body.starts_with("Error Report - X\n"));
        assert!(body.contains("  topic: Uniswap\n"));
        assert!(body.contains("  max_items: 20\n"));
        assert!(body.contains("Error Message: bird CLI error: bird exited with 1"));
    }
}
