//! X (Twitter) collector via the `bird` CLI.
//!
//! Invokes `bird search "{topic}" --json -n {max} --auth-token ... --ct0 ...`
//! as a subprocess. Returns an empty vec if credentials are not configured.

use std::collections::HashSet;

use chrono::DateTime;
use resa_core::{AppConfig, DataItem, Engagement};
use serde::Deserialize;

use crate::error::SourceError;

const CLASSIC_TWITTER_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BirdTweet {
    id: String,
    text: String,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    retweet_count: u64,
    #[serde(default)]
    reply_count: u64,
    author: BirdAuthor,
}

#[derive(Deserialize)]
struct BirdAuthor {
    username: String,
}

/// Collects X posts for a topic.
#[derive(Debug, Clone)]
pub struct XCollector {
    program: String,
    credentials: Option<(String, String)>,
}

impl XCollector {
    #[must_use]
    pub fn new(auth_token: Option<&str>, ct0: Option<&str>) -> Self {
        let credentials = match (auth_token, ct0) {
            (Some(a), Some(c)) if !a.is_empty() && !c.is_empty() => {
                Some((a.to_owned(), c.to_owned()))
            }
            _ => None,
        };
        Self {
            program: "bird".to_owned(),
            credentials,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        match config.twitter_credentials() {
            Some((auth_token, ct0)) => Self::new(Some(auth_token), Some(ct0)),
            None => Self::new(None, None),
        }
    }

    /// Run a different executable in place of `bird`.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Search X for `topic`, returning at most `max_items` posts.
    ///
    /// Silently returns an empty `Vec` when credentials are absent.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Twitter`] if the subprocess cannot be spawned
    /// or exits non-zero, and [`SourceError::Deserialize`] if its output is
    /// not the expected JSON.
    pub async fn collect(&self, topic: &str, max_items: usize) -> Result<Vec<DataItem>, SourceError> {
        let Some((auth_token, ct0)) = &self.credentials else {
            tracing::info!("X credentials not configured, skipping X collection");
            return Ok(vec![]);
        };

        let query = format!("\"{topic}\"");
        let limit = max_items.to_string();
        let output = tokio::process::Command::new(&self.program)
            .args([
                "search",
                query.as_str(),
                "--json",
                "-n",
                limit.as_str(),
                "--auth-token",
                auth_token.as_str(),
                "--ct0",
                ct0.as_str(),
            ])
            .output()
            .await
            .map_err(|e| SourceError::Twitter(format!("{} subprocess error: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SourceError::Twitter(format!(
                "{} search exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let tweets: Vec<BirdTweet> =
            serde_json::from_slice(&output.stdout).map_err(|e| SourceError::Deserialize {
                context: format!("bird search(query={query})"),
                source: e,
            })?;
        let items = tweets_to_items(tweets, max_items);
        tracing::debug!(topic, count = items.len(), "collected X posts");
        Ok(items)
    }
}

fn tweets_to_items(tweets: Vec<BirdTweet>, max_items: usize) -> Vec<DataItem> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut items = Vec::new();
    for tweet in tweets {
        let url = format!(
            "https://x.com/{}/status/{}",
            tweet.author.username, tweet.id
        );
        if !seen.insert(url.clone()) {
            continue;
        }
        let date = tweet
            .created_at
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(normalize_created_at);
        items.push(DataItem::x_post(
            tweet.text,
            tweet.author.username,
            date,
            url,
            Engagement {
                likes: tweet.like_count,
                retweets: tweet.retweet_count,
                replies: tweet.reply_count,
            },
        ));
        if items.len() >= max_items {
            break;
        }
    }
    items
}

/// RFC 3339 or classic Twitter `createdAt` → RFC 3339; anything else is kept
/// as given.
fn normalize_created_at(raw: &str) -> String {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, CLASSIC_TWITTER_FORMAT))
        .map_or_else(|_| raw.to_string(), |d| d.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;
    use resa_core::SourceKind;

    fn parse(json: &str) -> Vec<BirdTweet> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn maps_tweets_to_x_items() {
        let tweets = parse(
            r#"[
                {
                    "id": "1234567890",
                    "text": "Uniswap hooks are wild",
                    "createdAt": "Wed Jan 31 18:22:05 +0000 2024",
                    "likeCount": 42,
                    "retweetCount": 7,
                    "replyCount": 2,
                    "author": { "username": "alice", "name": "Alice" },
                    "authorId": "111"
                }
            ]"#,
        );
        let items = tweets_to_items(tweets, 10);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.source(), SourceKind::X);
        assert_eq!(item.url, "https://x.com/alice/status/1234567890");
        assert_eq!(item.author, "alice");
        assert_eq!(item.date.as_deref(), Some("2024-01-31T18:22:05+00:00"));
        assert_eq!(
            item.engagement(),
            Some(&Engagement {
                likes: 42,
                retweets: 7,
                replies: 2,
            })
        );
    }

    #[test]
    fn missing_counts_and_dates_default() {
        let tweets = parse(r#"[{ "id": "9", "text": "gm", "author": { "username": "bob" } }]"#);
        let items = tweets_to_items(tweets, 10);
        assert!(items[0].date.is_none());
        assert_eq!(items[0].engagement(), Some(&Engagement::default()));
    }

    #[test]
    fn duplicates_are_dropped_and_limit_applies() {
        let tweets = parse(
            r#"[
                { "id": "1", "text": "a", "author": { "username": "u" } },
                { "id": "1", "text": "a again", "author": { "username": "u" } },
                { "id": "2", "text": "b", "author": { "username": "u" } },
                { "id": "3", "text": "c", "author": { "username": "u" } }
            ]"#,
        );
        let items = tweets_to_items(tweets, 2);
        let urls: Vec<&str> = items.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://x.com/u/status/1", "https://x.com/u/status/2"]
        );
    }

    #[test]
    fn created_at_formats() {
        assert_eq!(
            normalize_created_at("2024-01-01T00:00:00Z"),
            "2024-01-01T00:00:00+00:00"
        );
        assert_eq!(
            normalize_created_at("Mon Jan 01 12:00:00 +0100 2024"),
            "2024-01-01T12:00:00+01:00"
        );
        assert_eq!(normalize_created_at("3h"), "3h");
    }

    #[tokio::test]
    async fn returns_empty_without_credentials() {
        let collector = XCollector::new(Some("token"), None);
        assert!(!collector.has_credentials());
        let items = collector.collect("Uniswap", 10).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn missing_binary_is_a_twitter_error() {
        let collector = XCollector::new(Some("token"), Some("ct0"))
            .with_program("resa-test-no-such-bird-binary");
        let err = collector.collect("Uniswap", 10).await.unwrap_err();
        assert!(matches!(err, SourceError::Twitter(_)), "got {err:?}");
    }
}
