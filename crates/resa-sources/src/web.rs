//! Web collector over news RSS search feeds.

use std::collections::HashSet;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use resa_core::{AppConfig, DataItem};

use crate::error::SourceError;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::rss;

const GOOGLE_NEWS_BASE_URL: &str = "https://news.google.com";
const BING_NEWS_BASE_URL: &str = "https://www.bing.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NewsFeed {
    GoogleNews,
    BingNews,
}

impl NewsFeed {
    const ALL: [NewsFeed; 2] = [NewsFeed::GoogleNews, NewsFeed::BingNews];

    fn name(self) -> &'static str {
        match self {
            NewsFeed::GoogleNews => "google_news_rss",
            NewsFeed::BingNews => "bing_news_rss",
        }
    }
}

/// Collects web results for a topic from Google News and Bing News RSS.
#[derive(Debug, Clone)]
pub struct WebCollector {
    client: Client,
    google_base_url: String,
    bing_base_url: String,
    retry: RetryPolicy,
}

impl WebCollector {
    /// Creates a collector pointed at the production feeds.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str, retry: RetryPolicy) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            google_base_url: GOOGLE_NEWS_BASE_URL.to_owned(),
            bing_base_url: BING_NEWS_BASE_URL.to_owned(),
            retry,
        })
    }

    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        Self::new(
            config.http_timeout_secs,
            &config.user_agent,
            RetryPolicy::from_config(config),
        )
    }

    /// Point both feeds at other hosts (for testing with wiremock).
    #[must_use]
    pub fn with_base_urls(mut self, google: &str, bing: &str) -> Self {
        self.google_base_url = google.trim_end_matches('/').to_owned();
        self.bing_base_url = bing.trim_end_matches('/').to_owned();
        self
    }

    fn feed_url(&self, feed: NewsFeed, topic: &str) -> String {
        let encoded = utf8_percent_encode(topic, NON_ALPHANUMERIC).to_string();
        match feed {
            NewsFeed::GoogleNews => format!(
                "{}/rss/search?q={encoded}&hl=en-US&gl=US&ceid=US:en",
                self.google_base_url
            ),
            NewsFeed::BingNews => format!(
                "{}/news/search?q={encoded}&format=rss&mkt=en-US",
                self.bing_base_url
            ),
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String, SourceError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response.text().await?)
    }

    async fn fetch_feed(
        &self,
        feed: NewsFeed,
        topic: &str,
        max_items: usize,
    ) -> Result<Vec<DataItem>, SourceError> {
        let url = self.feed_url(feed, topic);
        let url = url.as_str();
        let body = retry_with_backoff(self.retry, || self.fetch_text(url)).await?;
        rss::parse_feed(&body, max_items)
    }

    /// Query every feed for `topic`, returning at most `max_items` results
    /// de-duplicated by URL.
    ///
    /// A single failing feed is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns the first feed's error when every feed fails.
    pub async fn collect(&self, topic: &str, max_items: usize) -> Result<Vec<DataItem>, SourceError> {
        let mut items = Vec::new();
        let mut first_error = None;
        let mut any_ok = false;

        for feed in NewsFeed::ALL {
            match self.fetch_feed(feed, topic, max_items).await {
                Ok(feed_items) => {
                    tracing::debug!(
                        topic,
                        source = feed.name(),
                        count = feed_items.len(),
                        "collected feed items"
                    );
                    any_ok = true;
                    items.extend(feed_items);
                }
                Err(e) => {
                    tracing::warn!(
                        topic,
                        source = feed.name(),
                        error = %e,
                        "news feed fetch failed"
                    );
                    first_error.get_or_insert(e);
                }
            }
        }

        if !any_ok {
            if let Some(e) = first_error {
                return Err(e);
            }
        }

        let mut seen_urls: HashSet<String> = HashSet::new();
        items.retain(|item| seen_urls.insert(item.url.clone()));
        items.truncate(max_items);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_urls_encode_the_topic() {
        let collector = WebCollector::new(5, "resa-test", RetryPolicy::none())
            .unwrap()
            .with_base_urls("http://g.test/", "http://b.test");
        assert_eq!(
            collector.feed_url(NewsFeed::GoogleNews, "AI agents"),
            "http://g.test/rss/search?q=AI%20agents&hl=en-US&gl=US&ceid=US:en"
        );
        assert_eq!(
            collector.feed_url(NewsFeed::BingNews, "C++"),
            "http://b.test/news/search?q=C%2B%2B&format=rss&mkt=en-US"
        );
    }
}
