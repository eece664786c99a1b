use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which collector produced a [`DataItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    X,
    Web,
}

impl SourceKind {
    /// Every supported source, in collection order.
    pub const ALL: [SourceKind; 2] = [SourceKind::X, SourceKind::Web];

    /// Machine key used on the wire and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::X => "x",
            SourceKind::Web => "web",
        }
    }

    /// Human label used in reports and console output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::X => "X",
            SourceKind::Web => "Web",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" | "twitter" => Ok(SourceKind::X),
            "web" => Ok(SourceKind::Web),
            other => Err(ConfigError::UnknownVariant {
                kind: "source",
                value: other.to_string(),
            }),
        }
    }
}

/// How much work the narrative analysis should do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisDepth {
    Quick,
    #[default]
    Detailed,
}

impl AnalysisDepth {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisDepth::Quick => "quick",
            AnalysisDepth::Detailed => "detailed",
        }
    }
}

impl fmt::Display for AnalysisDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisDepth {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quick" => Ok(AnalysisDepth::Quick),
            "detailed" => Ok(AnalysisDepth::Detailed),
            other => Err(ConfigError::UnknownVariant {
                kind: "analysis depth",
                value: other.to_string(),
            }),
        }
    }
}

/// Social counters attached to X posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub retweets: u64,
    #[serde(default)]
    pub replies: u64,
}

impl Engagement {
    /// Likes plus retweets, the per-day timeline engagement measure.
    #[must_use]
    pub fn likes_and_retweets(&self) -> u64 {
        self.likes.saturating_add(self.retweets)
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.likes
            .saturating_add(self.retweets)
            .saturating_add(self.replies)
    }
}

/// Source-specific part of a [`DataItem`].
///
/// Serialized inline with the shared fields, tagged by `"source": "x" | "web"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum SourcePayload {
    X {
        #[serde(default)]
        engagement: Engagement,
    },
    Web {
        #[serde(default)]
        title: String,
    },
}

/// One collected unit of evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataItem {
    #[serde(flatten)]
    pub payload: SourcePayload,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    /// Free-form date string as reported by the source. May be unparseable.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl DataItem {
    /// Build an X post item.
    #[must_use]
    pub fn x_post(
        content: impl Into<String>,
        author: impl Into<String>,
        date: Option<String>,
        url: impl Into<String>,
        engagement: Engagement,
    ) -> Self {
        Self {
            payload: SourcePayload::X { engagement },
            content: content.into(),
            author: author.into(),
            date,
            url: url.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Build a web search result item.
    #[must_use]
    pub fn web_result(
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
        date: Option<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            payload: SourcePayload::Web {
                title: title.into(),
            },
            content: content.into(),
            author: author.into(),
            date,
            url: url.into(),
            metadata: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn source(&self) -> SourceKind {
        match self.payload {
            SourcePayload::X { .. } => SourceKind::X,
            SourcePayload::Web { .. } => SourceKind::Web,
        }
    }

    /// Engagement counters; `None` for web results.
    #[must_use]
    pub fn engagement(&self) -> Option<&Engagement> {
        match &self.payload {
            SourcePayload::X { engagement } => Some(engagement),
            SourcePayload::Web { .. } => None,
        }
    }

    /// Title of a web result; empty for X posts.
    #[must_use]
    pub fn title(&self) -> &str {
        match &self.payload {
            SourcePayload::Web { title } => title,
            SourcePayload::X { .. } => "",
        }
    }

    /// The text field: `content` when present, otherwise the web title.
    ///
    /// Returns `None` when the item carries no text at all.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        if !self.content.is_empty() {
            return Some(&self.content);
        }
        let title = self.title();
        (!title.is_empty()).then_some(title)
    }

    /// The date string used for bucketing: `date`, then `metadata["date"]`.
    #[must_use]
    pub fn raw_date(&self) -> Option<&str> {
        self.date
            .as_deref()
            .filter(|d| !d.is_empty())
            .or_else(|| self.metadata.get("date").map(String::as_str))
            .filter(|d| !d.is_empty())
    }
}
