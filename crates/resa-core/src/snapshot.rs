//! Derived, point-in-time summaries of a run's collected items.
//!
//! These structures are produced by `resa-analysis`, embedded into reports by
//! `resa-report`, and reconstructed from earlier reports for comparison.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Compound scores at or above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound scores at or below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

impl SentimentLabel {
    /// Classify a compound score in `[-1, 1]`.
    #[must_use]
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Positive" => Ok(SentimentLabel::Positive),
            "Negative" => Ok(SentimentLabel::Negative),
            "Neutral" => Ok(SentimentLabel::Neutral),
            "Unknown" => Ok(SentimentLabel::Unknown),
            other => Err(ConfigError::UnknownVariant {
                kind: "sentiment label",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: CategoryShare,
    pub neutral: CategoryShare,
    pub negative: CategoryShare,
}

/// Aggregate polarity of a run's items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSnapshot {
    pub overall: SentimentLabel,
    /// Mean compound score, rounded to 3 decimals.
    pub average_compound: f64,
    pub distribution: SentimentDistribution,
    pub total_analyzed: usize,
}

impl SentimentSnapshot {
    /// The snapshot of a run with nothing to analyze.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            overall: SentimentLabel::Unknown,
            average_compound: 0.0,
            distribution: SentimentDistribution::default(),
            total_analyzed: 0,
        }
    }
}

/// One ranked keyword. Lower score means more important.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub keyword: String,
    pub score: f64,
}

impl Keyword {
    #[must_use]
    pub fn new(keyword: impl Into<String>, score: f64) -> Self {
        Self {
            keyword: keyword.into(),
            score,
        }
    }
}

impl AsRef<str> for Keyword {
    fn as_ref(&self) -> &str {
        &self.keyword
    }
}

pub type KeywordList = Vec<Keyword>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Canonical `YYYY-MM-DD` day key.
    pub date: String,
    pub count: usize,
    /// Mean of likes + retweets over the day's X posts, 1 decimal.
    pub avg_engagement: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyStats {
    pub total_days: usize,
    pub avg_per_day: f64,
    pub max_per_day: usize,
    pub min_per_day: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementTrends {
    pub available: bool,
    pub total_posts: usize,
    pub avg_likes: f64,
    pub avg_retweets: f64,
    pub avg_replies: f64,
    pub total_engagement: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            start: UNKNOWN_DATE.to_string(),
            end: UNKNOWN_DATE.to_string(),
        }
    }
}

/// Sentinel day key for items whose date could not be normalized.
pub const UNKNOWN_DATE: &str = "Unknown";

/// Temporal statistics over a run's items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSnapshot {
    pub timeline: Vec<TimelineEntry>,
    pub frequency: FrequencyStats,
    pub engagement_trends: EngagementTrends,
    /// Number of distinct dated days.
    pub total_dates: usize,
    pub date_range: DateRange,
}

impl TrendSnapshot {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            timeline: Vec::new(),
            frequency: FrequencyStats::default(),
            engagement_trends: EngagementTrends::default(),
            total_dates: 0,
            date_range: DateRange::unknown(),
        }
    }
}

/// How the overall sentiment label moved between two runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftDirection {
    Stable,
    Improved,
    Declined,
    Mixed,
}

impl ShiftDirection {
    /// Arrow glyph shown in rendered reports.
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            ShiftDirection::Stable => "→",
            ShiftDirection::Improved => "↗️",
            ShiftDirection::Declined => "↘️",
            ShiftDirection::Mixed => "↔️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentChange {
    pub old: String,
    pub new: String,
    pub direction: ShiftDirection,
    /// `new - old` average compound, 3 decimals.
    pub compound_change: f64,
}

/// Differences between the current run and a previous report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub sentiment_change: Option<SentimentChange>,
    /// At most 10, first-seen casing.
    pub new_topics: Vec<String>,
    /// At most 10, first-seen casing.
    pub removed_topics: Vec<String>,
    pub total_new: usize,
    pub total_removed: usize,
    pub trend_direction: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated: Option<String>,
    pub data_sources: Option<String>,
    pub model: Option<String>,
}

/// Sentiment block recovered from an earlier report. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedSentiment {
    pub overall: Option<String>,
    pub average_compound: Option<f64>,
    pub positive: Option<CategoryShare>,
    pub neutral: Option<CategoryShare>,
    pub negative: Option<CategoryShare>,
}

impl ParsedSentiment {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overall.is_none()
            && self.average_compound.is_none()
            && self.positive.is_none()
            && self.neutral.is_none()
            && self.negative.is_none()
    }
}

impl From<&SentimentSnapshot> for ParsedSentiment {
    fn from(snapshot: &SentimentSnapshot) -> Self {
        Self {
            overall: Some(snapshot.overall.as_str().to_string()),
            average_compound: Some(snapshot.average_compound),
            positive: Some(snapshot.distribution.positive),
            neutral: Some(snapshot.distribution.neutral),
            negative: Some(snapshot.distribution.negative),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCounts {
    pub x_count: Option<usize>,
    pub web_count: Option<usize>,
}

/// Best-effort reconstruction of a previously generated report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviousReportSnapshot {
    pub metadata: ReportMetadata,
    pub sentiment: Option<ParsedSentiment>,
    pub keywords: Vec<String>,
    pub sources: SourceCounts,
    pub analysis: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_thresholds_are_inclusive() {
        assert_eq!(SentimentLabel::from_compound(0.05), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_compound(-0.05), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_compound(0.049), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_compound(-0.049), SentimentLabel::Neutral);
    }

    #[test]
    fn label_round_trips_through_str() {
        for label in [
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Neutral,
            SentimentLabel::Unknown,
        ] {
            assert_eq!(label.as_str().parse::<SentimentLabel>().unwrap(), label);
        }
    }

    #[test]
    fn empty_trend_snapshot_has_unknown_range() {
        let empty = TrendSnapshot::empty();
        assert_eq!(empty.date_range.start, "Unknown");
        assert_eq!(empty.date_range.end, "Unknown");
        assert!(!empty.engagement_trends.available);
    }

    #[test]
    fn parsed_sentiment_from_snapshot_keeps_every_field() {
        let snap = SentimentSnapshot {
            overall: SentimentLabel::Positive,
            average_compound: 0.321,
            distribution: SentimentDistribution {
                positive: CategoryShare {
                    count: 3,
                    percentage: 60.0,
                },
                neutral: CategoryShare {
                    count: 1,
                    percentage: 20.0,
                },
                negative: CategoryShare {
                    count: 1,
                    percentage: 20.0,
                },
            },
            total_analyzed: 5,
        };
        let parsed = ParsedSentiment::from(&snap);
        assert_eq!(parsed.overall.as_deref(), Some("Positive"));
        assert_eq!(parsed.positive.map(|s| s.count), Some(3));
        assert!(!parsed.is_empty());
    }
}
