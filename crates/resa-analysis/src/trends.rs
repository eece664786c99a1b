//! Temporal aggregation: per-day buckets, frequency and engagement statistics.

use std::collections::BTreeMap;

use resa_core::{
    DataItem, DateRange, EngagementTrends, FrequencyStats, TimelineEntry, TrendSnapshot,
    UNKNOWN_DATE,
};

use crate::dates::normalize_date;
use crate::rounding::round_to;

/// Items grouped by canonical day key.
///
/// Keys iterate in ascending order, which is chronological for zero-padded
/// `YYYY-MM-DD` keys. Within a bucket, items keep collection order.
#[derive(Debug, Default)]
pub struct DateBuckets<'a> {
    buckets: BTreeMap<String, Vec<&'a DataItem>>,
}

impl<'a> DateBuckets<'a> {
    /// Dated buckets in ascending day order. The `Unknown` bucket is skipped.
    pub fn dated(&self) -> impl Iterator<Item = (&str, &[&'a DataItem])> + '_ {
        self.buckets
            .iter()
            .filter(|(day, _)| day.as_str() != UNKNOWN_DATE)
            .map(|(day, items)| (day.as_str(), items.as_slice()))
    }

    /// Items whose date could not be normalized.
    #[must_use]
    pub fn unknown(&self) -> &[&'a DataItem] {
        self.buckets
            .get(UNKNOWN_DATE)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of distinct dated days.
    #[must_use]
    pub fn dated_len(&self) -> usize {
        self.buckets.len() - usize::from(self.buckets.contains_key(UNKNOWN_DATE))
    }
}

/// Assign every item to a day bucket via [`normalize_date`].
///
/// The item's own `date` is used first, then `metadata["date"]`; anything
/// unreadable lands in the `Unknown` bucket.
#[must_use]
pub fn group_by_date(items: &[DataItem]) -> DateBuckets<'_> {
    let mut buckets: BTreeMap<String, Vec<&DataItem>> = BTreeMap::new();
    for item in items {
        let day = normalize_date(item.raw_date());
        buckets.entry(day).or_default().push(item);
    }
    DateBuckets { buckets }
}

/// Compute the [`TrendSnapshot`] for a run's items.
///
/// Never fails. Empty input yields [`TrendSnapshot::empty`].
#[must_use]
pub fn analyze_temporal_trends(items: &[DataItem]) -> TrendSnapshot {
    if items.is_empty() {
        return TrendSnapshot::empty();
    }

    let buckets = group_by_date(items);
    tracing::debug!(
        items = items.len(),
        dated_days = buckets.dated_len(),
        undated = buckets.unknown().len(),
        "grouped items by date"
    );

    let timeline: Vec<TimelineEntry> = buckets
        .dated()
        .map(|(day, bucket)| TimelineEntry {
            date: day.to_string(),
            count: bucket.len(),
            avg_engagement: day_engagement(bucket),
        })
        .collect();

    let date_range = match (timeline.first(), timeline.last()) {
        (Some(first), Some(last)) => DateRange {
            start: first.date.clone(),
            end: last.date.clone(),
        },
        _ => DateRange::unknown(),
    };

    TrendSnapshot {
        frequency: frequency_stats(&timeline),
        engagement_trends: engagement_trends(items),
        total_dates: timeline.len(),
        date_range,
        timeline,
    }
}

/// Mean of likes + retweets over the bucket's X posts, 1 decimal.
#[allow(clippy::cast_precision_loss)]
fn day_engagement(bucket: &[&DataItem]) -> f64 {
    let per_post: Vec<u64> = bucket
        .iter()
        .filter_map(|item| item.engagement())
        .map(resa_core::Engagement::likes_and_retweets)
        .collect();
    if per_post.is_empty() {
        return 0.0;
    }
    let sum: f64 = per_post.iter().map(|&v| v as f64).sum();
    round_to(sum / per_post.len() as f64, 1)
}

#[allow(clippy::cast_precision_loss)]
fn frequency_stats(timeline: &[TimelineEntry]) -> FrequencyStats {
    let counts: Vec<usize> = timeline.iter().map(|entry| entry.count).collect();
    let (Some(&max_per_day), Some(&min_per_day)) = (counts.iter().max(), counts.iter().min())
    else {
        return FrequencyStats::default();
    };
    let total: usize = counts.iter().sum();
    FrequencyStats {
        total_days: counts.len(),
        avg_per_day: round_to(total as f64 / counts.len() as f64, 1),
        max_per_day,
        min_per_day,
    }
}

/// Per-metric averages over every X post in the run, ignoring dates.
#[allow(clippy::cast_precision_loss)]
fn engagement_trends(items: &[DataItem]) -> EngagementTrends {
    let posts: Vec<&resa_core::Engagement> =
        items.iter().filter_map(DataItem::engagement).collect();
    if posts.is_empty() {
        return EngagementTrends::default();
    }

    let n = posts.len() as f64;
    let likes: u64 = posts.iter().map(|e| e.likes).fold(0, u64::saturating_add);
    let retweets: u64 = posts.iter().map(|e| e.retweets).fold(0, u64::saturating_add);
    let replies: u64 = posts.iter().map(|e| e.replies).fold(0, u64::saturating_add);

    EngagementTrends {
        available: true,
        total_posts: posts.len(),
        avg_likes: round_to(likes as f64 / n, 1),
        avg_retweets: round_to(retweets as f64 / n, 1),
        avg_replies: round_to(replies as f64 / n, 1),
        total_engagement: likes.saturating_add(retweets).saturating_add(replies),
    }
}
