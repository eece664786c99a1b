//! Aggregation of per-item polarity into a [`SentimentSnapshot`].

use resa_core::{
    CategoryShare, DataItem, SentimentDistribution, SentimentLabel, SentimentSnapshot,
};

use crate::rounding::round_to;
use crate::scorer::PolarityScorer;

/// Score every item with `scorer` and summarize the run.
///
/// Items without any text are skipped and do not count toward
/// `total_analyzed`. The same thresholds classify each item and the mean.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn analyze_sentiment<S: PolarityScorer + ?Sized>(
    scorer: &S,
    items: &[DataItem],
) -> SentimentSnapshot {
    let compounds: Vec<f64> = items
        .iter()
        .filter_map(DataItem::text)
        .map(|text| scorer.polarity(text).compound)
        .collect();

    if compounds.is_empty() {
        tracing::debug!(items = items.len(), "no text to score");
        return SentimentSnapshot::empty();
    }

    let (mut positive, mut neutral, mut negative) = (0usize, 0usize, 0usize);
    for &compound in &compounds {
        match SentimentLabel::from_compound(compound) {
            SentimentLabel::Positive => positive += 1,
            SentimentLabel::Negative => negative += 1,
            _ => neutral += 1,
        }
    }

    let total = compounds.len();
    let mean = compounds.iter().sum::<f64>() / total as f64;
    let share = |count: usize| CategoryShare {
        count,
        percentage: round_to(count as f64 / total as f64 * 100.0, 1),
    };

    let snapshot = SentimentSnapshot {
        overall: SentimentLabel::from_compound(mean),
        average_compound: round_to(mean, 3),
        distribution: SentimentDistribution {
            positive: share(positive),
            neutral: share(neutral),
            negative: share(negative),
        },
        total_analyzed: total,
    };
    tracing::info!(
        analyzed = total,
        overall = %snapshot.overall,
        compound = snapshot.average_compound,
        "sentiment analysis complete"
    );
    snapshot
}
