//! Diffing the current run against a previously generated report.

use std::collections::HashSet;

use resa_core::{
    ComparisonResult, PreviousReportSnapshot, SentimentChange, SentimentLabel, SentimentSnapshot,
    ShiftDirection,
};

use crate::rounding::round_to;

/// Topics listed per side of the keyword diff.
const DISPLAY_LIMIT: usize = 10;

/// Churn ratio above which one side of the keyword diff dominates.
const CHURN_RATIO: f64 = 1.5;

/// Overall label and mean compound of one side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentSide {
    pub overall: String,
    pub average_compound: f64,
}

/// The current run's side of a comparison.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentAnalysis {
    pub sentiment: Option<SentimentSide>,
    /// Keyword strings in rank order.
    pub keywords: Vec<String>,
}

impl CurrentAnalysis {
    /// Build from a live run. Keywords may be plain strings or scored
    /// [`resa_core::Keyword`]s; only the text is kept.
    #[must_use]
    pub fn new<K: AsRef<str>>(sentiment: Option<&SentimentSnapshot>, keywords: &[K]) -> Self {
        Self {
            sentiment: sentiment.map(|s| SentimentSide {
                overall: s.overall.as_str().to_string(),
                average_compound: s.average_compound,
            }),
            keywords: keywords.iter().map(|k| k.as_ref().to_string()).collect(),
        }
    }

    /// Treat an already rendered report as the current side.
    #[must_use]
    pub fn from_report(report: &PreviousReportSnapshot) -> Self {
        Self {
            sentiment: previous_side(report),
            keywords: report.keywords.clone(),
        }
    }
}

/// The previous report's sentiment block, absent when the report had none.
fn previous_side(report: &PreviousReportSnapshot) -> Option<SentimentSide> {
    let parsed = report.sentiment.as_ref().filter(|s| !s.is_empty())?;
    Some(SentimentSide {
        overall: parsed
            .overall
            .clone()
            .unwrap_or_else(|| SentimentLabel::Unknown.as_str().to_string()),
        average_compound: parsed.average_compound.unwrap_or(0.0),
    })
}

/// Compare the current run with a previous report.
#[must_use]
pub fn compare(current: &CurrentAnalysis, previous: &PreviousReportSnapshot) -> ComparisonResult {
    let sentiment_change = match (&current.sentiment, previous_side(previous)) {
        (Some(new), Some(old)) => Some(sentiment_change(new, &old)),
        _ => None,
    };
    let keyword_diff = compare_keywords(&current.keywords, &previous.keywords);
    let trend_direction = trend_direction(sentiment_change.as_ref(), keyword_diff.as_ref());

    let diff = keyword_diff.unwrap_or_default();
    let result = ComparisonResult {
        sentiment_change,
        new_topics: diff.new_topics,
        removed_topics: diff.removed_topics,
        total_new: diff.total_new,
        total_removed: diff.total_removed,
        trend_direction,
    };
    tracing::info!(
        new_topics = result.total_new,
        removed_topics = result.total_removed,
        trend = %result.trend_direction,
        "comparison with previous report complete"
    );
    result
}

fn sentiment_change(new: &SentimentSide, old: &SentimentSide) -> SentimentChange {
    let direction = if new.overall == old.overall {
        ShiftDirection::Stable
    } else if new.overall == "Positive" && old.overall != "Positive" {
        ShiftDirection::Improved
    } else if new.overall == "Negative" && old.overall != "Negative" {
        ShiftDirection::Declined
    } else {
        ShiftDirection::Mixed
    };

    SentimentChange {
        old: old.overall.clone(),
        new: new.overall.clone(),
        direction,
        compound_change: round_to(new.average_compound - old.average_compound, 3),
    }
}

#[derive(Debug, Default)]
struct KeywordDiff {
    new_topics: Vec<String>,
    removed_topics: Vec<String>,
    total_new: usize,
    total_removed: usize,
}

/// Case-insensitive de-duplication keeping the first-seen casing.
fn dedup_case_insensitive(keywords: &[String]) -> Vec<(String, &str)> {
    let mut seen = HashSet::new();
    keywords
        .iter()
        .filter_map(|kw| {
            let lowered = kw.to_lowercase();
            seen.insert(lowered.clone()).then_some((lowered, kw.as_str()))
        })
        .collect()
}

/// `None` when there are no current keywords to compare.
///
/// Without previous keywords the current ones are listed as new but not
/// counted, so the churn label stays balanced.
fn compare_keywords(current: &[String], previous: &[String]) -> Option<KeywordDiff> {
    if current.is_empty() {
        return None;
    }
    let current = dedup_case_insensitive(current);
    if previous.is_empty() {
        return Some(KeywordDiff {
            new_topics: current
                .into_iter()
                .take(DISPLAY_LIMIT)
                .map(|(_, display)| display.to_string())
                .collect(),
            ..KeywordDiff::default()
        });
    }
    let previous = dedup_case_insensitive(previous);

    let current_keys: HashSet<&str> = current.iter().map(|(key, _)| key.as_str()).collect();
    let previous_keys: HashSet<&str> = previous.iter().map(|(key, _)| key.as_str()).collect();

    let added: Vec<&str> = current
        .iter()
        .filter(|(key, _)| !previous_keys.contains(key.as_str()))
        .map(|(_, display)| *display)
        .collect();
    let removed: Vec<&str> = previous
        .iter()
        .filter(|(key, _)| !current_keys.contains(key.as_str()))
        .map(|(_, display)| *display)
        .collect();

    Some(KeywordDiff {
        new_topics: added.iter().take(DISPLAY_LIMIT).map(|s| (*s).to_string()).collect(),
        removed_topics: removed
            .iter()
            .take(DISPLAY_LIMIT)
            .map(|s| (*s).to_string())
            .collect(),
        total_new: added.len(),
        total_removed: removed.len(),
    })
}

#[allow(clippy::cast_precision_loss)]
fn trend_direction(sentiment: Option<&SentimentChange>, keywords: Option<&KeywordDiff>) -> String {
    if sentiment.is_none() && keywords.is_none() {
        return String::new();
    }

    let mut phrases: Vec<&str> = Vec::new();
    if let Some(change) = sentiment {
        match change.direction {
            ShiftDirection::Improved => phrases.push("Sentiment improving"),
            ShiftDirection::Declined => phrases.push("Sentiment declining"),
            ShiftDirection::Stable => phrases.push("Sentiment stable"),
            ShiftDirection::Mixed => {}
        }
    }
    if let Some(diff) = keywords {
        let (added, removed) = (diff.total_new as f64, diff.total_removed as f64);
        phrases.push(if added > removed * CHURN_RATIO {
            "Many new topics emerging"
        } else if removed > added * CHURN_RATIO {
            "Focus narrowing"
        } else {
            "Topic evolution balanced"
        });
    }

    if phrases.is_empty() {
        "Stable".to_string()
    } else {
        phrases.join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resa_core::{Keyword, ParsedSentiment};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    fn previous(
        overall: Option<&str>,
        compound: Option<f64>,
        keywords: &[&str],
    ) -> PreviousReportSnapshot {
        PreviousReportSnapshot {
            sentiment: Some(ParsedSentiment {
                overall: overall.map(str::to_string),
                average_compound: compound,
                ..ParsedSentiment::default()
            }),
            keywords: strings(keywords),
            ..PreviousReportSnapshot::default()
        }
    }

    fn current(overall: &str, compound: f64, keywords: &[&str]) -> CurrentAnalysis {
        CurrentAnalysis {
            sentiment: Some(SentimentSide {
                overall: overall.to_string(),
                average_compound: compound,
            }),
            keywords: strings(keywords),
        }
    }

    #[test]
    fn keyword_diff_is_case_insensitive() {
        let cur = CurrentAnalysis::new(None, &["Uniswap", "DeFi"]);
        let prev = previous(None, None, &["defi", "Ethereum"]);
        let result = compare(&cur, &prev);
        assert_eq!(result.new_topics, vec!["Uniswap".to_string()]);
        assert_eq!(result.removed_topics, vec!["Ethereum".to_string()]);
        assert_eq!(result.total_new, 1);
        assert_eq!(result.total_removed, 1);
        assert!(result.sentiment_change.is_none());
        assert_eq!(result.trend_direction, "Topic evolution balanced");
    }

    #[test]
    fn positive_after_negative_is_improved() {
        let result = compare(
            &current("Positive", 0.4, &[]),
            &previous(Some("Negative"), Some(-0.2), &[]),
        );
        let change = result.sentiment_change.unwrap();
        assert_eq!(change.direction, ShiftDirection::Improved);
        assert_eq!(change.old, "Negative");
        assert_eq!(change.new, "Positive");
        assert_eq!(change.compound_change, 0.6);
        assert_eq!(result.trend_direction, "Sentiment improving");
    }

    #[test]
    fn direction_rules_apply_in_order() {
        let cases = [
            ("Neutral", "Neutral", ShiftDirection::Stable),
            ("Negative", "Positive", ShiftDirection::Declined),
            ("Negative", "Neutral", ShiftDirection::Declined),
            ("Neutral", "Positive", ShiftDirection::Mixed),
            ("Unknown", "Negative", ShiftDirection::Mixed),
        ];
        for (new, old, expected) in cases {
            let result = compare(&current(new, 0.0, &[]), &previous(Some(old), Some(0.0), &[]));
            assert_eq!(
                result.sentiment_change.map(|c| c.direction),
                Some(expected),
                "{old} -> {new}"
            );
        }
    }

    #[test]
    fn mixed_sentiment_alone_defaults_to_stable_label() {
        let result = compare(
            &current("Neutral", 0.0, &[]),
            &previous(Some("Positive"), Some(0.3), &[]),
        );
        assert_eq!(result.trend_direction, "Stable");
        assert_eq!(result.sentiment_change.unwrap().compound_change, -0.3);
    }

    #[test]
    fn missing_previous_fields_default() {
        let result = compare(
            &current("Positive", 0.25, &[]),
            &previous(None, Some(0.1), &[]),
        );
        let change = result.sentiment_change.unwrap();
        assert_eq!(change.old, "Unknown");
        assert_eq!(change.direction, ShiftDirection::Improved);

        let result = compare(
            &current("Positive", 0.25, &[]),
            &previous(Some("Positive"), None, &[]),
        );
        assert_eq!(result.sentiment_change.unwrap().compound_change, 0.25);
    }

    #[test]
    fn empty_previous_sentiment_block_skips_sentiment_comparison() {
        let prev = PreviousReportSnapshot {
            sentiment: Some(ParsedSentiment::default()),
            ..PreviousReportSnapshot::default()
        };
        let result = compare(&current("Positive", 0.5, &[]), &prev);
        assert!(result.sentiment_change.is_none());
        assert_eq!(result.trend_direction, "");
    }

    #[test]
    fn empty_previous_keywords_list_current_without_counting_them() {
        let many: Vec<String> = (0..12).map(|i| format!("topic{i}")).collect();
        let cur = CurrentAnalysis::new(None, many.as_slice());
        let result = compare(&cur, &PreviousReportSnapshot::default());
        assert_eq!(result.new_topics, many[..10].to_vec());
        assert!(result.removed_topics.is_empty());
        assert_eq!(result.total_new, 0);
        assert_eq!(result.total_removed, 0);
        assert_eq!(result.trend_direction, "Topic evolution balanced");
    }

    #[test]
    fn caps_display_lists_but_keeps_true_totals() {
        let cur: Vec<String> = (0..15).map(|i| format!("new{i}")).collect();
        let prev: Vec<String> = (0..3).map(|i| format!("old{i}")).collect();
        let prev_refs: Vec<&str> = prev.iter().map(String::as_str).collect();
        let result = compare(
            &CurrentAnalysis::new(None, cur.as_slice()),
            &previous(None, None, &prev_refs),
        );
        assert_eq!(result.new_topics.len(), 10);
        assert_eq!(result.total_new, 15);
        assert_eq!(result.total_removed, 3);
    }

    #[test]
    fn narrowing_focus_is_detected() {
        let result = compare(
            &current("Neutral", 0.0, &["solana"]),
            &previous(Some("Neutral"), Some(0.0), &["solana", "a1", "a2", "a3"]),
        );
        assert_eq!(result.trend_direction, "Sentiment stable | Focus narrowing");
    }

    #[test]
    fn no_current_data_gives_empty_label() {
        let result = compare(
            &CurrentAnalysis::default(),
            &previous(Some("Positive"), Some(0.1), &["x"]),
        );
        assert_eq!(result, ComparisonResult::default());
    }

    #[test]
    fn duplicate_casings_collapse_to_first_seen() {
        let result = compare(
            &CurrentAnalysis::new(None, &["DeFi", "defi", "DEFI", "Layer2"]),
            &previous(None, None, &["ethereum"]),
        );
        assert_eq!(result.new_topics, strings(&["DeFi", "Layer2"]));
        assert_eq!(result.total_new, 2);
    }

    #[test]
    fn scored_keywords_and_snapshots_are_accepted() {
        let snapshot = SentimentSnapshot {
            overall: SentimentLabel::Negative,
            average_compound: -0.2,
            ..SentimentSnapshot::empty()
        };
        let keywords = vec![Keyword::new("Bridge exploit", 0.1)];
        let cur = CurrentAnalysis::new(Some(&snapshot), keywords.as_slice());
        assert_eq!(cur.keywords, strings(&["Bridge exploit"]));
        let result = compare(&cur, &previous(Some("Neutral"), Some(0.0), &[]));
        assert_eq!(
            result.sentiment_change.map(|c| c.direction),
            Some(ShiftDirection::Declined)
        );
    }

    #[test]
    fn report_can_stand_in_for_current_side() {
        let report = previous(Some("Positive"), Some(0.3), &["Uniswap"]);
        let cur = CurrentAnalysis::from_report(&report);
        let result = compare(&cur, &report);
        assert_eq!(
            result.sentiment_change.map(|c| c.direction),
            Some(ShiftDirection::Stable)
        );
        assert_eq!(result.total_new, 0);
        assert_eq!(result.trend_direction, "Sentiment stable | Topic evolution balanced");
    }
}
