//! Markdown report rendering.

use chrono::NaiveDateTime;
use resa_core::{
    CategoryShare, ComparisonResult, DataItem, Keyword, SentimentSnapshot, SourceKind,
    TrendSnapshot,
};

use crate::headings::{self, KEYWORD_MARKERS};

/// Characters of an X post shown in the sources list before truncation.
const POST_PREVIEW_CHARS: usize = 200;
/// Keywords listed in the keyword section.
const KEYWORDS_SHOWN: usize = 15;
/// Topics listed per side in the changes section.
const TOPICS_SHOWN: usize = 5;
/// Most recent timeline days listed in the trends section.
const TIMELINE_DAYS_SHOWN: usize = 7;

const FOOTER: &str = "*This report was generated by resa, a research automation tool*";

/// Everything that goes into one rendered report.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub topic: &'a str,
    pub generated: NaiveDateTime,
    pub model: &'a str,
    pub tokens_used: Option<u64>,
    /// Narrative analysis written by the language model.
    pub analysis: &'a str,
    pub items: &'a [DataItem],
    pub sentiment: Option<&'a SentimentSnapshot>,
    pub keywords: &'a [Keyword],
    pub trends: Option<&'a TrendSnapshot>,
    pub comparison: Option<&'a ComparisonResult>,
}

/// Render the full Markdown report.
#[must_use]
pub fn render_report(input: &ReportInput<'_>) -> String {
    let x_posts: Vec<&DataItem> = by_source(input.items, SourceKind::X);
    let web_results: Vec<&DataItem> = by_source(input.items, SourceKind::Web);

    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("# {} - Research Report", input.topic));
    lines.push(String::new());
    lines.push(format!(
        "**Generated**: {}  ",
        input.generated.format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(format!(
        "**Data Sources**: X ({}), Web ({}) - Total: {}  ",
        x_posts.len(),
        web_results.len(),
        x_posts.len() + web_results.len()
    ));
    lines.push(format!("**Analysis Model**: {}  ", input.model));
    lines.push(format!(
        "**Tokens Used**: {}  ",
        input
            .tokens_used
            .map_or_else(|| "N/A".to_string(), |t| t.to_string())
    ));
    lines.push(String::new());
    lines.push("---".to_string());

    if input.sentiment.is_some() || !input.keywords.is_empty() || input.trends.is_some() {
        quick_stats(&mut lines, input);
    }
    if let Some(comparison) = input.comparison {
        changes_section(&mut lines, comparison);
    }
    if let Some(sentiment) = input.sentiment {
        sentiment_section(&mut lines, sentiment);
    }
    if !input.keywords.is_empty() {
        keywords_section(&mut lines, input.keywords);
    }
    if let Some(trends) = input.trends {
        trends_section(&mut lines, trends);
    }

    let analysis = input.analysis.trim();
    if !analysis.is_empty() {
        lines.push(String::new());
        lines.push(analysis.to_string());
        lines.push(String::new());
        lines.push("---".to_string());
    }

    lines.push(String::new());
    lines.push(headings::DATA_SOURCES.markdown());
    if !x_posts.is_empty() {
        lines.push(String::new());
        lines.push(format!("### X (Twitter) - {} posts", x_posts.len()));
        lines.push(String::new());
        for (i, item) in x_posts.iter().enumerate() {
            x_post_entry(&mut lines, i + 1, item);
        }
    }
    if !web_results.is_empty() {
        lines.push(String::new());
        lines.push(format!("### Web - {} results", web_results.len()));
        lines.push(String::new());
        for (i, item) in web_results.iter().enumerate() {
            web_result_entry(&mut lines, i + 1, item);
        }
    }

    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());
    lines.push(FOOTER.to_string());
    lines.push(String::new());
    lines.join("\n")
}

/// File name for a report on `topic` generated at `now`.
///
/// Keeps alphanumerics, spaces, `-` and `_`; spaces become `-`; at most 50
/// characters of topic.
#[must_use]
pub fn report_filename(topic: &str, now: NaiveDateTime) -> String {
    let safe: String = topic
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let safe: String = safe.trim().replace(' ', "-").chars().take(50).collect();
    format!("research_{safe}_{}.md", now.format("%Y%m%d_%H%M%S"))
}

fn by_source(items: &[DataItem], kind: SourceKind) -> Vec<&DataItem> {
    items.iter().filter(|item| item.source() == kind).collect()
}

fn quick_stats(lines: &mut Vec<String>, input: &ReportInput<'_>) {
    let mut stats = Vec::new();
    if let Some(sentiment) = input.sentiment {
        stats.push(format!(
            "**Overall Sentiment**: {} ({:+.3})",
            sentiment.overall, sentiment.average_compound
        ));
    }
    if let Some(top) = input.keywords.first() {
        stats.push(format!("**Top Keyword**: {}", top.keyword));
    }
    if let Some(trends) = input.trends {
        stats.push(format!(
            "**Avg Activity**: {:.1} items/day",
            trends.frequency.avg_per_day
        ));
    }

    lines.push(String::new());
    lines.push(headings::QUICK_STATS.markdown());
    lines.push(String::new());
    lines.push(stats.join(" | "));
}

fn changes_section(lines: &mut Vec<String>, comparison: &ComparisonResult) {
    lines.push(String::new());
    lines.push(headings::CHANGES.markdown());
    lines.push(String::new());

    if !comparison.new_topics.is_empty() {
        lines.push("**New Topics**:".to_string());
        for topic in comparison.new_topics.iter().take(TOPICS_SHOWN) {
            lines.push(format!("- ✨ {topic}"));
        }
        lines.push(String::new());
    }
    if !comparison.removed_topics.is_empty() {
        lines.push("**Declining Topics**:".to_string());
        for topic in comparison.removed_topics.iter().take(TOPICS_SHOWN) {
            lines.push(format!("- 📉 {topic}"));
        }
        lines.push(String::new());
    }
    if let Some(change) = &comparison.sentiment_change {
        lines.push(format!(
            "**Sentiment Shift**: {} {} {} ({:+.3})",
            change.old,
            change.direction.marker(),
            change.new,
            change.compound_change
        ));
        lines.push(String::new());
    }
    if !comparison.trend_direction.is_empty() {
        lines.push(format!("**Overall Trend**: {}", comparison.trend_direction));
    }
}

fn sentiment_section(lines: &mut Vec<String>, sentiment: &SentimentSnapshot) {
    lines.push(String::new());
    lines.push(headings::SENTIMENT.markdown());
    lines.push(String::new());
    lines.push(format!(
        "**Overall Sentiment**: {} (compound score: {:+.3})",
        sentiment.overall, sentiment.average_compound
    ));
    lines.push(String::new());
    lines.push("**Distribution**:".to_string());
    lines.push(String::new());

    let dist = &sentiment.distribution;
    for (label, share) in [
        ("Positive:", dist.positive),
        ("Neutral: ", dist.neutral),
        ("Negative:", dist.negative),
    ] {
        lines.push(format!(
            "- {label} {} {:.1}% ({} items)",
            bars(share),
            share.percentage,
            share.count
        ));
    }
    lines.push(String::new());
    lines.push(format!("*Analyzed {} items*", sentiment.total_analyzed));
}

/// One block per 2 percentage points.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bars(share: CategoryShare) -> String {
    let blocks = (share.percentage / 2.0).floor().max(0.0) as usize;
    "█".repeat(blocks)
}

fn keywords_section(lines: &mut Vec<String>, keywords: &[Keyword]) {
    lines.push(String::new());
    lines.push(headings::KEYWORDS.markdown());
    lines.push(String::new());
    lines.push("**Most Important Topics**:".to_string());
    lines.push(String::new());
    for (i, keyword) in keywords.iter().take(KEYWORDS_SHOWN).enumerate() {
        let marker = KEYWORD_MARKERS[(i / 5).min(KEYWORD_MARKERS.len() - 1)];
        lines.push(format!("{marker} {}", keyword.keyword));
    }
    lines.push(String::new());
    lines.push(format!("*Extracted {} total keywords*", keywords.len()));
}

fn trends_section(lines: &mut Vec<String>, trends: &TrendSnapshot) {
    lines.push(String::new());
    lines.push(headings::TRENDS.markdown());
    lines.push(String::new());
    lines.push(format!(
        "**Date Range**: {} to {}",
        trends.date_range.start, trends.date_range.end
    ));
    lines.push(String::new());

    let freq = &trends.frequency;
    lines.push("**Activity Frequency**:".to_string());
    lines.push(format!("- Average: {:.1} items/day", freq.avg_per_day));
    lines.push(format!("- Peak: {} items/day", freq.max_per_day));
    lines.push(format!("- Coverage: {} days", freq.total_days));
    lines.push(String::new());

    let engagement = &trends.engagement_trends;
    if engagement.available {
        lines.push("**Engagement Trends** (X/Twitter):".to_string());
        lines.push(format!("- Average Likes: {:.1}", engagement.avg_likes));
        lines.push(format!("- Average Retweets: {:.1}", engagement.avg_retweets));
        lines.push(format!("- Average Replies: {:.1}", engagement.avg_replies));
        lines.push(format!(
            "- Total Engagement: {}",
            thousands(engagement.total_engagement)
        ));
        lines.push(String::new());
    }

    if !trends.timeline.is_empty() {
        lines.push("**Recent Activity**:".to_string());
        let skip = trends.timeline.len().saturating_sub(TIMELINE_DAYS_SHOWN);
        for entry in &trends.timeline[skip..] {
            lines.push(format!("- {}: {} items", entry.date, entry.count));
        }
    }
}

fn x_post_entry(lines: &mut Vec<String>, n: usize, item: &DataItem) {
    let likes = item.engagement().map_or(0, |e| e.likes);
    let likes = if likes == 0 {
        "N/A".to_string()
    } else {
        likes.to_string()
    };
    lines.push(format!(
        "{n}. **@{}** - {}  ",
        item.author,
        item.date.as_deref().unwrap_or_default()
    ));
    lines.push(format!("   {}  ", preview(&item.content)));
    lines.push(format!("   👍 {likes} likes | [View Tweet]({})  ", item.url));
    lines.push(String::new());
}

fn web_result_entry(lines: &mut Vec<String>, n: usize, item: &DataItem) {
    let title = Some(item.title()).filter(|t| !t.is_empty()).unwrap_or("Untitled");
    let source = Some(item.author.as_str())
        .filter(|a| !a.is_empty())
        .unwrap_or("Unknown");
    lines.push(format!("{n}. **{title}**  "));
    lines.push(format!(
        "   Source: {source} | Date: {}  ",
        item.date.as_deref().unwrap_or_default()
    ));
    lines.push(format!("   [Read Article]({})  ", item.url));
    lines.push(String::new());
}

/// Single-line preview of a post body.
fn preview(content: &str) -> String {
    let flat = content.replace('\n', " ");
    if flat.chars().count() > POST_PREVIEW_CHARS {
        let head: String = flat.chars().take(POST_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        flat
    }
}

/// `1234567` → `1,234,567`.
fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
