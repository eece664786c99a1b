//! Prompt text sent to the model.

use std::fmt::Write as _;

use resa_core::{AnalysisDepth, DataItem, Keyword, SentimentSnapshot, SourceKind, TrendSnapshot};

/// Items listed in the main analysis prompt.
pub const MAX_ANALYSIS_ITEMS: usize = 50;
/// Items summarised in a follow-up prompt.
pub const MAX_FOLLOWUP_SUMMARY_ITEMS: usize = 20;

const ITEM_PREVIEW_CHARS: usize = 200;
const ANALYSIS_EXCERPT_CHARS: usize = 500;

/// What the session already knows, passed along with follow-up questions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FollowupContext<'a> {
    pub topic: &'a str,
    pub sentiment: Option<&'a SentimentSnapshot>,
    pub keywords: &'a [Keyword],
    pub trends: Option<&'a TrendSnapshot>,
}

pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn item_line(index: usize, item: &DataItem) -> String {
    let text = truncate_chars(item.text().unwrap_or_default(), ITEM_PREVIEW_CHARS);
    match (item.source(), item.engagement()) {
        (SourceKind::X, Some(engagement)) => {
            format!("{index}. [X] {text} (👍 {})", engagement.likes)
        }
        _ => format!("{index}. [Web] {text}"),
    }
}

fn summarize_items(items: &[DataItem], limit: usize) -> String {
    if items.is_empty() {
        return "No data available".to_string();
    }
    items
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, item)| item_line(i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn depth_instructions(depth: AnalysisDepth) -> &'static str {
    match depth {
        AnalysisDepth::Quick => {
            "Write a concise briefing:\n\
             1. An \"## Executive Summary\" of 2-3 sentences\n\
             2. A \"## Key Findings\" list of the 3-5 most important points\n\
             Keep the whole analysis under 300 words."
        }
        AnalysisDepth::Detailed => {
            "Write a thorough analysis with these sections:\n\
             1. \"## Executive Summary\": the overall picture in one paragraph\n\
             2. \"## Key Themes\": the main discussion topics, with examples from the data\n\
             3. \"## Sentiment Overview\": how people feel and why\n\
             4. \"## Notable Voices\": influential posts or publications worth reading\n\
             5. \"## Outlook\": emerging trends and what to watch next\n\
             Cite specific items by number where it helps."
        }
    }
}

/// The main research prompt: the topic, up to [`MAX_ANALYSIS_ITEMS`]
/// numbered items, and depth-specific instructions.
#[must_use]
pub fn analysis_prompt(topic: &str, items: &[DataItem], depth: AnalysisDepth) -> String {
    let shown = items.len().min(MAX_ANALYSIS_ITEMS);
    let mut prompt = format!(
        "You are a research analyst. Analyze the following data collected about \"{topic}\" \
         from X (Twitter) and web news.\n\n**Collected Data** ({shown} of {} items):\n",
        items.len()
    );
    for (i, item) in items.iter().take(MAX_ANALYSIS_ITEMS).enumerate() {
        let _ = writeln!(prompt, "{}", item_line(i + 1, item));
        if !item.author.is_empty() {
            let _ = writeln!(prompt, "   by {}", item.author);
        }
    }
    let _ = write!(
        prompt,
        "\n**Instructions**:\n{}\n\nFormat the answer as Markdown. Start with a level-2 heading.",
        depth_instructions(depth)
    );
    prompt
}

fn summarize_context(context: &FollowupContext<'_>) -> String {
    let mut lines = Vec::new();
    if let Some(sentiment) = context.sentiment {
        lines.push(format!(
            "**Overall Sentiment**: {} ({:+.3})",
            sentiment.overall.as_str(),
            sentiment.average_compound
        ));
    }
    if !context.keywords.is_empty() {
        let top: Vec<&str> = context
            .keywords
            .iter()
            .take(10)
            .map(|k| k.keyword.as_str())
            .collect();
        lines.push(format!("**Key Topics**: {}", top.join(", ")));
    }
    if let Some(trends) = context.trends {
        lines.push(format!(
            "**Activity**: {} items/day average",
            trends.frequency.avg_per_day
        ));
    }
    if lines.is_empty() {
        String::new()
    } else {
        lines.join("\n") + "\n"
    }
}

/// Prompt for a follow-up question about an existing analysis.
#[must_use]
pub fn followup_prompt(
    question: &str,
    items: &[DataItem],
    original_analysis: &str,
    context: &FollowupContext<'_>,
) -> String {
    let topic = if context.topic.is_empty() {
        "Unknown"
    } else {
        context.topic
    };
    format!(
        "You are analyzing research data to answer a follow-up question.\n\n\
         **Original Topic**: {topic}\n\n\
         **Follow-up Question**: {question}\n\n\
         {context_summary}\n\
         **Relevant Data** ({count} items):\n{data}\n\n\
         **Original Analysis Summary**:\n{excerpt}...\n\n\
         **Instructions**:\n\
         1. Answer the question directly and concisely\n\
         2. Use specific examples from the data to support your answer\n\
         3. If the question asks for sentiment, consider both positive and negative aspects\n\
         4. If the question asks about trends, look for patterns in the data\n\
         5. Keep your response focused on the question and do not repeat the full original analysis\n\n\
         Provide a clear, focused answer to: \"{question}\"\n",
        context_summary = summarize_context(context),
        count = items.len(),
        data = summarize_items(items, MAX_FOLLOWUP_SUMMARY_ITEMS),
        excerpt = original_analysis
            .chars()
            .take(ANALYSIS_EXCERPT_CHARS)
            .collect::<String>(),
    )
}
