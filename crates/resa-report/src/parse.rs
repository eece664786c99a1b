//! Best-effort reconstruction of a rendered report.
//!
//! Every field is extracted independently. A missing section or pattern
//! leaves its field absent; parsing itself never fails.

use std::sync::LazyLock;

use regex::Regex;
use resa_core::{
    CategoryShare, ParsedSentiment, PreviousReportSnapshot, ReportMetadata, SourceCounts,
};

use crate::headings::{self, Heading, ENHANCEMENTS, KEYWORD_MARKERS};

static GENERATED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*Generated\*\*:\s*(.+)").expect("valid generated regex"));

static DATA_SOURCES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*Data Sources\*\*:\s*(.+)").expect("valid data sources regex")
});

static MODEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*Analysis Model\*\*:\s*(.+)").expect("valid analysis model regex")
});

static OVERALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*Overall Sentiment\*\*:\s*(\w+)").expect("valid overall sentiment regex")
});

static COMPOUND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"compound score:\s*([-+]?\d+\.\d+)").expect("valid compound score regex")
});

static POSITIVE_RE: LazyLock<Regex> = LazyLock::new(|| category_regex("Positive"));
static NEUTRAL_RE: LazyLock<Regex> = LazyLock::new(|| category_regex("Neutral"));
static NEGATIVE_RE: LazyLock<Regex> = LazyLock::new(|| category_regex("Negative"));

static X_COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"### X \(Twitter\) - (\d+) posts").expect("valid x count regex")
});

static WEB_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"### Web - (\d+) results").expect("valid web count regex"));

fn category_regex(label: &str) -> Regex {
    Regex::new(&format!(r"{label}:[^\n]*?(\d+\.\d+)%[^\n]*?\((\d+) items\)"))
        .expect("valid sentiment category regex")
}

/// Parse a rendered report back into a [`PreviousReportSnapshot`].
#[must_use]
pub fn parse_report(content: &str) -> PreviousReportSnapshot {
    let snapshot = PreviousReportSnapshot {
        metadata: extract_metadata(content),
        sentiment: extract_sentiment(content),
        keywords: extract_keywords(content),
        sources: extract_sources(content),
        analysis: extract_analysis(content),
    };
    tracing::debug!(
        has_sentiment = snapshot.sentiment.is_some(),
        keywords = snapshot.keywords.len(),
        x_count = ?snapshot.sources.x_count,
        web_count = ?snapshot.sources.web_count,
        analysis_chars = snapshot.analysis.len(),
        "parsed report"
    );
    snapshot
}

/// Byte offset where each line starts, paired with the line.
fn lines_with_offsets(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content.split_inclusive('\n').scan(0usize, |offset, line| {
        let start = *offset;
        *offset += line.len();
        Some((start, line.trim_end_matches(['\n', '\r'])))
    })
}

/// Body of the section under `heading`, up to the next line starting with
/// `##` or the end of `content`.
fn section_body<'a>(content: &'a str, heading: Heading) -> Option<&'a str> {
    section_body_until(content, heading, |line| line.starts_with("##"))
}

fn section_body_until<'a>(
    content: &'a str,
    heading: Heading,
    is_end: impl Fn(&str) -> bool,
) -> Option<&'a str> {
    let mut lines = lines_with_offsets(content);
    let body_start = lines
        .by_ref()
        .find(|(_, line)| heading.matches(line))
        .map(|(offset, line)| offset + line.len())?;
    let body_end = lines
        .find(|(_, line)| is_end(*line))
        .map_or(content.len(), |(offset, _)| offset);
    content.get(body_start..body_end)
}

fn capture<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

fn extract_metadata(content: &str) -> ReportMetadata {
    ReportMetadata {
        generated: capture(&GENERATED_RE, content).map(str::to_string),
        data_sources: capture(&DATA_SOURCES_RE, content).map(str::to_string),
        model: capture(&MODEL_RE, content).map(str::to_string),
    }
}

fn extract_sentiment(content: &str) -> Option<ParsedSentiment> {
    let Some(body) = section_body(content, headings::SENTIMENT) else {
        tracing::debug!("no sentiment section in report");
        return None;
    };

    let category = |re: &Regex| -> Option<CategoryShare> {
        let caps = re.captures(body)?;
        Some(CategoryShare {
            percentage: caps.get(1)?.as_str().parse().ok()?,
            count: caps.get(2)?.as_str().parse().ok()?,
        })
    };

    let sentiment = ParsedSentiment {
        overall: capture(&OVERALL_RE, body).map(str::to_string),
        average_compound: capture(&COMPOUND_RE, body).and_then(|v| v.parse().ok()),
        positive: category(&POSITIVE_RE),
        neutral: category(&NEUTRAL_RE),
        negative: category(&NEGATIVE_RE),
    };
    (!sentiment.is_empty()).then_some(sentiment)
}

fn extract_keywords(content: &str) -> Vec<String> {
    let Some(body) = section_body(content, headings::KEYWORDS) else {
        tracing::debug!("no keyword section in report");
        return Vec::new();
    };

    body.lines()
        .filter_map(|line| {
            let line = line.trim();
            let (line, dashed) = match line.strip_prefix("- ") {
                Some(rest) => (rest.trim_start(), true),
                None => (line, false),
            };
            KEYWORD_MARKERS
                .iter()
                .find_map(|marker| line.strip_prefix(marker))
                .or(dashed.then_some(line))
                .map(str::trim)
        })
        .filter(|kw| !kw.is_empty())
        .map(str::to_string)
        .collect()
}

/// The sources section ends at the next level-2 heading or a divider, so
/// its `###` subsections stay inside it.
fn extract_sources(content: &str) -> SourceCounts {
    let Some(body) = section_body_until(content, headings::DATA_SOURCES, |line| {
        line.starts_with("## ") || line.trim() == "---"
    }) else {
        return SourceCounts::default();
    };

    let count = |re: &Regex| capture(re, body).and_then(|v| v.parse().ok());
    SourceCounts {
        x_count: count(&X_COUNT_RE),
        web_count: count(&WEB_COUNT_RE),
    }
}

/// Narrative text between the header divider and the sources heading, with
/// every generated section removed.
fn extract_analysis(content: &str) -> String {
    let mut region: Option<(usize, usize)> = None;
    let mut start = None;
    for (offset, line) in lines_with_offsets(content) {
        if start.is_none() && line.trim() == "---" {
            start = Some(offset + line.len());
        } else if let Some(begin) = start {
            if headings::DATA_SOURCES.matches(line) {
                region = Some((begin, offset));
                break;
            }
        }
    }
    let Some(text) = region.and_then(|(begin, end)| content.get(begin..end)) else {
        return String::new();
    };

    let mut kept: Vec<&str> = Vec::new();
    let mut skipping = false;
    for line in text.lines() {
        if line.starts_with("## ") {
            skipping = ENHANCEMENTS.iter().any(|heading| heading.matches(line));
        }
        if !skipping {
            kept.push(line);
        }
    }

    let narrative = kept.join("\n");
    let narrative = narrative.trim();
    narrative
        .strip_suffix("---")
        .map_or(narrative, str::trim_end)
        .to_string()
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
