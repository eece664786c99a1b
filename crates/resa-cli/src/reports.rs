//! Read-only commands over previously generated reports.

use std::path::Path;

use anyhow::Context as _;
use resa_analysis::{compare, CurrentAnalysis};
use resa_core::{ComparisonResult, PreviousReportSnapshot};
use resa_report::load_previous_report;

fn load(path: &Path) -> anyhow::Result<PreviousReportSnapshot> {
    load_previous_report(path).with_context(|| format!("failed to load report {}", path.display()))
}

/// Compare two reports, treating `current` as the newer run.
pub(crate) fn compare_reports(current: &Path, previous: &Path) -> anyhow::Result<ComparisonResult> {
    let current = load(current)?;
    let previous = load(previous)?;
    Ok(compare(&CurrentAnalysis::from_report(&current), &previous))
}

/// Print everything recoverable from a report as JSON.
///
/// # Errors
///
/// Returns an error if the report cannot be read.
pub(crate) fn run_parse(path: &Path) -> anyhow::Result<()> {
    let snapshot = load(path)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Print the comparison of two reports as JSON.
///
/// # Errors
///
/// Returns an error if either report cannot be read.
pub(crate) fn run_compare(current: &Path, previous: &Path) -> anyhow::Result<()> {
    let result = compare_reports(current, previous)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use resa_core::{DataItem, Keyword, SentimentLabel, SentimentSnapshot, ShiftDirection};
    use resa_report::{render_report, write_report, ReportInput};

    fn write(
        dir: &Path,
        name: &str,
        overall: SentimentLabel,
        keywords: &[&str],
    ) -> std::path::PathBuf {
        let sentiment = SentimentSnapshot {
            overall,
            average_compound: match overall {
                SentimentLabel::Positive => 0.4,
                SentimentLabel::Negative => -0.4,
                _ => 0.0,
            },
            total_analyzed: 1,
            ..SentimentSnapshot::empty()
        };
        let keywords: Vec<Keyword> = keywords.iter().map(|kw| Keyword::new(*kw, 0.1)).collect();
        let items = vec![DataItem::web_result(
            "Headline",
            "",
            "Site",
            Some("2024-03-01".to_string()),
            "https://a.example",
        )];
        let markdown = render_report(&ReportInput {
            topic: "Uniswap",
            generated: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            model: "claude-test",
            tokens_used: None,
            analysis: "## Executive Summary\n\nSomething happened.",
            items: &items,
            sentiment: Some(&sentiment),
            keywords: &keywords,
            trends: None,
            comparison: None,
        });
        let path = dir.join(name);
        write_report(&path, &markdown, None).unwrap();
        path
    }

    #[test]
    fn compares_two_markdown_reports() {
        let dir = tempfile::tempdir().unwrap();
        let previous = write(
            dir.path(),
            "old.md",
            SentimentLabel::Negative,
            &["fees", "governance"],
        );
        let current = write(
            dir.path(),
            "new.md",
            SentimentLabel::Positive,
            &["governance", "hooks"],
        );

        let result = compare_reports(&current, &previous).unwrap();
        let change = result.sentiment_change.expect("both reports carry sentiment");
        assert_eq!(change.old, "Negative");
        assert_eq!(change.new, "Positive");
        assert_eq!(change.direction, ShiftDirection::Improved);
        assert_eq!(result.new_topics, vec!["hooks"]);
        assert_eq!(result.removed_topics, vec!["fees"]);
    }

    #[test]
    fn missing_report_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.md");
        let err = compare_reports(&missing, &missing).unwrap_err();
        assert!(err.to_string().contains("missing.md"));
    }
}
