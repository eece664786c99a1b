//! The `run` command: collect items for a topic, analyze them and write the
//! report.
//!
//! Collection failures are reported source by source and only abort the run
//! when nothing was collected, or when `--strict` was given and some source
//! came back empty-handed. A failed comparison never aborts the run.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::NaiveDateTime;
use resa_analysis::{
    analyze_sentiment, analyze_temporal_trends, compare, extract_item_keywords, CurrentAnalysis,
    FrequencyKeywordExtractor, LexiconScorer,
};
use resa_core::{
    AppConfig, ComparisonResult, DataItem, Keyword, KeywordList, SentimentSnapshot, SourceCounts,
    SourceKind, TrendSnapshot,
};
use resa_llm::{analyze, LlmClient, TextGenerator};
use resa_report::{
    load_previous_report, render_report, report_filename, write_report, ReportInput,
    ReportSidecar, SIDECAR_VERSION,
};
use resa_sources::{
    categorize, collect_all, collection_failure_message, log_error_to_file,
    partial_success_message, suggest_fixes, SourceError, WebCollector, XCollector,
};

use crate::args::{check_max_items, RunArgs};
use crate::interactive::{self, InteractiveSession, SessionData};

/// Suggestions printed per failed source.
const MAX_SUGGESTIONS: usize = 3;

/// Sentiment, keywords and trends computed locally before the model runs.
struct EnhancedAnalysis {
    /// `Unknown` with nothing analyzed when no item carries text.
    sentiment: SentimentSnapshot,
    keywords: KeywordList,
    trends: TrendSnapshot,
}

/// Run the full research pipeline for one topic.
///
/// # Errors
///
/// Returns an error if the model is not configured, no items could be
/// collected, collection was partial under `--strict`, the analysis call
/// fails, or the report cannot be written.
pub(crate) async fn run_research(config: &AppConfig, args: RunArgs) -> anyhow::Result<()> {
    let max_items = match args.max_items {
        Some(n) => n,
        None => check_max_items(config.default_max_items)
            .map_err(|e| anyhow::anyhow!("RESA_DEFAULT_MAX_ITEMS: {e}"))?,
    };
    // Fail on a missing API key before spending time on collection.
    let generator = LlmClient::from_config(config, args.model)?;

    println!("🔍 Researching: {}", args.topic);
    println!("📊 Sources: {}", args.sources.labels());
    println!("📈 Max items per source: {max_items}");
    println!("🧠 Analysis depth: {}", args.depth);
    println!("🤖 Model: {}", generator.model_name());
    println!();

    let items = match &args.items_file {
        Some(path) => load_items(path)?,
        None => collect_items(config, &args, max_items).await?,
    };

    let enhanced = enhance(&items);

    println!("\n🧠 Analyzing with {}...", generator.model_name());
    let outcome = analyze(&generator, &args.topic, &items, args.depth)
        .await
        .context("analysis failed")?;
    match outcome.metadata.tokens_used {
        Some(tokens) => println!("✓ Analysis complete ({tokens} tokens)"),
        None => println!("✓ Analysis complete"),
    }

    let comparison = args.compare_with.as_deref().and_then(|previous| {
        compare_with_previous(previous, &enhanced.sentiment, &enhanced.keywords)
    });

    let generated = chrono::Local::now().naive_local();
    let path = report_path(
        &config.output_dir,
        args.output.as_deref(),
        &args.topic,
        generated,
    );
    let markdown = render_report(&ReportInput {
        topic: &args.topic,
        generated,
        model: generator.model_name(),
        tokens_used: outcome.metadata.tokens_used,
        analysis: &outcome.text,
        items: &items,
        sentiment: Some(&enhanced.sentiment),
        keywords: &enhanced.keywords,
        trends: Some(&enhanced.trends),
        comparison: comparison.as_ref(),
    });
    let sidecar = build_sidecar(&args.topic, generated, generator.model_name(), &items, &enhanced);
    let sidecar_path = write_report(&path, &markdown, Some(&sidecar))
        .with_context(|| format!("failed to write report {}", path.display()))?;

    println!("\n✅ Report saved to: {}", path.display());
    if let Some(sidecar_path) = sidecar_path {
        println!("   Snapshot: {}", sidecar_path.display());
    }

    if args.interactive {
        let session = InteractiveSession::new(
            &generator,
            SessionData {
                topic: &args.topic,
                items: &items,
                analysis: &outcome.text,
                sentiment: Some(&enhanced.sentiment),
                keywords: &enhanced.keywords,
                trends: Some(&enhanced.trends),
            },
        );
        interactive::run_session(session, &config.output_dir).await?;
    }

    Ok(())
}

/// Read items previously saved as a JSON array.
fn load_items(path: &Path) -> anyhow::Result<Vec<DataItem>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read items file {}", path.display()))?;
    let items: Vec<DataItem> = serde_json::from_str(&raw)
        .with_context(|| format!("items file {} is not a JSON array of items", path.display()))?;
    if items.is_empty() {
        anyhow::bail!("items file {} contains no items", path.display());
    }
    println!("📂 Loaded {} items from {}", items.len(), path.display());
    Ok(items)
}

async fn collect_items(
    config: &AppConfig,
    args: &RunArgs,
    max_items: usize,
) -> anyhow::Result<Vec<DataItem>> {
    let x = XCollector::from_config(config);
    let web = WebCollector::from_config(config).context("failed to build web collector")?;

    println!("📥 Collecting data...");
    let outcome = collect_all(&x, &web, args.sources.kinds(), &args.topic, max_items).await;

    for kind in &outcome.succeeded {
        println!("✓ {}: {} items", kind.label(), outcome.count(*kind));
    }
    for kind in &outcome.empty {
        println!("⚠️  {}: no items found", kind.label());
    }
    for (kind, err) in &outcome.failed {
        println!("{}", collection_failure_message(*kind, err));
        let context = [
            ("topic", args.topic.clone()),
            ("max_items", max_items.to_string()),
        ];
        match log_error_to_file(&config.log_dir, *kind, err, &context) {
            Ok(path) => println!("   Details logged to {}", path.display()),
            Err(e) => tracing::warn!(source = %kind, error = %e, "could not write error log"),
        }
    }

    if outcome.items.is_empty() {
        println!("\n❌ No data collected from any source.");
        print_suggestions(&outcome.failed);
        anyhow::bail!("no data collected for '{}'", args.topic);
    }

    if outcome.is_partial() {
        println!(
            "\n{}",
            partial_success_message(
                &outcome.succeeded,
                &outcome.unsuccessful(),
                outcome.items.len()
            )
        );
        if args.strict {
            print_suggestions(&outcome.failed);
            anyhow::bail!("collection was incomplete and --strict was given");
        }
        println!("   Continuing with partial data.");
    }

    Ok(outcome.items)
}

fn print_suggestions(failed: &[(SourceKind, SourceError)]) {
    for (kind, err) in failed {
        println!(
            "\n💡 Suggestions for {} ({}):",
            kind.label(),
            categorize(err).as_str()
        );
        for tip in suggest_fixes(err).iter().take(MAX_SUGGESTIONS) {
            println!("   • {tip}");
        }
    }
}

fn enhance(items: &[DataItem]) -> EnhancedAnalysis {
    println!("\n🔬 Running enhanced analysis...");

    let sentiment = analyze_sentiment(&LexiconScorer::new(), items);
    if sentiment.total_analyzed == 0 {
        println!("⚠️  Sentiment: {} (no text to score)", sentiment.overall);
    } else {
        println!(
            "✓ Sentiment: {} ({:+.3})",
            sentiment.overall, sentiment.average_compound
        );
    }

    let keywords = extract_item_keywords(&FrequencyKeywordExtractor::default(), items);
    println!("✓ Extracted {} keywords", keywords.len());

    let trends = analyze_temporal_trends(items);
    println!("✓ Trends across {} dates", trends.total_dates);

    EnhancedAnalysis {
        sentiment,
        keywords,
        trends,
    }
}

/// Compare against an earlier report, warning instead of failing.
fn compare_with_previous(
    previous: &Path,
    sentiment: &SentimentSnapshot,
    keywords: &[Keyword],
) -> Option<ComparisonResult> {
    println!("\n🔄 Comparing with {}...", previous.display());
    match load_previous_report(previous) {
        Ok(report) => {
            let result = compare(&CurrentAnalysis::new(Some(sentiment), keywords), &report);
            println!(
                "✓ Comparison complete: {} new topics, {} removed",
                result.total_new, result.total_removed
            );
            Some(result)
        }
        Err(e) => {
            tracing::warn!(path = %previous.display(), error = %e, "comparison skipped");
            println!("⚠️  Comparison failed: {e}");
            None
        }
    }
}

/// Where the report goes. A user-supplied name is placed under `output_dir`
/// and gets a `.md` extension when it has none.
pub(crate) fn report_path(
    output_dir: &Path,
    output: Option<&Path>,
    topic: &str,
    generated: NaiveDateTime,
) -> PathBuf {
    match output {
        Some(name) => {
            let path = output_dir.join(name);
            if path.extension().is_none() {
                path.with_extension("md")
            } else {
                path
            }
        }
        None => output_dir.join(report_filename(topic, generated)),
    }
}

fn build_sidecar(
    topic: &str,
    generated: NaiveDateTime,
    model: &str,
    items: &[DataItem],
    enhanced: &EnhancedAnalysis,
) -> ReportSidecar {
    let count = |kind: SourceKind| items.iter().filter(|i| i.source() == kind).count();
    ReportSidecar {
        version: SIDECAR_VERSION,
        topic: topic.to_string(),
        generated: generated.format("%Y-%m-%d %H:%M:%S").to_string(),
        model: model.to_string(),
        sentiment: Some(enhanced.sentiment.clone()),
        keywords: enhanced
            .keywords
            .iter()
            .map(|k| k.keyword.clone())
            .collect(),
        sources: SourceCounts {
            x_count: Some(count(SourceKind::X)),
            web_count: Some(count(SourceKind::Web)),
        },
        trends: Some(enhanced.trends.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use resa_core::{Engagement, SentimentLabel};

    fn generated() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn items() -> Vec<DataItem> {
        vec![
            DataItem::x_post(
                "Great upgrade, fees are much lower",
                "alice",
                Some("2024-02-28".to_string()),
                "https://x.com/alice/status/1",
                Engagement {
                    likes: 10,
                    retweets: 2,
                    replies: 1,
                },
            ),
            DataItem::web_result(
                "Governance vote passes",
                "",
                "CoinDesk",
                Some("2024-02-29T10:00:00Z".to_string()),
                "https://news.example/vote",
            ),
        ]
    }

    #[test]
    fn output_name_is_placed_under_output_dir_with_md_extension() {
        let path = report_path(
            Path::new("reports"),
            Some(Path::new("weekly")),
            "Uniswap",
            generated(),
        );
        assert_eq!(path, PathBuf::from("reports/weekly.md"));
    }

    #[test]
    fn output_name_keeps_its_extension() {
        let path = report_path(
            Path::new("reports"),
            Some(Path::new("weekly.markdown")),
            "Uniswap",
            generated(),
        );
        assert_eq!(path, PathBuf::from("reports/weekly.markdown"));
    }

    #[test]
    fn default_output_uses_generated_filename() {
        let path = report_path(Path::new("reports"), None, "Uniswap", generated());
        assert_eq!(
            path,
            Path::new("reports").join(report_filename("Uniswap", generated()))
        );
    }

    #[test]
    fn items_file_round_trips_collected_items() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, serde_json::to_string(&items()).unwrap()).unwrap();

        let loaded = load_items(&path).unwrap();
        assert_eq!(loaded, items());
    }

    #[test]
    fn empty_items_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, "[]").unwrap();

        let err = load_items(&path).unwrap_err();
        assert!(err.to_string().contains("contains no items"));
    }

    #[test]
    fn sidecar_counts_sources_and_keeps_keyword_order() {
        let data = items();
        let enhanced = EnhancedAnalysis {
            sentiment: SentimentSnapshot::empty(),
            keywords: vec![Keyword::new("fees", 0.1), Keyword::new("governance", 0.2)],
            trends: TrendSnapshot::empty(),
        };
        let sidecar = build_sidecar("Uniswap", generated(), "claude-test", &data, &enhanced);

        assert_eq!(sidecar.version, SIDECAR_VERSION);
        assert_eq!(sidecar.generated, "2024-03-01 09:30:00");
        assert_eq!(sidecar.keywords, vec!["fees", "governance"]);
        assert_eq!(sidecar.sources.x_count, Some(1));
        assert_eq!(sidecar.sources.web_count, Some(1));
    }

    #[test]
    fn enhance_scores_every_item() {
        let enhanced = enhance(&items());
        assert_eq!(enhanced.sentiment.total_analyzed, 2);
        assert!(!enhanced.keywords.is_empty());
        assert_eq!(enhanced.trends.total_dates, 2);
    }

    #[test]
    fn items_without_text_keep_an_unknown_sentiment_for_comparison() {
        let silent = vec![DataItem::x_post(
            "",
            "bob",
            Some("2024-02-28".to_string()),
            "https://x.com/bob/status/2",
            Engagement::default(),
        )];
        let enhanced = enhance(&silent);
        assert_eq!(enhanced.sentiment.overall, SentimentLabel::Unknown);
        assert_eq!(enhanced.sentiment.total_analyzed, 0);

        let dir = tempfile::tempdir().unwrap();
        let previous = dir.path().join("previous.md");
        std::fs::write(
            &previous,
            "## 😊 Sentiment Analysis\n\n**Overall Sentiment**: Positive (compound score: +0.400)\n",
        )
        .unwrap();
        let result = compare_with_previous(&previous, &enhanced.sentiment, &[])
            .expect("previous report is readable");
        let change = result.sentiment_change.expect("both sides carry sentiment");
        assert_eq!(change.new, "Unknown");
        assert_eq!(change.old, "Positive");
    }

    #[test]
    fn unreadable_previous_report_skips_comparison() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.md");
        assert!(compare_with_previous(&missing, &SentimentSnapshot::empty(), &[]).is_none());
    }
}
