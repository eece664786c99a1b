//! Structured snapshot written next to each Markdown report.
//!
//! The sidecar is the authoritative record of a run's sentiment, keywords
//! and source counts. Markdown parsing is the fallback for reports that have
//! no sidecar.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use resa_core::{
    ParsedSentiment, PreviousReportSnapshot, ReportMetadata, SentimentSnapshot, SourceCounts,
    TrendSnapshot,
};

pub const SIDECAR_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSidecar {
    pub version: u32,
    pub topic: String,
    /// `YYYY-MM-DD HH:MM:SS`, as shown in the report header.
    pub generated: String,
    pub model: String,
    pub sentiment: Option<SentimentSnapshot>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub sources: SourceCounts,
    #[serde(default)]
    pub trends: Option<TrendSnapshot>,
}

/// `reports/research_x.md` → `reports/research_x.snapshot.json`.
#[must_use]
pub fn sidecar_path(report: &Path) -> PathBuf {
    report.with_extension("snapshot.json")
}

impl ReportSidecar {
    /// Replace the Markdown-derived fields of `snapshot` with this record.
    ///
    /// The narrative analysis and the header's data-sources line stay as
    /// parsed.
    pub fn apply_to(&self, snapshot: &mut PreviousReportSnapshot) {
        snapshot.metadata.generated = Some(self.generated.clone());
        snapshot.metadata.model = Some(self.model.clone());
        snapshot.sentiment = self.sentiment.as_ref().map(ParsedSentiment::from);
        snapshot.keywords.clone_from(&self.keywords);
        snapshot.sources = self.sources;
    }

    /// A snapshot built from the sidecar alone, for when only the JSON is at hand.
    #[must_use]
    pub fn into_snapshot(self) -> PreviousReportSnapshot {
        let data_sources = match (self.sources.x_count, self.sources.web_count) {
            (Some(x), Some(web)) => Some(format!("X ({x}), Web ({web}) - Total: {}", x + web)),
            _ => None,
        };
        PreviousReportSnapshot {
            metadata: ReportMetadata {
                generated: Some(self.generated),
                data_sources,
                model: Some(self.model),
            },
            sentiment: self.sentiment.as_ref().map(ParsedSentiment::from),
            keywords: self.keywords,
            sources: self.sources,
            analysis: String::new(),
        }
    }
}
