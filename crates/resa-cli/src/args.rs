//! Arguments of the `run` command and their validation.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;
use resa_core::{AnalysisDepth, ConfigError, ModelProvider, SourceKind};

pub(crate) const MIN_TOPIC_CHARS: usize = 2;
pub(crate) const MAX_TOPIC_CHARS: usize = 200;
pub(crate) const MAX_ITEMS_LIMIT: usize = 100;

/// The sources a run collects from, parsed from `x`, `web`, `x,web` or `all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSelection(Vec<SourceKind>);

impl SourceSelection {
    pub fn kinds(&self) -> &[SourceKind] {
        &self.0
    }

    /// Comma-separated labels, e.g. `X, Web`.
    pub fn labels(&self) -> String {
        self.0
            .iter()
            .map(|k| k.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for SourceSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self(SourceKind::ALL.to_vec()));
        }
        let mut kinds = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(SourceKind::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        kinds.sort_unstable();
        kinds.dedup();
        if kinds.is_empty() {
            return Err(ConfigError::UnknownVariant {
                kind: "source",
                value: s.to_string(),
            });
        }
        Ok(Self(kinds))
    }
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Research topic to investigate
    #[arg(long, value_parser = parse_topic)]
    pub topic: String,

    /// Data sources to collect from: x, web, a comma list, or all
    #[arg(long, default_value = "all")]
    pub sources: SourceSelection,

    /// Maximum items per source (1-100); defaults to RESA_DEFAULT_MAX_ITEMS
    #[arg(long, value_parser = parse_max_items)]
    pub max_items: Option<usize>,

    /// Report file name, placed under the output directory
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Analysis depth: quick or detailed
    #[arg(long, default_value = "detailed")]
    pub depth: AnalysisDepth,

    /// Model used for the narrative analysis: claude or gemini
    #[arg(long, default_value = "claude")]
    pub model: ModelProvider,

    /// Fail the run when any selected source produces nothing
    #[arg(long)]
    pub strict: bool,

    /// Earlier report to compare this run against
    #[arg(long)]
    pub compare_with: Option<PathBuf>,

    /// Analyze items from a JSON file instead of collecting them
    #[arg(long)]
    pub items_file: Option<PathBuf>,

    /// Start an interactive follow-up session after the report is written
    #[arg(long)]
    pub interactive: bool,
}

pub(crate) fn parse_topic(raw: &str) -> Result<String, String> {
    let topic = raw.trim();
    let chars = topic.chars().count();
    if chars < MIN_TOPIC_CHARS {
        return Err(format!(
            "topic must be at least {MIN_TOPIC_CHARS} characters"
        ));
    }
    if chars > MAX_TOPIC_CHARS {
        return Err(format!("topic must be at most {MAX_TOPIC_CHARS} characters"));
    }
    Ok(topic.to_string())
}

pub(crate) fn parse_max_items(raw: &str) -> Result<usize, String> {
    let value: usize = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a positive number"))?;
    check_max_items(value)
}

pub(crate) fn check_max_items(value: usize) -> Result<usize, String> {
    if (1..=MAX_ITEMS_LIMIT).contains(&value) {
        Ok(value)
    } else {
        Err(format!("max items must be between 1 and {MAX_ITEMS_LIMIT}, got {value}"))
    }
}
