//! Shared data model and configuration for the research pipeline.
//!
//! Every other crate in the workspace speaks in terms of the types defined
//! here: collected [`DataItem`]s flow in, the snapshot structures flow out to
//! the report renderer and back in again through the report parser.

pub mod app_config;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod types;

pub use app_config::{AppConfig, ModelProvider};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use snapshot::{
    CategoryShare, ComparisonResult, DateRange, EngagementTrends, FrequencyStats, Keyword,
    KeywordList, ParsedSentiment, PreviousReportSnapshot, ReportMetadata, SentimentChange,
    SentimentDistribution, SentimentLabel, SentimentSnapshot, ShiftDirection, SourceCounts,
    TimelineEntry, TrendSnapshot, UNKNOWN_DATE,
};
pub use types::{AnalysisDepth, DataItem, Engagement, SourceKind, SourcePayload};
