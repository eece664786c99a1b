//! Pure analysis stages of the research pipeline.
//!
//! Everything here runs synchronously over in-memory collections and never
//! fails: unparseable dates fall into the `Unknown` bucket, empty inputs
//! produce the canonical empty snapshots.

pub mod comparison;
pub mod dates;
pub mod keywords;
pub mod scorer;
pub mod sentiment;
pub mod trends;

mod rounding;

pub use comparison::{compare, CurrentAnalysis, SentimentSide};
pub use dates::{normalize_date, parse_date};
pub use keywords::{
    extract_item_keywords, FrequencyKeywordExtractor, KeywordExtractor, DEFAULT_TOP_N,
};
pub use scorer::{LexiconScorer, PolarityScorer, PolarityScores};
pub use sentiment::analyze_sentiment;
pub use trends::{analyze_temporal_trends, group_by_date, DateBuckets};
