//! Collectors that gather [`DataItem`]s for a research topic.
//!
//! - [`XCollector`] shells out to the `bird` CLI for X posts.
//! - [`WebCollector`] reads Google News and Bing News RSS search feeds.
//!
//! [`collect_all`] runs the selected collectors and keeps going past
//! individual failures; [`diagnostics`] turns those failures into
//! categories, suggestions and log files.

pub mod diagnostics;
pub mod error;
pub mod retry;
mod rss;
pub mod twitter;
pub mod web;

pub use diagnostics::{
    categorize, collection_failure_message, log_error_to_file, partial_success_message,
    suggest_fixes, ErrorCategory,
};
pub use error::SourceError;
pub use retry::{retry_with_backoff, RetryPolicy};
pub use twitter::XCollector;
pub use web::WebCollector;

use resa_core::{DataItem, SourceKind};

/// What a collection run produced, source by source.
#[derive(Debug, Default)]
pub struct CollectionOutcome {
    pub items: Vec<DataItem>,
    /// Sources that returned at least one item.
    pub succeeded: Vec<SourceKind>,
    /// Sources that ran without error but found nothing.
    pub empty: Vec<SourceKind>,
    pub failed: Vec<(SourceKind, SourceError)>,
}

impl CollectionOutcome {
    /// Sources that produced no items, whether they errored or came back empty.
    #[must_use]
    pub fn unsuccessful(&self) -> Vec<SourceKind> {
        let mut kinds: Vec<SourceKind> = self.failed.iter().map(|(kind, _)| *kind).collect();
        kinds.extend(self.empty.iter().copied());
        kinds.sort_unstable();
        kinds
    }

    /// At least one source worked and at least one did not.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.succeeded.is_empty() && !self.unsuccessful().is_empty()
    }

    #[must_use]
    pub fn count(&self, kind: SourceKind) -> usize {
        self.items.iter().filter(|i| i.source() == kind).count()
    }
}

/// Run the collectors named in `sources`, in [`SourceKind::ALL`] order.
///
/// Each source contributes at most `max_items` items. Failures are recorded
/// in the outcome and never stop the remaining sources.
pub async fn collect_all(
    x: &XCollector,
    web: &WebCollector,
    sources: &[SourceKind],
    topic: &str,
    max_items: usize,
) -> CollectionOutcome {
    let mut outcome = CollectionOutcome::default();

    for kind in SourceKind::ALL {
        if !sources.contains(&kind) {
            continue;
        }
        let result = match kind {
            SourceKind::X => x.collect(topic, max_items).await,
            SourceKind::Web => web.collect(topic, max_items).await,
        };
        match result {
            Ok(items) if items.is_empty() => {
                tracing::warn!(topic, source = %kind, "source returned no items");
                outcome.empty.push(kind);
            }
            Ok(items) => {
                tracing::info!(topic, source = %kind, count = items.len(), "collected items");
                outcome.succeeded.push(kind);
                outcome.items.extend(items);
            }
            Err(e) => {
                tracing::error!(topic, source = %kind, error = %e, "collection failed");
                outcome.failed.push((kind, e));
            }
        }
    }

    outcome
}
