//! Canonical day keys for free-form source dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use resa_core::UNKNOWN_DATE;

/// Explicit patterns tried in priority order before the ISO-8601 fallback.
///
/// The order settles ambiguous inputs: `01/02/2024` only matches the US
/// slash form (January 2), while `01-02-2024` matches the day-first dash form
/// (February 1).
const PATTERNS: &[Pattern] = &[
    Pattern::Date("%Y-%m-%d"),
    Pattern::DateTime("%Y-%m-%d %H:%M:%S"),
    Pattern::Date("%Y/%m/%d"),
    Pattern::Date("%d-%m-%Y"),
    Pattern::Date("%m/%d/%Y"),
    Pattern::Date("%B %d, %Y"),
    Pattern::Date("%b %d, %Y"),
];

/// Naive forms accepted by the ISO fallback once offsets are ruled out.
const ISO_NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

enum Pattern {
    Date(&'static str),
    DateTime(&'static str),
}

impl Pattern {
    fn parse(&self, raw: &str) -> Option<NaiveDate> {
        match self {
            Pattern::Date(fmt) => NaiveDate::parse_from_str(raw, fmt).ok(),
            Pattern::DateTime(fmt) => NaiveDateTime::parse_from_str(raw, fmt)
                .ok()
                .map(|dt| dt.date()),
        }
    }
}

/// Parse a free-form date string into a calendar day.
///
/// Returns `None` for empty input, the `Unknown` sentinel, and anything no
/// pattern accepts.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() || raw == UNKNOWN_DATE {
        return None;
    }

    PATTERNS
        .iter()
        .find_map(|pattern| pattern.parse(raw))
        .or_else(|| parse_iso(raw))
}

/// Normalize a date string to `YYYY-MM-DD`, or `Unknown` when it cannot be read.
#[must_use]
pub fn normalize_date(raw: Option<&str>) -> String {
    match raw.and_then(parse_date) {
        Some(day) => day.format("%Y-%m-%d").to_string(),
        None => UNKNOWN_DATE.to_string(),
    }
}

/// Full ISO-8601 fallback. A trailing `Z` is read as `+00:00` and offset-aware
/// timestamps keep the calendar day as written, not the UTC day.
fn parse_iso(raw: &str) -> Option<NaiveDate> {
    let candidate = match raw.strip_suffix('Z') {
        Some(head) => format!("{head}+00:00"),
        None => raw.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&candidate) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(&candidate, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.date_naive());
    }

    ISO_NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&candidate, fmt).ok())
        .map(|dt| dt.date())
}
