//! Section headings shared by the renderer and the parser.
//!
//! The parser locates sections by [`Heading::title`] alone, so the emoji may
//! change without breaking older reports. Titles must stay stable.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heading {
    pub emoji: &'static str,
    pub title: &'static str,
}

impl Heading {
    /// The level-2 Markdown heading line.
    #[must_use]
    pub fn markdown(self) -> String {
        format!("## {} {}", self.emoji, self.title)
    }

    /// Whether `line` is a level-2 heading carrying exactly this title,
    /// optionally after one leading emoji or symbol.
    #[must_use]
    pub fn matches(self, line: &str) -> bool {
        let Some(rest) = line.strip_prefix("## ") else {
            return false;
        };
        let rest = rest.trim();
        rest == self.title
            || rest.split_once(' ').is_some_and(|(lead, tail)| {
                !lead.chars().any(char::is_alphanumeric) && tail.trim_start() == self.title
            })
    }
}

pub const QUICK_STATS: Heading = Heading {
    emoji: "📊",
    title: "Quick Stats",
};

pub const CHANGES: Heading = Heading {
    emoji: "🔄",
    title: "Changes Since Last Report",
};

pub const SENTIMENT: Heading = Heading {
    emoji: "😊",
    title: "Sentiment Analysis",
};

pub const KEYWORDS: Heading = Heading {
    emoji: "🔑",
    title: "Top Keywords",
};

pub const TRENDS: Heading = Heading {
    emoji: "📈",
    title: "Temporal Trends",
};

pub const DATA_SOURCES: Heading = Heading {
    emoji: "📚",
    title: "Data Sources",
};

/// Generated sections placed between the header divider and the narrative.
pub const ENHANCEMENTS: [Heading; 5] = [QUICK_STATS, CHANGES, SENTIMENT, KEYWORDS, TRENDS];

/// Keyword bullet glyphs by rank band: 1-5, 6-10, 11-15.
pub const KEYWORD_MARKERS: [&str; 3] = ["🔥", "📌", "•"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_ignores_emoji() {
        assert!(SENTIMENT.matches("## 😊 Sentiment Analysis"));
        assert!(SENTIMENT.matches("## 🙂 Sentiment Analysis  "));
        assert!(SENTIMENT.matches("## Sentiment Analysis"));
    }

    #[test]
    fn matches_requires_level_two() {
        assert!(!SENTIMENT.matches("### Sentiment Analysis"));
        assert!(!SENTIMENT.matches("Sentiment Analysis"));
        assert!(!SENTIMENT.matches("## Sentiment Analysis notes"));
    }

    #[test]
    fn matches_rejects_titles_inside_longer_headings() {
        assert!(!SENTIMENT.matches("## Market Sentiment Analysis"));
        assert!(!SENTIMENT.matches("## 😊 Market Sentiment Analysis"));
        assert!(!KEYWORDS.matches("## Emerging Top Keywords"));
        assert!(KEYWORDS.matches("## 🔑  Top Keywords"));
    }
}
