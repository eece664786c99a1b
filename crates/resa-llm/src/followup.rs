//! Answering follow-up questions against an existing analysis.

use std::collections::BTreeSet;

use resa_core::DataItem;

use crate::error::LlmError;
use crate::generator::TextGenerator;
use crate::prompts::{followup_prompt, FollowupContext};

/// Items sent along with a follow-up question.
pub const MAX_FOLLOWUP_ITEMS: usize = 30;

const QUESTION_STOP_WORDS: &[&str] = &[
    "what", "how", "why", "when", "where", "show", "tell", "about", "the", "are", "is", "was",
    "were", "been", "have", "has", "had", "do", "does", "did", "will", "would", "could", "should",
    "may", "might", "can", "this", "that", "these", "those", "and", "or", "but", "for", "with",
];

/// Lowercased words of `question` longer than three characters, minus
/// question stop-words. Surrounding punctuation is ignored.
fn question_terms(question: &str) -> BTreeSet<String> {
    question
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| w.chars().count() > 3 && !QUESTION_STOP_WORDS.contains(&w.as_str()))
        .collect()
}

/// Items whose text mentions any term of `question`, most matches first.
///
/// Ties keep their original order. Items with no match are left out.
#[must_use]
pub fn extract_relevant_items<'a>(question: &str, items: &'a [DataItem]) -> Vec<&'a DataItem> {
    let terms = question_terms(question);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(&DataItem, usize)> = items
        .iter()
        .filter_map(|item| {
            let text = item.text()?.to_lowercase();
            let matches = terms.iter().filter(|t| text.contains(t.as_str())).count();
            (matches > 0).then_some((item, matches))
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().map(|(item, _)| item).collect()
}

/// Answer `question` using the items most relevant to it.
///
/// Falls back to every item when nothing matches, and sends at most
/// [`MAX_FOLLOWUP_ITEMS`].
///
/// # Errors
///
/// Returns [`LlmError::NoData`] when `items` is empty, otherwise whatever
/// the generator fails with.
pub async fn answer_question<G>(
    generator: &G,
    question: &str,
    items: &[DataItem],
    original_analysis: &str,
    context: &FollowupContext<'_>,
) -> Result<String, LlmError>
where
    G: TextGenerator + ?Sized,
{
    if items.is_empty() {
        return Err(LlmError::NoData);
    }

    let relevant = extract_relevant_items(question, items);
    let selected: Vec<DataItem> = if relevant.is_empty() {
        items.iter().take(MAX_FOLLOWUP_ITEMS).cloned().collect()
    } else {
        relevant
            .into_iter()
            .take(MAX_FOLLOWUP_ITEMS)
            .cloned()
            .collect()
    };
    tracing::info!(
        question_chars = question.len(),
        items = selected.len(),
        "answering follow-up question"
    );

    let prompt = followup_prompt(question, &selected, original_analysis, context);
    Ok(generator.generate(&prompt).await?.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resa_core::Engagement;

    fn post(text: &str) -> DataItem {
        DataItem::x_post(text, "u", None, "https://x.com/u/status/1", Engagement::default())
    }

    #[test]
    fn question_terms_skip_short_and_stop_words() {
        let terms = question_terms("What are people saying about Uniswap fees?");
        let terms: Vec<&str> = terms.iter().map(String::as_str).collect();
        assert_eq!(terms, vec!["fees", "people", "saying", "uniswap"]);
    }

    #[test]
    fn ranks_by_match_count_and_keeps_ties_stable() {
        let items = vec![
            post("nothing relevant here"),
            post("Uniswap fees are lower"),
            post("Uniswap hooks"),
            post("fees everywhere"),
        ];
        let relevant = extract_relevant_items("How are Uniswap fees?", &items);
        let texts: Vec<&str> = relevant.iter().map(|i| i.content.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Uniswap fees are lower", "Uniswap hooks", "fees everywhere"]
        );
    }

    #[test]
    fn web_titles_are_searched_when_content_is_empty() {
        let items = vec![DataItem::web_result(
            "Uniswap governance vote",
            "",
            "site",
            None,
            "https://a.example",
        )];
        assert_eq!(extract_relevant_items("governance?", &items).len(), 1);
    }

    #[test]
    fn stop_word_only_question_matches_nothing() {
        let items = vec![post("what would you do")];
        assert!(extract_relevant_items("what would?", &items).is_empty());
    }
}
