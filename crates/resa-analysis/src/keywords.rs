//! Keyword ranking over a run's item texts.

use std::collections::{HashMap, HashSet};

use resa_core::{DataItem, Keyword, KeywordList};

use crate::rounding::round_to;

/// Number of keywords kept per run.
pub const DEFAULT_TOP_N: usize = 20;

/// Anything that can rank keywords in a set of texts. Lower score ranks higher.
pub trait KeywordExtractor {
    fn extract(&self, texts: &[&str]) -> KeywordList;
}

/// Rank keywords of the items' text fields with `extractor`.
#[must_use]
pub fn extract_item_keywords<E: KeywordExtractor + ?Sized>(
    extractor: &E,
    items: &[DataItem],
) -> KeywordList {
    let texts: Vec<&str> = items.iter().filter_map(DataItem::text).collect();
    if texts.is_empty() {
        return Vec::new();
    }
    let keywords = extractor.extract(&texts);
    tracing::info!(
        texts = texts.len(),
        keywords = keywords.len(),
        "keyword extraction complete"
    );
    keywords
}

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "amp", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each",
    "even", "ever", "few", "for", "from", "further", "get", "gets", "got", "had", "has", "have",
    "having", "he", "her", "here", "hers", "him", "his", "how", "http", "https", "i", "if", "in",
    "into", "is", "it", "its", "itself", "just", "like", "me", "more", "most", "much", "my", "new",
    "no", "nor", "not", "now", "of", "off", "on", "once", "one", "only", "or", "other", "our",
    "ours", "out", "over", "own", "rt", "same", "says", "she", "should", "so", "some", "still",
    "such", "than", "that", "the", "their", "theirs", "them", "then", "there", "these", "they",
    "this", "those", "through", "to", "too", "under", "until", "up", "us", "very", "via", "was",
    "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
    "would", "yet", "you", "your", "yours",
];

/// Characters that end a phrase when they trail a word.
const PHRASE_BREAKS: &[char] = &['.', ',', ';', ':', '!', '?', '(', ')', '"', '|'];

/// Ranks unigrams and bigrams by frequency, spread across texts and casing.
///
/// Stopwords and punctuation break phrases, so bigrams never span them.
/// Bigrams must occur at least twice. A unigram that only ever appears inside
/// one ranked bigram is dropped in favour of the bigram.
#[derive(Debug, Clone, Copy)]
pub struct FrequencyKeywordExtractor {
    top_n: usize,
}

impl FrequencyKeywordExtractor {
    #[must_use]
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }
}

impl Default for FrequencyKeywordExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

#[derive(Debug)]
struct Candidate {
    display: String,
    words: Vec<String>,
    frequency: usize,
    documents: usize,
    last_document: usize,
    first_position: usize,
    capitalized: usize,
}

impl KeywordExtractor for FrequencyKeywordExtractor {
    fn extract(&self, texts: &[&str]) -> KeywordList {
        let mut candidates: HashMap<String, Candidate> = HashMap::new();
        let mut position = 0usize;

        for (document, text) in texts.iter().enumerate() {
            for run in phrase_runs(text) {
                for (i, word) in run.iter().enumerate() {
                    position += 1;
                    if word.chars().count() >= 3 {
                        record(&mut candidates, &run[i..=i], document, position);
                    }
                    if i + 1 < run.len() {
                        record(&mut candidates, &run[i..i + 2], document, position);
                    }
                }
            }
        }

        let eligible: Vec<&Candidate> = candidates
            .values()
            .filter(|c| c.words.len() == 1 || c.frequency >= 2)
            .collect();

        let lookup = &candidates;
        let subsumed: HashSet<&str> = eligible
            .iter()
            .copied()
            .filter(|c| c.words.len() > 1)
            .flat_map(|bigram| {
                bigram.words.iter().filter_map(move |word| {
                    let unigram = lookup.get(word)?;
                    (unigram.frequency == bigram.frequency).then_some(word.as_str())
                })
            })
            .collect();

        let mut ranked: Vec<(f64, &Candidate)> = eligible
            .into_iter()
            .filter(|c| !(c.words.len() == 1 && subsumed.contains(c.words[0].as_str())))
            .map(|c| (score(c, texts.len()), c))
            .collect();
        ranked.sort_by(|(a_score, a), (b_score, b)| {
            a_score
                .total_cmp(b_score)
                .then(a.first_position.cmp(&b.first_position))
        });

        ranked
            .into_iter()
            .take(self.top_n)
            .map(|(s, c)| Keyword::new(c.display.clone(), round_to(s, 4)))
            .collect()
    }
}

#[allow(clippy::cast_precision_loss)]
fn score(candidate: &Candidate, documents: usize) -> f64 {
    let frequency = candidate.frequency as f64;
    let spread = (1.0 + candidate.documents as f64).ln() / (1.0 + documents as f64).ln();
    let casing = 1.0 + 0.5 * candidate.capitalized as f64 / frequency;
    let length = if candidate.words.len() > 1 { 1.5 } else { 1.0 };
    let relevance = frequency.ln_1p() * (1.0 + spread) * casing * length;
    1.0 / relevance
}

fn record(
    candidates: &mut HashMap<String, Candidate>,
    words: &[String],
    document: usize,
    position: usize,
) {
    let lowered: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
    let key = lowered.join(" ");
    let capitalized = usize::from(words[0].chars().next().is_some_and(char::is_uppercase));

    let entry = candidates.entry(key).or_insert_with(|| Candidate {
        display: words.join(" "),
        words: lowered,
        frequency: 0,
        documents: 0,
        last_document: usize::MAX,
        first_position: position,
        capitalized: 0,
    });
    entry.frequency += 1;
    entry.capitalized += capitalized;
    if entry.last_document != document {
        entry.last_document = document;
        entry.documents += 1;
    }
}

/// Split text into runs of content words, breaking at stopwords,
/// punctuation and links.
fn phrase_runs(text: &str) -> Vec<Vec<String>> {
    let mut runs = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut flush = |current: &mut Vec<String>| {
        if !current.is_empty() {
            runs.push(std::mem::take(current));
        }
    };

    for raw in text.split_whitespace() {
        let breaks_after = raw.ends_with(PHRASE_BREAKS);
        let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
        let is_content = !word.is_empty()
            && !raw.contains("://")
            && !raw.starts_with('@')
            && !word.chars().all(|c| c.is_ascii_digit())
            && !STOPWORDS.contains(&word.to_lowercase().as_str());

        if is_content {
            current.push(word.to_string());
        } else {
            flush(&mut current);
        }
        if breaks_after {
            flush(&mut current);
        }
    }
    flush(&mut current);
    runs
}
