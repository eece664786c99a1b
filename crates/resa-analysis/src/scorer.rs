//! Lexicon-based polarity scorer.
//!
//! Word valences use a `[-4.0, 4.0]` scale. Per-text sums are squashed into a
//! compound score in `[-1.0, 1.0]`, and the positive/negative/neutral shares
//! describe how much of the text carries each polarity.

/// Polarity breakdown of one text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolarityScores {
    pub pos: f64,
    pub neg: f64,
    pub neu: f64,
    /// Normalized overall polarity in `[-1.0, 1.0]`.
    pub compound: f64,
}

/// Anything that can score the polarity of a text.
pub trait PolarityScorer {
    fn polarity(&self, text: &str) -> PolarityScores;
}

/// General-purpose word weights.
///
/// Keys are lowercase single words.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive signals
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("better", 1.9),
    ("bullish", 2.0),
    ("excellent", 3.2),
    ("excited", 1.9),
    ("exciting", 2.2),
    ("fantastic", 2.6),
    ("gain", 1.6),
    ("gains", 1.6),
    ("good", 1.9),
    ("great", 3.1),
    ("growing", 1.3),
    ("growth", 1.6),
    ("happy", 2.7),
    ("impressive", 2.3),
    ("improved", 2.1),
    ("innovative", 1.9),
    ("legitimate", 1.6),
    ("like", 1.5),
    ("love", 3.2),
    ("loved", 2.9),
    ("nice", 1.8),
    ("optimistic", 1.9),
    ("popular", 1.8),
    ("positive", 2.6),
    ("promising", 1.7),
    ("recommend", 1.5),
    ("safe", 1.9),
    ("secure", 1.4),
    ("strong", 2.3),
    ("success", 2.7),
    ("successful", 2.8),
    ("thriving", 2.0),
    ("useful", 1.9),
    ("victory", 2.9),
    ("win", 2.8),
    ("wonderful", 2.7),
    // Negative signals
    ("awful", -2.0),
    ("ban", -2.6),
    ("banned", -2.0),
    ("bad", -2.5),
    ("bearish", -2.0),
    ("broken", -2.1),
    ("concern", -1.4),
    ("crash", -1.7),
    ("dangerous", -2.1),
    ("decline", -1.6),
    ("disappointing", -2.2),
    ("exploit", -1.9),
    ("fail", -2.5),
    ("failed", -2.3),
    ("failure", -2.3),
    ("fear", -2.2),
    ("fraud", -2.8),
    ("hack", -1.4),
    ("hacked", -1.7),
    ("harmful", -2.6),
    ("hate", -2.7),
    ("illegal", -2.6),
    ("lawsuit", -1.4),
    ("loss", -1.3),
    ("losses", -1.7),
    ("poor", -2.1),
    ("problem", -1.7),
    ("recall", -1.5),
    ("risk", -1.1),
    ("risky", -1.4),
    ("scam", -2.2),
    ("terrible", -2.1),
    ("ugly", -2.3),
    ("warning", -1.4),
    ("weak", -1.9),
    ("worse", -2.1),
    ("worst", -3.1),
];

/// Words that scale the next sentiment word.
const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", 0.293),
    ("extremely", 0.293),
    ("highly", 0.293),
    ("incredibly", 0.293),
    ("really", 0.293),
    ("so", 0.293),
    ("very", 0.293),
    ("barely", -0.293),
    ("slightly", -0.293),
    ("somewhat", -0.293),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "cannot", "without",
    "isnt", "arent", "wasnt", "werent", "dont", "doesnt", "didnt", "wont", "cant", "couldnt",
    "shouldnt", "wouldnt", "aint",
];

/// Flips and dampens a negated valence.
const NEGATION_SCALAR: f64 = -0.74;

/// Normalization constant for the compound squash `x / sqrt(x^2 + alpha)`.
const ALPHA: f64 = 15.0;

/// Intensity added per exclamation mark, up to four marks.
const EXCLAMATION_BOOST: f64 = 0.292;

/// Scores text against [`LEXICON`] with booster, negation and emphasis rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> PolarityScores {
        let words = tokenize(text);
        if words.is_empty() {
            return PolarityScores::default();
        }

        let valences: Vec<f64> = (0..words.len())
            .map(|i| word_valence(&words, i))
            .collect();

        let mut sum: f64 = valences.iter().sum();
        if sum != 0.0 {
            let marks = text.matches('!').count().min(4);
            #[allow(clippy::cast_precision_loss)]
            let emphasis = marks as f64 * EXCLAMATION_BOOST;
            sum += emphasis.copysign(sum);
        }

        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut neu_count = 0.0;
        for &v in &valences {
            if v > 0.0 {
                pos_sum += v + 1.0;
            } else if v < 0.0 {
                neg_sum += v - 1.0;
            } else {
                neu_count += 1.0;
            }
        }
        let total = pos_sum + neg_sum.abs() + neu_count;

        PolarityScores {
            pos: round3(pos_sum / total),
            neg: round3(neg_sum.abs() / total),
            neu: round3(neu_count / total),
            compound: round3(normalize(sum)),
        }
    }
}

fn round3(value: f64) -> f64 {
    crate::rounding::round_to(value, 3)
}

fn normalize(sum: f64) -> f64 {
    (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .chars()
                .filter(|c| *c != '\'' && *c != '\u{2019}')
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

fn lookup(table: &[(&str, f64)], word: &str) -> Option<f64> {
    table
        .iter()
        .find(|(entry, _)| *entry == word)
        .map(|&(_, weight)| weight)
}

/// Valence of `words[i]` after applying the up-to-three preceding modifiers.
fn word_valence(words: &[String], i: usize) -> f64 {
    let Some(mut valence) = lookup(LEXICON, &words[i]) else {
        return 0.0;
    };

    let window_start = i.saturating_sub(3);
    for (distance, previous) in words[window_start..i].iter().rev().enumerate() {
        if let Some(boost) = lookup(BOOSTERS, previous) {
            // Boosters further away contribute less.
            #[allow(clippy::cast_precision_loss)]
            let decay = 1.0 - 0.1 * distance as f64;
            let scaled = boost * decay;
            valence += if valence > 0.0 { scaled } else { -scaled };
        }
        if NEGATIONS.contains(&previous.as_str()) {
            valence *= NEGATION_SCALAR;
            break;
        }
    }
    valence
}
