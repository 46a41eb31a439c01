//! Word-set lexicon scorer.

use shelfdb_core::{Sentiment, SentimentLabel, SentimentScorer};

/// Words counted as positive signals. Lowercase single tokens.
const POSITIVE_WORDS: &[&str] = &[
    "love",
    "great",
    "excellent",
    "amazing",
    "perfect",
    "beautiful",
    "wonderful",
    "enjoyed",
    "best",
];

/// Words counted as negative signals. Lowercase single tokens.
const NEGATIVE_WORDS: &[&str] = &[
    "hate",
    "bad",
    "terrible",
    "awful",
    "disappointing",
    "boring",
    "worst",
    "confusing",
];

/// Counts positive and negative word matches; score is the signed
/// difference, label follows the sign.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconScorer;

impl LexiconScorer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> Sentiment {
        if text.trim().is_empty() {
            return Sentiment::neutral();
        }

        let mut positive = 0i64;
        let mut negative = 0i64;
        for token in tokenize(text) {
            if POSITIVE_WORDS.contains(&token.as_str()) {
                positive += 1;
            } else if NEGATIVE_WORDS.contains(&token.as_str()) {
                negative += 1;
            }
        }

        let score = positive - negative;
        let label = match score {
            s if s > 0 => SentimentLabel::Positive,
            s if s < 0 => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        };

        #[allow(clippy::cast_precision_loss)] // token counts are tiny
        let score = score as f64;
        Sentiment { score, label }
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

/// Splits text into lowercase word tokens, dropping punctuation.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}
