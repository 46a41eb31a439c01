//! VADER-based statistical scorer.

use shelfdb_core::{Sentiment, SentimentLabel, SentimentScorer};
use vader_sentiment::SentimentIntensityAnalyzer;

/// Compound score at or above which text is labeled Positive.
/// The mirrored negative bound labels Negative; between the two is Neutral.
/// These are the canonical VADER thresholds.
const POSITIVE_THRESHOLD: f64 = 0.05;
const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Scores text with the VADER model's compound polarity in `[-1, 1]`.
///
/// Construction parses the bundled lexicon, so build one per process and
/// pass it by reference rather than per call.
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for VaderScorer {
    fn score(&self, text: &str) -> Sentiment {
        if text.trim().is_empty() {
            return Sentiment::neutral();
        }

        let scores = self.analyzer.polarity_scores(text);
        let compound = scores.get("compound").copied().unwrap_or(0.0);

        let label = if compound >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };

        Sentiment {
            score: compound,
            label,
        }
    }

    fn name(&self) -> &'static str {
        "vader"
    }
}
