//! Sentiment scoring strategies for review text.
//!
//! Two interchangeable implementations of
//! [`shelfdb_core::SentimentScorer`]:
//!
//! - [`LexiconScorer`] — counts matches against fixed positive/negative word
//!   sets; score is the signed match difference.
//! - [`VaderScorer`] — VADER compound polarity in `[-1, 1]` with the
//!   canonical ±0.05 label thresholds.
//!
//! Both are total: empty text scores 0.0 / Neutral.

pub mod lexicon;
pub mod vader;

pub use lexicon::LexiconScorer;
pub use vader::VaderScorer;
