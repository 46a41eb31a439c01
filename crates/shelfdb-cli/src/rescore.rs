//! Sentiment re-scoring pass: rewrite score/label for persisted reviews
//! using the lexicon strategy. The only path that updates Review rows in
//! place.

use rust_decimal::Decimal;
use sqlx::PgPool;

use shelfdb_core::{Sentiment, SentimentScorer};
use shelfdb_sentiment::LexiconScorer;

/// Decimal places kept for persisted sentiment scores.
const SENTIMENT_SCALE: u32 = 3;

/// Re-scores every review (or one book's reviews) and bulk-updates the
/// rows in a single transaction. Returns the number of rows rewritten.
///
/// # Errors
///
/// Returns an error when the reviews cannot be loaded or the update
/// transaction fails.
pub async fn run(pool: &PgPool, book_id: Option<i64>) -> anyhow::Result<u64> {
    let scorer = LexiconScorer::new();

    let reviews = match book_id {
        Some(id) => shelfdb_db::list_reviews_for_book(pool, id).await?,
        None => shelfdb_db::list_all_reviews(pool).await?,
    };
    if reviews.is_empty() {
        tracing::info!("no reviews to re-score");
        return Ok(0);
    }

    let updates: Vec<(i64, Decimal, String)> = reviews
        .iter()
        .map(|review| {
            let sentiment = if review.review_text.is_empty() {
                Sentiment::neutral()
            } else {
                scorer.score(&review.review_text)
            };
            (
                review.id,
                Decimal::try_from(sentiment.score)
                    .unwrap_or_default()
                    .round_dp(SENTIMENT_SCALE),
                sentiment.label.to_string(),
            )
        })
        .collect();

    let updated = shelfdb_db::update_review_sentiments(pool, &updates).await?;
    tracing::info!(updated, scorer = scorer.name(), "re-scoring pass complete");
    Ok(updated)
}
