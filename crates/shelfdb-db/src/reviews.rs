//! Database operations for the `reviews` table.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `reviews` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub public_id: Uuid,
    pub book_id: i64,
    pub reviewer_name: Option<String>,
    pub rating: Option<Decimal>,
    pub review_text: String,
    pub review_date: Option<NaiveDate>,
    pub sentiment_score: Decimal,
    pub sentiment_label: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A review ready for bulk insertion, sentiment already computed.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub reviewer_name: Option<String>,
    pub rating: Option<Decimal>,
    pub review_text: String,
    pub review_date: Option<NaiveDate>,
    pub sentiment_score: Decimal,
    pub sentiment_label: String,
}

/// Per-label counts for one book's reviews.
#[derive(Debug, Clone, Copy, Default, sqlx::FromRow)]
pub struct SentimentBreakdown {
    pub total: i64,
    pub positive: i64,
    pub neutral: i64,
    pub negative: i64,
}

const REVIEW_COLUMNS: &str = "id, public_id, book_id, reviewer_name, rating, review_text, \
     review_date, sentiment_score, sentiment_label, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Durable dedup check: does a review by this reviewer on this date already
/// exist for the book?
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn review_exists(
    pool: &PgPool,
    book_id: i64,
    reviewer_name: &str,
    review_date: NaiveDate,
) -> Result<bool, DbError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS( \
             SELECT 1 FROM reviews \
             WHERE book_id = $1 AND reviewer_name = $2 AND review_date = $3)",
    )
    .bind(book_id)
    .bind(reviewer_name)
    .bind(review_date)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Bulk-inserts reviews for one book in a single statement — the whole
/// batch lands or none of it does.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_reviews_bulk(
    pool: &PgPool,
    book_id: i64,
    reviews: &[NewReview],
) -> Result<u64, DbError> {
    if reviews.is_empty() {
        return Ok(0);
    }

    // Collect each column into a parallel Vec for UNNEST binding.
    let mut reviewer_names: Vec<Option<String>> = Vec::with_capacity(reviews.len());
    let mut ratings: Vec<Option<Decimal>> = Vec::with_capacity(reviews.len());
    let mut texts: Vec<String> = Vec::with_capacity(reviews.len());
    let mut dates: Vec<Option<NaiveDate>> = Vec::with_capacity(reviews.len());
    let mut scores: Vec<Decimal> = Vec::with_capacity(reviews.len());
    let mut labels: Vec<String> = Vec::with_capacity(reviews.len());

    for review in reviews {
        reviewer_names.push(review.reviewer_name.clone());
        ratings.push(review.rating);
        texts.push(review.review_text.clone());
        dates.push(review.review_date);
        scores.push(review.sentiment_score);
        labels.push(review.sentiment_label.clone());
    }

    let result = sqlx::query(
        "INSERT INTO reviews \
             (book_id, reviewer_name, rating, review_text, review_date, \
              sentiment_score, sentiment_label) \
         SELECT $1, * FROM UNNEST( \
              $2::text[], $3::numeric[], $4::text[], $5::date[], \
              $6::numeric[], $7::text[])",
    )
    .bind(book_id)
    .bind(&reviewer_names)
    .bind(&ratings)
    .bind(&texts)
    .bind(&dates)
    .bind(&scores)
    .bind(&labels)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Returns all reviews for a book, newest review date first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reviews_for_book(pool: &PgPool, book_id: i64) -> Result<Vec<ReviewRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewRow>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews \
         WHERE book_id = $1 \
         ORDER BY review_date DESC NULLS LAST, id DESC"
    ))
    .bind(book_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns every review in the catalog, for the re-scoring pass.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_all_reviews(pool: &PgPool) -> Result<Vec<ReviewRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewRow>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Rewrites sentiment score/label for the given review ids in one
/// transaction — the only path that updates existing reviews in place.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any update fails; no partial batch is
/// committed.
pub async fn update_review_sentiments(
    pool: &PgPool,
    updates: &[(i64, Decimal, String)],
) -> Result<u64, DbError> {
    if updates.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut updated = 0u64;
    for (id, score, label) in updates {
        let result = sqlx::query(
            "UPDATE reviews \
             SET sentiment_score = $1, sentiment_label = $2, updated_at = NOW() \
             WHERE id = $3",
        )
        .bind(score)
        .bind(label)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        updated += result.rows_affected();
    }
    tx.commit().await?;

    Ok(updated)
}

/// Counts reviews for a book.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_reviews_for_book(pool: &PgPool, book_id: i64) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE book_id = $1")
        .bind(book_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Aggregates per-label counts for a book's reviews.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn sentiment_breakdown(
    pool: &PgPool,
    book_id: i64,
) -> Result<SentimentBreakdown, DbError> {
    let row = sqlx::query_as::<_, SentimentBreakdown>(
        "SELECT COUNT(*) AS total, \
                COUNT(*) FILTER (WHERE sentiment_label = 'Positive') AS positive, \
                COUNT(*) FILTER (WHERE sentiment_label = 'Neutral') AS neutral, \
                COUNT(*) FILTER (WHERE sentiment_label = 'Negative') AS negative \
         FROM reviews WHERE book_id = $1",
    )
    .bind(book_id)
    .fetch_one(pool)
    .await?;
    Ok(row)
}
