//! Catalog merger: reconcile freshly scraped data with persisted entities.
//!
//! Two rules govern everything here. Books follow first-write-wins: a field
//! already populated is authoritative and is never overwritten by a later
//! scrape. Reviews follow the durable dedup key: one row per
//! (book, reviewer, date), regardless of how many harvest sessions see the
//! same review.

use rust_decimal::Decimal;
use sqlx::PgPool;

use shelfdb_core::normalize::{normalize_author, normalize_title};
use shelfdb_core::{ScrapedBook, ScrapedReview, Sentiment, SentimentScorer};

use crate::books::{
    get_book_by_external_id, get_book_by_normalized, insert_book, update_book, BookRow, NewBook,
};
use crate::reviews::{insert_reviews_bulk, review_exists, NewReview};
use crate::DbError;

/// Decimal places kept for persisted ratings (`NUMERIC(3,2)`).
const RATING_SCALE: u32 = 2;
/// Decimal places kept for persisted sentiment scores (`NUMERIC(6,3)`).
const SENTIMENT_SCALE: u32 = 3;

/// Creates a book from scraped data, or fills the gaps of the one already
/// persisted. Returns the resulting row either way; never deletes, never
/// overwrites a populated field.
///
/// Lookup order: external_id first, then the case-insensitive normalized
/// (title, author) pair.
///
/// # Errors
///
/// Returns [`DbError::MissingTitle`] when a brand-new record arrives
/// without a title, or [`DbError::Sqlx`] on query failure.
pub async fn create_or_update_book(
    pool: &PgPool,
    scraped: &ScrapedBook,
    source: &str,
) -> Result<BookRow, DbError> {
    let mut existing = if scraped.external_id.is_empty() {
        None
    } else {
        get_book_by_external_id(pool, &scraped.external_id).await?
    };

    if existing.is_none() {
        if let Some(title) = &scraped.title {
            let normalized_title = normalize_title(title);
            let normalized_author = normalize_author(scraped.author.as_deref());
            existing =
                get_book_by_normalized(pool, &normalized_title, &normalized_author).await?;
        }
    }

    if let Some(mut book) = existing {
        if merge_book_fields(&mut book, scraped) {
            update_book(pool, &book).await?;
            tracing::info!(book_id = book.id, title = %book.title, source, "updated existing book");
        } else {
            tracing::debug!(book_id = book.id, title = %book.title, source, "book already complete");
        }
        return Ok(book);
    }

    let new_book = book_fields_from_scraped(scraped)?;
    let book = insert_book(pool, &new_book).await?;
    tracing::info!(book_id = book.id, title = %book.title, source, "created new book");
    Ok(book)
}

/// Maps scraped data onto the explicit field allow-list for insertion.
///
/// # Errors
///
/// Returns [`DbError::MissingTitle`] when the scrape produced no title — a
/// record we could never match back to anything.
pub fn book_fields_from_scraped(scraped: &ScrapedBook) -> Result<NewBook, DbError> {
    let title = scraped
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or(DbError::MissingTitle)?;

    Ok(NewBook {
        title: title.to_owned(),
        normalized_title: normalize_title(title),
        author: scraped.author.clone(),
        normalized_author: scraped
            .author
            .as_deref()
            .map(|a| normalize_author(Some(a)))
            .filter(|a| !a.is_empty()),
        description: scraped.description.clone(),
        published_date: None,
        average_rating: scraped.average_rating.map(|r| r.round_dp(RATING_SCALE)),
        num_ratings: scraped.num_ratings,
        num_reviews: scraped.num_reviews,
        cover_image_url: scraped.cover_image_url.clone(),
        external_id: Some(scraped.external_id.clone()).filter(|id| !id.is_empty()),
        external_url: scraped.external_url.clone(),
        info_link: None,
        isbn: None,
    })
}

/// First-write-wins merge: fills only currently-empty fields of `book` from
/// non-null scraped values. Returns whether anything changed, so callers
/// skip the UPDATE when nothing did.
///
/// Populated fields are never replaced — existing data is authoritative.
pub fn merge_book_fields(book: &mut BookRow, scraped: &ScrapedBook) -> bool {
    let mut changed = false;

    if fill_text(&mut book.author, scraped.author.as_deref()) {
        book.normalized_author =
            Some(normalize_author(book.author.as_deref())).filter(|a| !a.is_empty());
        changed = true;
    }
    changed |= fill_text(&mut book.description, scraped.description.as_deref());
    changed |= fill_value(
        &mut book.average_rating,
        scraped.average_rating.map(|r| r.round_dp(RATING_SCALE)),
    );
    changed |= fill_value(&mut book.num_ratings, scraped.num_ratings);
    changed |= fill_value(&mut book.num_reviews, scraped.num_reviews);
    changed |= fill_text(&mut book.cover_image_url, scraped.cover_image_url.as_deref());
    changed |= fill_text(
        &mut book.external_id,
        Some(scraped.external_id.as_str()).filter(|id| !id.is_empty()),
    );
    changed |= fill_text(&mut book.external_url, scraped.external_url.as_deref());

    changed
}

/// Fills a text field only when it is currently `None` or empty and the
/// source value is non-empty.
fn fill_text(dst: &mut Option<String>, src: Option<&str>) -> bool {
    let dst_empty = dst.as_deref().map_or(true, str::is_empty);
    if !dst_empty {
        return false;
    }
    match src.filter(|s| !s.is_empty()) {
        Some(value) => {
            *dst = Some(value.to_owned());
            true
        }
        None => false,
    }
}

/// Fills a value field only when it is currently `None`.
fn fill_value<T: Copy>(dst: &mut Option<T>, src: Option<T>) -> bool {
    if dst.is_some() {
        return false;
    }
    match src {
        Some(value) => {
            *dst = Some(value);
            true
        }
        None => false,
    }
}

/// Persists harvested reviews for a book: durable dedup on
/// (reviewer, date), sentiment via the injected scorer, one all-or-nothing
/// bulk write.
///
/// A persistence failure is caught and logged here — the call returns the
/// number of rows written, 0 on failure, and never raises. Callers that
/// need certainty re-query the count.
pub async fn save_reviews(
    pool: &PgPool,
    scorer: &dyn SentimentScorer,
    book: &BookRow,
    records: &[ScrapedReview],
) -> u64 {
    match save_reviews_inner(pool, scorer, book, records).await {
        Ok(written) => written,
        Err(e) => {
            tracing::error!(
                book_id = book.id,
                title = %book.title,
                error = %e,
                "failed to save reviews; no rows written"
            );
            0
        }
    }
}

async fn save_reviews_inner(
    pool: &PgPool,
    scorer: &dyn SentimentScorer,
    book: &BookRow,
    records: &[ScrapedReview],
) -> Result<u64, DbError> {
    let mut to_create: Vec<NewReview> = Vec::with_capacity(records.len());

    for record in records {
        // Durable dedup needs both key components; records without a date
        // are stored as-is.
        if let Some(date) = record.review_date {
            if review_exists(pool, book.id, &record.reviewer_name, date).await? {
                tracing::debug!(
                    book_id = book.id,
                    reviewer = %record.reviewer_name,
                    %date,
                    "skipping already-persisted review"
                );
                continue;
            }
        }

        let sentiment = if record.review_text.is_empty() {
            Sentiment::neutral()
        } else {
            scorer.score(&record.review_text)
        };

        to_create.push(NewReview {
            reviewer_name: Some(record.reviewer_name.clone()),
            rating: record.rating.map(|r| r.round_dp(RATING_SCALE)),
            review_text: record.review_text.clone(),
            review_date: record.review_date,
            sentiment_score: Decimal::try_from(sentiment.score)
                .unwrap_or_default()
                .round_dp(SENTIMENT_SCALE),
            sentiment_label: sentiment.label.to_string(),
        });
    }

    if to_create.is_empty() {
        tracing::info!(book_id = book.id, "no new reviews to save");
        return Ok(0);
    }

    let written = insert_reviews_bulk(pool, book.id, &to_create).await?;
    tracing::info!(book_id = book.id, written, "saved new reviews");
    Ok(written)
}
