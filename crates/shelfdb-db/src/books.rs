//! Database operations for the `books` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `books` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookRow {
    pub id: i64,
    pub public_id: Uuid,
    pub title: String,
    pub normalized_title: String,
    pub author: Option<String>,
    pub normalized_author: Option<String>,
    pub description: Option<String>,
    pub published_date: Option<String>,
    pub average_rating: Option<Decimal>,
    pub num_ratings: Option<i32>,
    pub num_reviews: Option<i32>,
    pub cover_image_url: Option<String>,
    pub external_id: Option<String>,
    pub external_url: Option<String>,
    pub info_link: Option<String>,
    pub isbn: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The explicit allow-list of fields a new book can be created with. This
/// is the compile-time counterpart of "restrict the field set to what the
/// entity defines" — nothing scraped lands in the table without a slot here.
#[derive(Debug, Clone, Default)]
pub struct NewBook {
    pub title: String,
    pub normalized_title: String,
    pub author: Option<String>,
    pub normalized_author: Option<String>,
    pub description: Option<String>,
    pub published_date: Option<String>,
    pub average_rating: Option<Decimal>,
    pub num_ratings: Option<i32>,
    pub num_reviews: Option<i32>,
    pub cover_image_url: Option<String>,
    pub external_id: Option<String>,
    pub external_url: Option<String>,
    pub info_link: Option<String>,
    pub isbn: Option<String>,
}

const BOOK_COLUMNS: &str = "id, public_id, title, normalized_title, author, normalized_author, \
     description, published_date, average_rating, num_ratings, num_reviews, \
     cover_image_url, external_id, external_url, info_link, isbn, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns the book with the given external id, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_book_by_external_id(
    pool: &PgPool,
    external_id: &str,
) -> Result<Option<BookRow>, DbError> {
    let row = sqlx::query_as::<_, BookRow>(&format!(
        "SELECT {BOOK_COLUMNS} FROM books WHERE external_id = $1"
    ))
    .bind(external_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Returns the book with the given row id, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_book_by_id(pool: &PgPool, id: i64) -> Result<Option<BookRow>, DbError> {
    let row = sqlx::query_as::<_, BookRow>(&format!(
        "SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Case-insensitive lookup by the normalized (title, author) pair. An empty
/// `normalized_author` matches on title alone — the approximation used when
/// no external id is known.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_book_by_normalized(
    pool: &PgPool,
    normalized_title: &str,
    normalized_author: &str,
) -> Result<Option<BookRow>, DbError> {
    let row = if normalized_author.is_empty() {
        sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books \
             WHERE LOWER(normalized_title) = LOWER($1) \
             ORDER BY id LIMIT 1"
        ))
        .bind(normalized_title)
        .fetch_optional(pool)
        .await?
    } else {
        sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books \
             WHERE LOWER(normalized_title) = LOWER($1) \
               AND LOWER(COALESCE(normalized_author, '')) = LOWER($2) \
             ORDER BY id LIMIT 1"
        ))
        .bind(normalized_title)
        .bind(normalized_author)
        .fetch_optional(pool)
        .await?
    };
    Ok(row)
}

/// Inserts a new book and returns the full row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including external_id
/// unique violations).
pub async fn insert_book(pool: &PgPool, book: &NewBook) -> Result<BookRow, DbError> {
    let row = sqlx::query_as::<_, BookRow>(&format!(
        "INSERT INTO books \
             (title, normalized_title, author, normalized_author, description, \
              published_date, average_rating, num_ratings, num_reviews, \
              cover_image_url, external_id, external_url, info_link, isbn) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
         RETURNING {BOOK_COLUMNS}"
    ))
    .bind(&book.title)
    .bind(&book.normalized_title)
    .bind(&book.author)
    .bind(&book.normalized_author)
    .bind(&book.description)
    .bind(&book.published_date)
    .bind(book.average_rating)
    .bind(book.num_ratings)
    .bind(book.num_reviews)
    .bind(&book.cover_image_url)
    .bind(&book.external_id)
    .bind(&book.external_url)
    .bind(&book.info_link)
    .bind(&book.isbn)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Writes back every merge-able field of `book`, bumping `updated_at`.
/// Used by the merger after [`crate::merge_book_fields`] reports a change.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn update_book(pool: &PgPool, book: &BookRow) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE books SET \
             author = $1, normalized_author = $2, description = $3, \
             published_date = $4, average_rating = $5, num_ratings = $6, \
             num_reviews = $7, cover_image_url = $8, external_id = $9, \
             external_url = $10, info_link = $11, isbn = $12, updated_at = NOW() \
         WHERE id = $13",
    )
    .bind(&book.author)
    .bind(&book.normalized_author)
    .bind(&book.description)
    .bind(&book.published_date)
    .bind(book.average_rating)
    .bind(book.num_ratings)
    .bind(book.num_reviews)
    .bind(&book.cover_image_url)
    .bind(&book.external_id)
    .bind(&book.external_url)
    .bind(&book.info_link)
    .bind(&book.isbn)
    .bind(book.id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Returns every book that carries an external id, ordered by title —
/// the work list for batch re-scraping.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_books_with_external_id(pool: &PgPool) -> Result<Vec<BookRow>, DbError> {
    let rows = sqlx::query_as::<_, BookRow>(&format!(
        "SELECT {BOOK_COLUMNS} FROM books \
         WHERE external_id IS NOT NULL \
         ORDER BY title"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Deletes duplicate books sharing a (normalized_title, normalized_author)
/// pair, keeping the lowest-id row of each group. Reviews cascade with
/// their book. Returns the number of rows deleted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_duplicate_books(pool: &PgPool) -> Result<u64, DbError> {
    let result = sqlx::query(
        "DELETE FROM books b USING books keeper \
         WHERE keeper.normalized_title = b.normalized_title \
           AND COALESCE(keeper.normalized_author, '') = COALESCE(b.normalized_author, '') \
           AND keeper.id < b.id",
    )
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
