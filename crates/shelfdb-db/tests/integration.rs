//! Offline unit tests for shelfdb-db: pool configuration, row types, and
//! the per-field merge logic. These tests do not require a live database
//! connection.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use shelfdb_core::ScrapedBook;
use shelfdb_db::{
    book_fields_from_scraped, merge_book_fields, BookRow, DbError, PoolConfig, SentimentBreakdown,
};

fn persisted_book() -> BookRow {
    BookRow {
        id: 1,
        public_id: Uuid::new_v4(),
        title: "Dune".to_string(),
        normalized_title: "dune".to_string(),
        author: Some("Frank Herbert".to_string()),
        normalized_author: Some("frank herbert".to_string()),
        description: None,
        published_date: None,
        average_rating: None,
        num_ratings: None,
        num_reviews: None,
        cover_image_url: None,
        external_id: None,
        external_url: None,
        info_link: None,
        isbn: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn scraped_book() -> ScrapedBook {
    ScrapedBook {
        external_id: "44767458".to_string(),
        external_url: Some("https://example/book/show/44767458".to_string()),
        title: Some("Dune".to_string()),
        author: Some("Frank Herbert".to_string()),
        average_rating: Decimal::from_str_exact("4.27").ok(),
        num_ratings: Some(1_300_000),
        num_reviews: Some(55_123),
        cover_image_url: Some("https://images.example/dune.jpg".to_string()),
        description: Some("Set on the desert planet Arrakis.".to_string()),
    }
}

#[test]
fn merge_fills_empty_fields() {
    let mut book = persisted_book();
    let changed = merge_book_fields(&mut book, &scraped_book());
    assert!(changed);
    assert_eq!(book.external_id.as_deref(), Some("44767458"));
    assert_eq!(book.average_rating, Decimal::from_str_exact("4.27").ok());
    assert_eq!(book.num_ratings, Some(1_300_000));
    assert_eq!(
        book.description.as_deref(),
        Some("Set on the desert planet Arrakis.")
    );
}

#[test]
fn merge_never_overwrites_populated_fields() {
    let mut book = persisted_book();
    book.description = Some("Hand-curated description.".to_string());
    book.average_rating = Decimal::from_str_exact("4.99").ok();

    let changed = merge_book_fields(&mut book, &scraped_book());
    assert!(changed, "other empty fields should still fill");
    assert_eq!(
        book.description.as_deref(),
        Some("Hand-curated description.")
    );
    assert_eq!(book.average_rating, Decimal::from_str_exact("4.99").ok());
}

#[test]
fn merge_is_idempotent() {
    let mut book = persisted_book();
    assert!(merge_book_fields(&mut book, &scraped_book()));
    // Second application of the same data changes nothing.
    assert!(!merge_book_fields(&mut book, &scraped_book()));
}

#[test]
fn merge_treats_empty_string_as_fillable() {
    let mut book = persisted_book();
    book.description = Some(String::new());
    assert!(merge_book_fields(&mut book, &scraped_book()));
    assert_eq!(
        book.description.as_deref(),
        Some("Set on the desert planet Arrakis.")
    );
}

#[test]
fn merge_fills_normalized_author_alongside_author() {
    let mut book = persisted_book();
    book.author = None;
    book.normalized_author = None;

    let mut scraped = scraped_book();
    scraped.author = Some("J.R.R. Tolkien (Goodreads Author)".to_string());

    assert!(merge_book_fields(&mut book, &scraped));
    assert_eq!(
        book.author.as_deref(),
        Some("J.R.R. Tolkien (Goodreads Author)")
    );
    assert_eq!(book.normalized_author.as_deref(), Some("j.r.r. tolkien"));
}

#[test]
fn new_book_requires_title() {
    let mut scraped = scraped_book();
    scraped.title = None;
    let result = book_fields_from_scraped(&scraped);
    assert!(
        matches!(result, Err(DbError::MissingTitle)),
        "expected MissingTitle, got: {result:?}"
    );
}

#[test]
fn new_book_normalizes_and_rounds() {
    let mut scraped = scraped_book();
    scraped.title = Some("The Hobbit (Illustrated)".to_string());
    scraped.average_rating = Decimal::from_str_exact("4.275").ok();

    let new_book = book_fields_from_scraped(&scraped).unwrap();
    assert_eq!(new_book.normalized_title, "the hobbit");
    assert_eq!(
        new_book.average_rating,
        Decimal::from_str_exact("4.28").ok()
    );
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let map_cfg = shelfdb_core::AppConfig {
        database_url: "postgres://example".to_string(),
        env: shelfdb_core::Environment::Test,
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        request_timeout_secs: 15,
        user_agent: "ua".to_string(),
        harvest_initial_wait_secs: 10,
        harvest_load_more_wait_secs: 6,
        harvest_politeness_delay_ms: 1500,
        harvest_default_max_reviews: 50,
        browser_headless: true,
        browser_executable: None,
    };

    let pool_config = PoolConfig::from_app_config(&map_cfg);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn sentiment_breakdown_defaults_to_zero() {
    let breakdown = SentimentBreakdown::default();
    assert_eq!(breakdown.total, 0);
    assert_eq!(breakdown.positive, 0);
    assert_eq!(breakdown.neutral, 0);
    assert_eq!(breakdown.negative, 0);
}
