//! Scraped-record shapes produced by `shelfdb-scraper` and consumed by the
//! catalog merger.
//!
//! Every metadata field except the external identifier is optional: the
//! remote site's markup may change or omit anything, and extraction never
//! aborts on a single missing element. The merger decides what to do with
//! the holes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Book metadata scraped from the remote catalog's record page.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapedBook {
    /// The remote catalog's unique key for this record.
    pub external_id: String,
    /// Canonical URL of the record page.
    pub external_url: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub average_rating: Option<Decimal>,
    pub num_ratings: Option<i32>,
    pub num_reviews: Option<i32>,
    pub cover_image_url: Option<String>,
    pub description: Option<String>,
}

impl ScrapedBook {
    /// An empty record carrying only the external identity; parse steps
    /// fill in whatever the page actually yields.
    #[must_use]
    pub fn new(external_id: impl Into<String>, external_url: Option<String>) -> Self {
        Self {
            external_id: external_id.into(),
            external_url,
            title: None,
            author: None,
            average_rating: None,
            num_ratings: None,
            num_reviews: None,
            cover_image_url: None,
            description: None,
        }
    }
}

/// One reader review scraped from the dynamically-rendered review list.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapedReview {
    pub review_text: String,
    /// `"Unknown"` when the card carries no reviewer name.
    pub reviewer_name: String,
    pub rating: Option<Decimal>,
    pub review_date: Option<NaiveDate>,
}

impl ScrapedReview {
    /// Session dedup key: (reviewer, date, first 100 chars of text).
    ///
    /// Used only within a single harvest call to drop repeats across
    /// paginated batches; the durable (reviewer, date) key lives at the
    /// persistence layer.
    #[must_use]
    pub fn session_key(&self) -> (String, String, String) {
        let truncated: String = self.review_text.chars().take(100).collect();
        let date = self
            .review_date
            .map(|d| d.to_string())
            .unwrap_or_default();
        (self.reviewer_name.clone(), date, truncated)
    }
}
