//! Batch orchestrator: drives locator → metadata → merger → harvester →
//! scorer → merger over one or many books.
//!
//! Failure policy per the pipeline contract: in multi-book mode a per-book
//! error is logged and the batch continues; in single-book mode (and for
//! `ingest`) the error surfaces to the caller. Processing is strictly
//! sequential — one book, one page, one request at a time.

use std::fmt;

use anyhow::{bail, Context};
use sqlx::PgPool;

use shelfdb_core::normalize::strip_author_from_title;
use shelfdb_core::{AppConfig, SentimentScorer};
use shelfdb_db::BookRow;
use shelfdb_scraper::{
    fetch_metadata, harvest_reviews, locate, CatalogClient, HarvestSettings,
};
use shelfdb_sentiment::VaderScorer;

/// Everything one scrape invocation needs, built once and passed around.
/// The scorer lives here for the life of the process — constructed
/// explicitly, never ambient.
pub struct ScrapeContext {
    pool: PgPool,
    client: CatalogClient,
    settings: HarvestSettings,
    scorer: VaderScorer,
}

/// Aggregated outcome of a multi-book run. Partial success is expected;
/// the caller decides what to do with the counts.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScrapeTotals {
    pub books: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub reviews_written: u64,
}

impl fmt::Display for ScrapeTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scraped {} of {} books ({} failed), {} new reviews",
            self.succeeded, self.books, self.failed, self.reviews_written
        )
    }
}

/// Maps the CLI review-count argument onto the harvest target: an explicit
/// `0` means unbounded, absence means the configured default.
#[must_use]
pub fn resolve_review_target(cli_value: Option<usize>, config: &AppConfig) -> Option<usize> {
    match cli_value {
        Some(0) => None,
        Some(n) => Some(n),
        None => Some(config.harvest_default_max_reviews),
    }
}

impl ScrapeContext {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(config: &AppConfig, pool: PgPool) -> anyhow::Result<Self> {
        let client = CatalogClient::new(config.request_timeout_secs, &config.user_agent)
            .context("failed to build catalog HTTP client")?;
        Ok(Self {
            pool,
            client,
            settings: HarvestSettings::from_app_config(config),
            scorer: VaderScorer::new(),
        })
    }

    /// Full pipeline for one already-known external id: metadata → book
    /// merge → harvest → sentiment → review merge.
    ///
    /// # Errors
    ///
    /// Returns an error when metadata cannot be fetched or parsed into a
    /// titled record, or when the harvest session fails. Review
    /// persistence failures are absorbed by the merger and reported as
    /// zero rows written.
    pub async fn scrape_external_id(
        &self,
        external_id: &str,
        target: Option<usize>,
    ) -> anyhow::Result<BookRow> {
        let metadata = fetch_metadata(&self.client, external_id)
            .await
            .with_context(|| format!("failed to fetch metadata for {external_id}"))?;
        if metadata.title.is_none() {
            bail!("record page for {external_id} yielded no title");
        }

        let book = shelfdb_db::create_or_update_book(&self.pool, &metadata, "goodreads")
            .await
            .context("failed to persist book metadata")?;

        let reviews = harvest_reviews(&self.client, &self.settings, external_id, target)
            .await
            .with_context(|| format!("review harvest failed for {external_id}"))?;
        tracing::info!(
            book_id = book.id,
            harvested = reviews.len(),
            scorer = self.scorer.name(),
            "harvest complete"
        );

        let written = shelfdb_db::save_reviews(&self.pool, &self.scorer, &book, &reviews).await;
        tracing::info!(book_id = book.id, written, "scrape finished");

        Ok(book)
    }

    /// Re-scrapes every persisted book that carries an external id,
    /// isolating per-book failures.
    ///
    /// # Errors
    ///
    /// Returns an error only when the work list itself cannot be loaded —
    /// individual book failures are counted, not propagated.
    pub async fn scrape_all(&self, target: Option<usize>) -> anyhow::Result<ScrapeTotals> {
        let books = shelfdb_db::list_books_with_external_id(&self.pool)
            .await
            .context("failed to list books for batch scrape")?;
        if books.is_empty() {
            tracing::warn!("no books with an external id to scrape");
            return Ok(ScrapeTotals::default());
        }

        let mut totals = ScrapeTotals {
            books: books.len(),
            ..ScrapeTotals::default()
        };

        for book in &books {
            // list_books_with_external_id guarantees the id is present.
            let Some(external_id) = book.external_id.as_deref() else {
                continue;
            };
            tracing::info!(book_id = book.id, title = %book.title, "scraping book");

            let before = shelfdb_db::count_reviews_for_book(&self.pool, book.id)
                .await
                .unwrap_or(0);
            match self.scrape_external_id(external_id, target).await {
                Ok(_) => {
                    totals.succeeded += 1;
                    let after = shelfdb_db::count_reviews_for_book(&self.pool, book.id)
                        .await
                        .unwrap_or(before);
                    totals.reviews_written += u64::try_from(after - before).unwrap_or(0);
                }
                Err(e) => {
                    // Per-book isolation: report and move on.
                    tracing::error!(
                        book_id = book.id,
                        title = %book.title,
                        error = %format!("{e:#}"),
                        "book scrape failed; continuing with next book"
                    );
                    totals.failed += 1;
                }
            }
        }

        Ok(totals)
    }

    /// The presentation-layer entry point: resolve a user-typed
    /// (title, author) to an external id, then run the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty title, when no remote record matches,
    /// or when the single-book pipeline fails.
    pub async fn ingest_by_title(
        &self,
        title: &str,
        author: Option<&str>,
        target: Option<usize>,
    ) -> anyhow::Result<BookRow> {
        let title = strip_author_from_title(title, author);
        if title.is_empty() {
            bail!("a book title is required");
        }

        // The locator fails soft: a search error is logged and treated the
        // same as no match.
        let located = match locate(&self.client, &title, author).await {
            Ok(located) => located,
            Err(e) => {
                tracing::error!(error = %e, %title, "catalog search failed; treating as no match");
                None
            }
        };
        let Some(external_id) = located else {
            bail!("no catalog record found for \"{title}\"");
        };

        self.scrape_external_id(&external_id, target).await
    }
}

#[cfg(test)]
#[path = "scrape_test.rs"]
mod tests;
