//! Metadata fetcher: the canonical book record page.
//!
//! Field extraction is tolerant by contract — any individual element may be
//! missing from the page and the record still comes back with that field
//! `None`. Only the fetch itself (network failure, non-success status) is
//! an error.

use scraper::{Html, Selector};

use shelfdb_core::ScrapedBook;

use crate::client::CatalogClient;
use crate::error::ScraperError;
use crate::locator::collect_text;
use crate::parse::{parse_count, parse_decimal};
use crate::selectors;

/// Fetches and parses the record page for an external id.
///
/// # Errors
///
/// Returns [`ScraperError::Http`] / [`ScraperError::UnexpectedStatus`] when
/// the page cannot be retrieved. Parse misses are not errors.
pub async fn fetch_metadata(
    client: &CatalogClient,
    external_id: &str,
) -> Result<ScrapedBook, ScraperError> {
    let url = client.book_url(external_id);
    tracing::debug!(%url, "fetching book metadata");
    let html = client.fetch_html(&url).await?;
    Ok(parse_book_page(&html, external_id, &url))
}

/// Parses whatever the record page yields into a [`ScrapedBook`].
pub(crate) fn parse_book_page(html: &str, external_id: &str, url: &str) -> ScrapedBook {
    let document = Html::parse_document(html);
    let mut book = ScrapedBook::new(external_id, Some(url.to_owned()));

    book.title = select_text(&document, selectors::BOOK_TITLE);

    // Two alternate page layouts carry the author in different places;
    // first match wins.
    book.author = select_text(&document, selectors::BOOK_AUTHOR)
        .or_else(|| select_text(&document, selectors::BOOK_AUTHOR_FALLBACK));

    book.average_rating = select_text(&document, selectors::BOOK_AVERAGE_RATING)
        .as_deref()
        .and_then(parse_decimal);

    // Ratings/reviews counts live in a labeled statistics block; the
    // numbers carry thousand separators.
    let stats_sel = Selector::parse(selectors::BOOK_STATS_META).expect("valid stats selector");
    if let Some(stats) = document.select(&stats_sel).next() {
        let ratings_sel =
            Selector::parse(selectors::BOOK_RATINGS_COUNT).expect("valid ratings selector");
        book.num_ratings = stats
            .select(&ratings_sel)
            .next()
            .and_then(|el| parse_count(&collect_text(&el)));

        let reviews_sel =
            Selector::parse(selectors::BOOK_REVIEWS_COUNT).expect("valid reviews selector");
        book.num_reviews = stats
            .select(&reviews_sel)
            .next()
            .and_then(|el| parse_count(&collect_text(&el)));
    }

    let cover_sel = Selector::parse(selectors::BOOK_COVER_IMAGE).expect("valid cover selector");
    book.cover_image_url = document
        .select(&cover_sel)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_owned);

    book.description = select_text(&document, selectors::BOOK_DESCRIPTION);

    if book.title.is_none() {
        tracing::warn!(external_id, "record page parsed without a title");
    }

    book
}

/// First match's trimmed text for a selector, `None` when absent or empty.
fn select_text(document: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).expect("valid selector");
    document
        .select(&sel)
        .next()
        .map(|el| collect_text(&el))
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
#[path = "metadata_test.rs"]
mod tests;
