//! Review harvester: drives the dynamically-loaded review list.
//!
//! The reviews page renders an initial batch of cards and a "load more"
//! control that appends further batches in place — no URL pagination. Each
//! pass re-parses the whole page; the session dedup key keeps re-parsed
//! cards from double-counting.

use std::collections::HashSet;
use std::time::Duration;

use chromiumoxide::Page;
use rand::Rng;
use scraper::{Html, Selector};

use shelfdb_core::{AppConfig, ScrapedReview};

use crate::browser::{wait_for_element, BrowserOptions, BrowserSession};
use crate::client::CatalogClient;
use crate::error::ScraperError;
use crate::locator::collect_text;
use crate::parse::{parse_long_date, parse_rating_label};
use crate::selectors;

/// Timing knobs for a harvest session.
#[derive(Debug, Clone)]
pub struct HarvestSettings {
    /// Bounded wait for the first review card; exceeding it is fatal for
    /// this book.
    pub initial_wait_secs: u64,
    /// Bounded wait for the load-more control; exceeding it means the list
    /// is exhausted.
    pub load_more_wait_secs: u64,
    /// Base settle delay around interactive actions, jittered upward.
    pub politeness_delay_ms: u64,
    pub browser: BrowserOptions,
}

impl HarvestSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            initial_wait_secs: config.harvest_initial_wait_secs,
            load_more_wait_secs: config.harvest_load_more_wait_secs,
            politeness_delay_ms: config.harvest_politeness_delay_ms,
            browser: BrowserOptions {
                headless: config.browser_headless,
                executable: config.browser_executable.clone(),
            },
        }
    }
}

/// Harvests up to `target` reviews for an external id (`None` = unbounded,
/// i.e. until the load-more control disappears).
///
/// The browser session is acquired here and released on every path before
/// returning.
///
/// # Errors
///
/// Returns [`ScraperError::Session`] when the browser cannot be launched,
/// the page cannot be opened, or no review card renders within the initial
/// wait. Running out of reviews is not an error.
pub async fn harvest_reviews(
    client: &CatalogClient,
    settings: &HarvestSettings,
    external_id: &str,
    target: Option<usize>,
) -> Result<Vec<ScrapedReview>, ScraperError> {
    let url = client.reviews_url(external_id);
    let session = BrowserSession::launch(&settings.browser).await?;
    let result = harvest_inner(&session, settings, &url, target).await;
    session.close().await;
    result
}

async fn harvest_inner(
    session: &BrowserSession,
    settings: &HarvestSettings,
    url: &str,
    target: Option<usize>,
) -> Result<Vec<ScrapedReview>, ScraperError> {
    let page = session.open(url).await?;

    let initial_wait = Duration::from_secs(settings.initial_wait_secs);
    if !wait_for_element(&page, selectors::REVIEW_CARD, initial_wait).await {
        return Err(ScraperError::session(format!(
            "no review card rendered within {}s at {url}",
            settings.initial_wait_secs
        )));
    }

    let mut seen = HashSet::new();
    let mut collected = Vec::new();
    let mut batch = 0u32;

    loop {
        batch += 1;
        let html = page_content(&page).await?;
        let parsed = parse_review_cards(&html);
        let before = collected.len();
        let target_reached = absorb_batch(parsed, &mut seen, &mut collected, target);
        tracing::debug!(
            batch,
            fresh = collected.len() - before,
            total = collected.len(),
            "parsed review batch"
        );
        if target_reached {
            tracing::info!(total = collected.len(), "review target reached");
            return Ok(collected);
        }

        let load_more_wait = Duration::from_secs(settings.load_more_wait_secs);
        if !wait_for_element(&page, selectors::REVIEW_LOAD_MORE, load_more_wait).await {
            tracing::info!(total = collected.len(), "no load-more control; list exhausted");
            break;
        }
        let Ok(button) = page.find_element(selectors::REVIEW_LOAD_MORE).await else {
            // Control vanished between the wait and the grab; list is done.
            break;
        };

        if let Err(e) = button.scroll_into_view().await {
            tracing::debug!(error = %e, "scroll to load-more failed");
        }
        politeness_delay(settings.politeness_delay_ms).await;

        if let Err(e) = button.click().await {
            // An overlay can intercept the click; settle and retry rather
            // than giving up on the batch.
            tracing::debug!(error = %e, "load-more click failed; retrying after delay");
            politeness_delay(settings.politeness_delay_ms).await;
            continue;
        }

        // Let the appended cards render before re-parsing.
        politeness_delay(settings.politeness_delay_ms).await;
    }

    Ok(collected)
}

async fn page_content(page: &Page) -> Result<String, ScraperError> {
    page.content()
        .await
        .map_err(|e| ScraperError::session(format!("failed to read page content: {e}")))
}

/// Folds one parsed batch into the session's accumulated result, skipping
/// records whose session key was already seen. Returns `true` once
/// `target` is reached — callers stop immediately, even mid-batch.
pub(crate) fn absorb_batch(
    parsed: Vec<ScrapedReview>,
    seen: &mut HashSet<(String, String, String)>,
    collected: &mut Vec<ScrapedReview>,
    target: Option<usize>,
) -> bool {
    for review in parsed {
        let key = review.session_key();
        if !seen.insert(key) {
            continue;
        }
        collected.push(review);
        if let Some(target) = target {
            if collected.len() >= target {
                return true;
            }
        }
    }
    false
}

/// Parses every currently-rendered review card. Pure so it can be tested
/// against fixture HTML without a browser.
pub(crate) fn parse_review_cards(html: &str) -> Vec<ScrapedReview> {
    let document = Html::parse_document(html);
    let card_sel = Selector::parse(selectors::REVIEW_CARD).expect("valid card selector");
    let text_sel = Selector::parse(selectors::REVIEW_TEXT).expect("valid text selector");
    let name_sel = Selector::parse(selectors::REVIEW_NAME_LINK).expect("valid name selector");
    let stars_sel = Selector::parse(selectors::REVIEW_RATING_STARS).expect("valid stars selector");
    let date_sel = Selector::parse(selectors::REVIEW_DATE_LINK).expect("valid date selector");

    let mut reviews = Vec::new();
    for card in document.select(&card_sel) {
        let review_text = card
            .select(&text_sel)
            .next()
            .map(|el| collect_text(&el))
            .unwrap_or_default();

        let reviewer_name = card
            .select(&name_sel)
            .next()
            .map(|el| collect_text(&el))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        let rating = card
            .select(&stars_sel)
            .next()
            .and_then(|el| el.value().attr("aria-label"))
            .and_then(parse_rating_label);

        let review_date = card
            .select(&date_sel)
            .next()
            .map(|el| collect_text(&el))
            .as_deref()
            .and_then(parse_long_date);

        reviews.push(ScrapedReview {
            review_text,
            reviewer_name,
            rating,
            review_date,
        });
    }
    reviews
}

/// Fixed settle delay plus a little jitter so interactions don't land on a
/// metronome.
async fn politeness_delay(base_ms: u64) {
    let jitter = rand::rng().random_range(0..=base_ms / 3);
    tokio::time::sleep(Duration::from_millis(base_ms + jitter)).await;
}

#[cfg(test)]
#[path = "harvester_test.rs"]
mod tests;
