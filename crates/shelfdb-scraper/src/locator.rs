//! Remote locator: resolve an ambiguous (title, author) query to the
//! catalog's external identifier.
//!
//! Fetches the search-results page, scores every candidate row against the
//! normalized query, and returns the best match. `Ok(None)` means the
//! search ran but nothing matched; `Err` means the search itself failed.
//! Callers treat both as "not found" — the distinction exists for logging.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};

use shelfdb_core::normalize::{normalize_author, normalize_title};

use crate::client::CatalogClient;
use crate::error::ScraperError;
use crate::selectors;

/// Title substrings that mark derivative works (study guides, summaries),
/// never the target book. Checked case-insensitively.
const DISQUALIFYING_SUBSTRINGS: &[&str] = &["study guide", "summary"];

const EXACT_MATCH_SCORE: i32 = 10;
const SUBSTRING_MATCH_SCORE: i32 = 5;

fn external_id_in_href() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/book/show/(\d+)").expect("valid book href regex"))
}

/// One row parsed from the search-results table.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub external_id: String,
    pub title: String,
    pub author: String,
}

/// Finds the external id best matching (title, author), or `Ok(None)` when
/// no candidate scores above zero.
///
/// # Errors
///
/// Returns [`ScraperError`] when the search page cannot be fetched. The
/// orchestrator logs this and proceeds as not-found; it is never fatal to a
/// batch.
pub async fn locate(
    client: &CatalogClient,
    title: &str,
    author: Option<&str>,
) -> Result<Option<String>, ScraperError> {
    let query = match author {
        Some(author) => format!("{title} {author}"),
        None => title.to_owned(),
    };
    let url = client.search_url(&query)?;
    tracing::debug!(%query, "searching remote catalog");

    let html = client.fetch_html(&url).await?;
    let candidates = parse_search_results(&html);
    if candidates.is_empty() {
        tracing::info!(%query, "search returned no usable candidate rows");
        return Ok(None);
    }

    Ok(pick_best(&candidates, title, author))
}

/// Parses candidate rows out of the search-results table. Rows without a
/// title link or a recognizable external id in the href are skipped;
/// derivative works are filtered here so they can never win on score.
pub(crate) fn parse_search_results(html: &str) -> Vec<Candidate> {
    let document = Html::parse_document(html);
    let row_sel = Selector::parse(selectors::SEARCH_RESULT_ROWS).expect("valid row selector");
    let title_sel = Selector::parse(selectors::SEARCH_TITLE_LINK).expect("valid title selector");
    let author_sel = Selector::parse(selectors::SEARCH_AUTHOR_LINK).expect("valid author selector");

    let mut candidates = Vec::new();
    for row in document.select(&row_sel) {
        let Some(link) = row.select(&title_sel).next() else {
            continue;
        };
        let title = collect_text(&link);
        let lowered = title.to_lowercase();
        if DISQUALIFYING_SUBSTRINGS.iter().any(|s| lowered.contains(s)) {
            continue;
        }

        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(external_id) = external_id_in_href()
            .captures(href)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_owned())
        else {
            continue;
        };

        let author = row
            .select(&author_sel)
            .next()
            .map(|a| collect_text(&a))
            .unwrap_or_default();

        candidates.push(Candidate {
            external_id,
            title,
            author,
        });
    }
    candidates
}

/// Scores every candidate and returns the id of the strictly-best one, or
/// `None` when nothing scores above zero. Ties keep the first-seen
/// candidate.
pub(crate) fn pick_best(
    candidates: &[Candidate],
    title: &str,
    author: Option<&str>,
) -> Option<String> {
    let target_title = normalize_title(title);
    let target_author = author.map(|a| normalize_author(Some(a))).filter(|a| !a.is_empty());

    let mut best: Option<(&Candidate, i32)> = None;
    for candidate in candidates {
        let score = score_candidate(candidate, &target_title, target_author.as_deref());
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }

    match best {
        Some((candidate, score)) if score > 0 => {
            tracing::info!(
                external_id = %candidate.external_id,
                score,
                "best search match selected"
            );
            Some(candidate.external_id.clone())
        }
        _ => {
            tracing::info!("no search candidate scored above zero");
            None
        }
    }
}

/// Match quality against the normalized query: exact title/author equality
/// outranks substring containment; the two axes are additive.
fn score_candidate(candidate: &Candidate, target_title: &str, target_author: Option<&str>) -> i32 {
    let candidate_title = normalize_title(&candidate.title);
    let candidate_author = normalize_author(Some(candidate.author.as_str()));

    let mut score = 0;
    if candidate_title == target_title {
        score += EXACT_MATCH_SCORE;
    } else if candidate_title.contains(target_title) {
        score += SUBSTRING_MATCH_SCORE;
    }

    if let Some(target_author) = target_author {
        if candidate_author == target_author {
            score += EXACT_MATCH_SCORE;
        } else if candidate_author.contains(target_author) {
            score += SUBSTRING_MATCH_SCORE;
        }
    }

    score
}

/// Joins an element's text nodes and trims the result.
pub(crate) fn collect_text(element: &scraper::ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
#[path = "locator_test.rs"]
mod tests;
