//! HTTP client for the catalog's static pages (search results, book record).

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::selectors::DEFAULT_BASE_URL;

/// HTTP client with explicit timeouts and a browser user agent.
///
/// The catalog serves static HTML to plain GET requests for search and book
/// pages; only the review list needs a real browser. Non-success statuses
/// become typed errors so callers can decide whether to degrade.
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Creates a client against the production site.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client against an arbitrary origin. Tests point this at a
    /// local mock server.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches a page and returns its body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] — any non-2xx status.
    /// - [`ScraperError::Http`] — network or timeout failure.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }

    /// Builds the search-results URL for a free-text query.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Parse`] if the configured base URL is not a
    /// valid URL base.
    pub fn search_url(&self, query: &str) -> Result<String, ScraperError> {
        let base = format!("{}/search", self.base_url);
        let mut url = reqwest::Url::parse(&base).map_err(|e| ScraperError::Parse {
            context: "search URL".to_owned(),
            reason: format!("base \"{base}\" is not a valid URL: {e}"),
        })?;
        url.query_pairs_mut().append_pair("q", query);
        Ok(url.to_string())
    }

    /// Canonical record page for an external id.
    #[must_use]
    pub fn book_url(&self, external_id: &str) -> String {
        format!("{}/book/show/{external_id}", self.base_url)
    }

    /// Review list page for an external id.
    #[must_use]
    pub fn reviews_url(&self, external_id: &str) -> String {
        format!("{}/book/show/{external_id}/reviews", self.base_url)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
