//! Scoped browser session for the dynamically-rendered review list.
//!
//! chromiumoxide drives a headless Chrome over CDP. A session is acquired
//! once per harvest call and must be released on every path before the call
//! returns; [`harvest_reviews`](crate::harvest_reviews) owns that lifecycle.

use std::time::Duration;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::error::ScraperError;

/// Poll interval for bounded element waits.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Launch options derived from [`shelfdb_core::AppConfig`].
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    /// Explicit Chrome/Chromium binary; when `None`, chromiumoxide probes
    /// the usual install locations.
    pub executable: Option<String>,
}

/// A launched browser plus its CDP event loop.
///
/// The handler task must keep draining events for the connection to stay
/// alive; it is aborted on [`close`](Self::close).
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    /// Launches Chrome and spawns the CDP handler loop.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Session`] when the binary cannot be found or
    /// the browser fails to start — fatal for the book being harvested.
    pub async fn launch(options: &BrowserOptions) -> Result<Self, ScraperError> {
        let mut builder = BrowserConfig::builder();
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &options.executable {
            builder = builder.chrome_executable(executable);
        }
        builder = builder
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--no-sandbox")
            .arg("--disable-gpu");

        let config = builder.build().map_err(ScraperError::session)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScraperError::session(format!("failed to launch browser: {e}")))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self { browser, handler })
    }

    /// Opens a page and navigates it to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Session`] when navigation fails — the page
    /// never loading at all is fatal for this book.
    pub async fn open(&self, url: &str) -> Result<Page, ScraperError> {
        self.browser
            .new_page(url)
            .await
            .map_err(|e| ScraperError::session(format!("failed to open {url}: {e}")))
    }

    /// Shuts the browser down and stops the handler loop. Errors during
    /// shutdown are logged, not propagated — the session is gone either way.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!(error = %e, "browser did not close cleanly");
        }
        self.handler.abort();
    }
}

/// Bounded poll for an element: `true` once `selector` matches, `false`
/// when `timeout` elapses first. Absence is not an error — callers decide
/// what a miss means (fatal for the initial content wait, "no more data"
/// for the load-more control).
pub(crate) async fn wait_for_element(page: &Page, selector: &str, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if page.find_element(selector).await.is_ok() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
