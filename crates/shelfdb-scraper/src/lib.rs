//! Scraping surface for the remote book catalog.
//!
//! Three consumers of the same site, split by transport:
//!
//! - [`locator`] — static search-results page, plain HTTP.
//! - [`metadata`] — canonical book record page, plain HTTP.
//! - [`harvester`] — dynamically-rendered review list, driven through a
//!   [`browser::BrowserSession`] because the "load more" control appends
//!   reviews in place with no URL pagination.
//!
//! The site's markup (CSS classes, data-testid attributes) is a versioned
//! external schema; every selector this crate depends on is declared in
//! [`selectors`] so a markup change is a one-module fix.

pub mod browser;
pub mod client;
pub mod error;
pub mod harvester;
pub mod locator;
pub mod metadata;
pub mod parse;
pub mod selectors;

pub use browser::{BrowserOptions, BrowserSession};
pub use client::CatalogClient;
pub use error::ScraperError;
pub use harvester::{harvest_reviews, HarvestSettings};
pub use locator::locate;
pub use metadata::fetch_metadata;
