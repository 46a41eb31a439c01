//! Shared domain types and configuration for shelfdb.
//!
//! Holds the pieces every other crate depends on: the env-driven
//! [`AppConfig`], string normalization used for matching and deduplication,
//! the scraped-record shapes handed from the scraper to the catalog merger,
//! and the [`SentimentScorer`] trait implemented by `shelfdb-sentiment`.

pub mod app_config;
pub mod config;
pub mod normalize;
pub mod records;
pub mod sentiment;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use records::{ScrapedBook, ScrapedReview};
pub use sentiment::{Sentiment, SentimentLabel, SentimentScorer};
