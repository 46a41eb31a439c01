//! Low-level text parsing helpers shared by the metadata fetcher and the
//! review harvester.
//!
//! All of these are lenient by design: the site's markup is an external
//! schema and any individual token can be missing or reformatted, so a
//! parse miss yields `None`, never an error.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

fn count_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([\d,]+)").expect("valid count regex"))
}

fn rating_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Rating\s*([\d.]+)\s*out\s*of\s*5").expect("valid rating regex")
    })
}

/// Extracts the first numeric token from a labeled count like
/// `"1,234,567 ratings"`, stripping thousand separators.
#[must_use]
pub fn parse_count(text: &str) -> Option<i32> {
    let token = count_token().captures(text)?.get(1)?.as_str();
    token.replace(',', "").parse::<i32>().ok()
}

/// Parses the star-widget accessibility label, e.g. `"Rating 4.5 out of 5"`.
#[must_use]
pub fn parse_rating_label(label: &str) -> Option<Decimal> {
    let value = rating_label().captures(label)?.get(1)?.as_str();
    Decimal::from_str(value).ok()
}

/// Parses a plain decimal like the record page's average rating (`"4.27"`).
#[must_use]
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text.trim()).ok()
}

/// Parses the localized long date the review list renders,
/// e.g. `"January 5, 2024"`. Unparsable input yields `None`.
#[must_use]
pub fn parse_long_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%B %d, %Y").ok()
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
