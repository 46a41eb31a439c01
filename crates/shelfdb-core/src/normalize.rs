//! String normalization for title/author matching and deduplication.
//!
//! All functions here are pure and total: absent input yields an empty
//! string, nothing ever fails. Matching across the locator, the catalog
//! merger, and duplicate cleanup must agree on these exact rules, so they
//! live in one place.

use std::sync::OnceLock;

use regex::Regex;

fn parenthesized() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\(.*\)").expect("valid parenthesized regex"))
}

fn by_connective() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+by\s+").expect("valid connective regex"))
}

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// Normalizes a book title for matching: strips any parenthesized substring
/// (series annotations, edition notes), trims, and lowercases.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    parenthesized()
        .replace_all(title, "")
        .trim()
        .to_lowercase()
}

/// Normalizes an author name for matching.
///
/// Strips parenthesized suffixes like `(Goodreads Author)`, collapses a
/// literal ` by ` connective into a single space, trims, and lowercases.
/// Absent input yields an empty string.
#[must_use]
pub fn normalize_author(author: Option<&str>) -> String {
    let Some(author) = author else {
        return String::new();
    };
    let stripped = parenthesized().replace_all(author, "");
    let collapsed = by_connective().replace_all(&stripped, " ");
    collapsed.trim().to_lowercase()
}

/// Loose normalization: lowercases, strips every character that is neither
/// alphanumeric nor whitespace, and collapses internal whitespace runs.
#[must_use]
pub fn normalize_string(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    whitespace_run().replace_all(&kept, " ").trim().to_string()
}

/// Removes a trailing `by <author>` clause from a user-typed title.
///
/// Users paste titles like `"Dune by Frank Herbert"` into the entry form;
/// the clause would poison both search and matching. When `author` is known
/// the cut happens at `by <author>` specifically, otherwise at the first
/// ` by ` occurrence.
#[must_use]
pub fn strip_author_from_title(title: &str, author: Option<&str>) -> String {
    let lower_title = title.to_lowercase();
    if let Some(author) = author {
        let marker = format!("by {}", author.to_lowercase());
        if let Some(idx) = lower_title.find(&marker) {
            return title[..idx].trim().to_string();
        }
    }
    if let Some(idx) = lower_title.find(" by ") {
        return title[..idx].trim().to_string();
    }
    title.trim().to_string()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
