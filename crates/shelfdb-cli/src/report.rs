//! Sentiment breakdown report for one book.

use anyhow::bail;
use serde::Serialize;
use sqlx::PgPool;

use shelfdb_db::SentimentBreakdown;

#[derive(Debug, Serialize)]
struct BookReport {
    book_id: i64,
    title: String,
    author: Option<String>,
    average_rating: Option<String>,
    total_reviews: i64,
    positive: i64,
    neutral: i64,
    negative: i64,
    positive_percent: f64,
    neutral_percent: f64,
    negative_percent: f64,
}

/// Prints a book's sentiment breakdown, human-readable or as JSON.
///
/// # Errors
///
/// Returns an error when the book does not exist or a query fails.
pub async fn run(pool: &PgPool, book_id: i64, json: bool) -> anyhow::Result<()> {
    let Some(book) = shelfdb_db::get_book_by_id(pool, book_id).await? else {
        bail!("no book with id {book_id}");
    };
    let breakdown = shelfdb_db::sentiment_breakdown(pool, book_id).await?;
    let (positive_percent, neutral_percent, negative_percent) = percentages(&breakdown);

    let report = BookReport {
        book_id: book.id,
        title: book.title,
        author: book.author,
        average_rating: book.average_rating.map(|r| r.to_string()),
        total_reviews: breakdown.total,
        positive: breakdown.positive,
        neutral: breakdown.neutral,
        negative: breakdown.negative,
        positive_percent,
        neutral_percent,
        negative_percent,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} by {}",
            report.title,
            report.author.as_deref().unwrap_or("unknown author")
        );
        if let Some(rating) = &report.average_rating {
            println!("average rating: {rating}");
        }
        println!("reviews: {}", report.total_reviews);
        println!(
            "  positive: {:>5} ({:.1}%)",
            report.positive, report.positive_percent
        );
        println!(
            "  neutral:  {:>5} ({:.1}%)",
            report.neutral, report.neutral_percent
        );
        println!(
            "  negative: {:>5} ({:.1}%)",
            report.negative, report.negative_percent
        );
    }

    Ok(())
}

/// Per-label percentages; all zero when the book has no reviews.
fn percentages(breakdown: &SentimentBreakdown) -> (f64, f64, f64) {
    if breakdown.total == 0 {
        return (0.0, 0.0, 0.0);
    }
    #[allow(clippy::cast_precision_loss)] // review counts are far below 2^52
    let pct = |count: i64| (count as f64 / breakdown.total as f64) * 100.0;
    (
        pct(breakdown.positive),
        pct(breakdown.neutral),
        pct(breakdown.negative),
    )
}
