//! The remote catalog's markup contract.
//!
//! CSS class names and `data-testid` attributes observed on the live site.
//! They are not under our control and can silently change; treat this
//! module as a versioned external schema and update it as one unit when the
//! site ships new markup.

/// Production origin of the catalog site.
pub const DEFAULT_BASE_URL: &str = "https://www.goodreads.com";

// --- Search results page (static HTML) ---

/// Rows of the search-results table.
pub const SEARCH_RESULT_ROWS: &str = "table.tableList tr";
/// Title link inside a result row; its href carries the external id.
pub const SEARCH_TITLE_LINK: &str = "a.bookTitle";
/// Author link inside a result row.
pub const SEARCH_AUTHOR_LINK: &str = "a.authorName";

// --- Book record page (static HTML) ---

pub const BOOK_TITLE: &str = "h1.Text__title1";
pub const BOOK_AUTHOR: &str = "span.ContributorLink__name";
/// Fallback author location used by an alternate page layout.
pub const BOOK_AUTHOR_FALLBACK: &str = "span.Text__title3 a";
pub const BOOK_AVERAGE_RATING: &str = "div.RatingStatistics__rating";
/// Labeled statistics block holding ratings/reviews counts.
pub const BOOK_STATS_META: &str = "div.RatingStatistics__meta";
pub const BOOK_RATINGS_COUNT: &str = r#"span[data-testid="ratingsCount"]"#;
pub const BOOK_REVIEWS_COUNT: &str = r#"span[data-testid="reviewsCount"]"#;
pub const BOOK_COVER_IMAGE: &str = "img.ResponsiveImage";
pub const BOOK_DESCRIPTION: &str = r#"div[data-testid="description"]"#;

// --- Reviews page (dynamically rendered) ---

pub const REVIEW_CARD: &str = "article.ReviewCard";
pub const REVIEW_TEXT: &str = r#"div[data-testid="contentContainer"]"#;
pub const REVIEW_NAME_LINK: &str = r#"div[data-testid="name"] a"#;
/// Star widget; the rating value lives in its `aria-label`.
pub const REVIEW_RATING_STARS: &str = "span.RatingStars";
/// Date link; text is a localized long date like `January 5, 2024`.
pub const REVIEW_DATE_LINK: &str = "span.Text__body3 a";
/// The "load more" control appending the next review batch in place.
pub const REVIEW_LOAD_MORE: &str = r#"span[data-testid="loadMore"]"#;
