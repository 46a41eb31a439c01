use rust_decimal::Decimal;

use super::*;

const BOOK_PAGE: &str = r#"
<html><body>
  <h1 class="Text Text__title1">Project Hail Mary</h1>
  <span class="ContributorLink__name">Andy Weir</span>
  <div class="RatingStatistics__rating">4.52</div>
  <div class="RatingStatistics__meta">
    <span data-testid="ratingsCount">1,103,624 ratings</span>
    <span data-testid="reviewsCount">98,412 reviews</span>
  </div>
  <img class="ResponsiveImage" src="https://images.example/phm.jpg" alt="cover"/>
  <div data-testid="description">Ryland Grace is the sole survivor.</div>
</body></html>
"#;

#[test]
fn parse_book_page_extracts_all_fields() {
    let book = parse_book_page(BOOK_PAGE, "54493401", "https://example/book/show/54493401");
    assert_eq!(book.external_id, "54493401");
    assert_eq!(book.title.as_deref(), Some("Project Hail Mary"));
    assert_eq!(book.author.as_deref(), Some("Andy Weir"));
    assert_eq!(book.average_rating, Decimal::from_str_exact("4.52").ok());
    assert_eq!(book.num_ratings, Some(1_103_624));
    assert_eq!(book.num_reviews, Some(98_412));
    assert_eq!(
        book.cover_image_url.as_deref(),
        Some("https://images.example/phm.jpg")
    );
    assert_eq!(
        book.description.as_deref(),
        Some("Ryland Grace is the sole survivor.")
    );
    assert_eq!(
        book.external_url.as_deref(),
        Some("https://example/book/show/54493401")
    );
}

#[test]
fn parse_book_page_author_fallback_layout() {
    let html = r#"
    <html><body>
      <h1 class="Text Text__title1">Older Layout Book</h1>
      <span class="Text Text__title3">by <a href="/author/1">Jane Writer</a></span>
    </body></html>
    "#;
    let book = parse_book_page(html, "1", "https://example/book/show/1");
    assert_eq!(book.author.as_deref(), Some("Jane Writer"));
}

#[test]
fn parse_book_page_missing_fields_become_none() {
    let html = r#"<html><body><h1 class="Text Text__title1">Bare Bones</h1></body></html>"#;
    let book = parse_book_page(html, "2", "https://example/book/show/2");
    assert_eq!(book.title.as_deref(), Some("Bare Bones"));
    assert!(book.author.is_none());
    assert!(book.average_rating.is_none());
    assert!(book.num_ratings.is_none());
    assert!(book.num_reviews.is_none());
    assert!(book.cover_image_url.is_none());
    assert!(book.description.is_none());
}

#[test]
fn parse_book_page_unparsable_rating_is_none() {
    let html = r#"
    <html><body>
      <div class="RatingStatistics__rating">not yet rated</div>
    </body></html>
    "#;
    let book = parse_book_page(html, "3", "https://example/book/show/3");
    assert!(book.average_rating.is_none());
}

#[test]
fn parse_book_page_empty_document() {
    let book = parse_book_page("<html></html>", "4", "https://example/book/show/4");
    assert!(book.title.is_none());
    assert_eq!(book.external_id, "4");
}
