use super::*;

fn client() -> CatalogClient {
    CatalogClient::new(15, "test-agent").unwrap()
}

#[test]
fn search_url_encodes_query() {
    let url = client().search_url("Dune Frank Herbert").unwrap();
    assert_eq!(
        url,
        "https://www.goodreads.com/search?q=Dune+Frank+Herbert"
    );
}

#[test]
fn search_url_encodes_reserved_characters() {
    let url = client().search_url("R&D: a history").unwrap();
    assert!(url.contains("R%26D"), "got: {url}");
}

#[test]
fn book_url_embeds_external_id() {
    assert_eq!(
        client().book_url("12345"),
        "https://www.goodreads.com/book/show/12345"
    );
}

#[test]
fn reviews_url_embeds_external_id() {
    assert_eq!(
        client().reviews_url("12345"),
        "https://www.goodreads.com/book/show/12345/reviews"
    );
}

#[test]
fn with_base_url_strips_trailing_slash() {
    let c = CatalogClient::with_base_url(15, "test-agent", "http://127.0.0.1:9999/").unwrap();
    assert_eq!(c.book_url("7"), "http://127.0.0.1:9999/book/show/7");
}
