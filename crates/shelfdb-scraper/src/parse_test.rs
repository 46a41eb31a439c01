use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::*;

#[test]
fn parse_count_strips_thousand_separators() {
    assert_eq!(parse_count("1,234,567 ratings"), Some(1_234_567));
}

#[test]
fn parse_count_plain_number() {
    assert_eq!(parse_count("42 reviews"), Some(42));
}

#[test]
fn parse_count_no_digits_is_none() {
    assert_eq!(parse_count("no ratings yet"), None);
}

#[test]
fn parse_rating_label_whole_stars() {
    assert_eq!(
        parse_rating_label("Rating 4 out of 5"),
        Some(Decimal::from(4))
    );
}

#[test]
fn parse_rating_label_fractional() {
    assert_eq!(
        parse_rating_label("Rating 4.5 out of 5"),
        Decimal::from_str_exact("4.5").ok()
    );
}

#[test]
fn parse_rating_label_unrelated_text_is_none() {
    assert_eq!(parse_rating_label("five shiny stars"), None);
}

#[test]
fn parse_decimal_trims_whitespace() {
    assert_eq!(parse_decimal(" 4.27 "), Decimal::from_str_exact("4.27").ok());
}

#[test]
fn parse_decimal_garbage_is_none() {
    assert_eq!(parse_decimal("n/a"), None);
}

#[test]
fn parse_long_date_full_month() {
    assert_eq!(
        parse_long_date("January 5, 2024"),
        NaiveDate::from_ymd_opt(2024, 1, 5)
    );
}

#[test]
fn parse_long_date_two_digit_day() {
    assert_eq!(
        parse_long_date("December 25, 2019"),
        NaiveDate::from_ymd_opt(2019, 12, 25)
    );
}

#[test]
fn parse_long_date_unparsable_is_none() {
    assert_eq!(parse_long_date("5 days ago"), None);
}
