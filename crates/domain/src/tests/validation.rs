// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::validation::{
    calendar_day, is_calendar_past, parse_birth_date, validate_bank_name, validate_name,
    validate_phone_number, validate_wish_text, validate_wish_url,
};
use time::{Date, Month};

fn date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).expect("valid test date")
}

#[test]
fn name_accepts_cyrillic_and_latin() {
    assert_eq!(validate_name("Иванов").expect("valid"), "Иванов");
    assert_eq!(validate_name("smith").expect("valid"), "Smith");
}

#[test]
fn name_is_normalized_to_title_case() {
    assert_eq!(validate_name("пЕТРОВ").expect("valid"), "Петров");
    assert_eq!(validate_name("ANNA").expect("valid"), "Anna");
}

#[test]
fn name_rejects_digits_and_punctuation() {
    assert!(matches!(
        validate_name("Ivan0v"),
        Err(DomainError::InvalidName(_))
    ));
    assert!(matches!(
        validate_name("O'Brien"),
        Err(DomainError::InvalidName(_))
    ));
}

#[test]
fn name_rejects_length_bounds() {
    assert!(validate_name("A").is_err());
    let long: String = "a".repeat(51);
    assert!(validate_name(&long).is_err());
    let max: String = "a".repeat(50);
    assert!(validate_name(&max).is_ok());
}

#[test]
fn birth_date_parses_padded_form() {
    let parsed = parse_birth_date("01.01.2000").expect("valid");
    assert_eq!(parsed, date(2000, Month::January, 1));
}

#[test]
fn birth_date_rejects_malformed_input() {
    assert!(parse_birth_date("2000-01-01").is_err());
    assert!(parse_birth_date("32.01.2000").is_err());
    assert!(parse_birth_date("birthday").is_err());
}

#[test]
fn phone_accepts_both_national_forms() {
    assert_eq!(
        validate_phone_number("+79990001122").expect("valid"),
        "+79990001122"
    );
    assert_eq!(
        validate_phone_number("89990001122").expect("valid"),
        "89990001122"
    );
    assert_eq!(
        validate_phone_number("79990001122").expect("valid"),
        "79990001122"
    );
}

#[test]
fn phone_strips_separators_before_matching() {
    assert_eq!(
        validate_phone_number("+7 (999) 000-11-22").expect("valid"),
        "+79990001122"
    );
}

#[test]
fn phone_rejects_wrong_lengths_and_prefixes() {
    assert!(validate_phone_number("+7999000112").is_err());
    assert!(validate_phone_number("+19990001122").is_err());
    assert!(validate_phone_number("999").is_err());
}

#[test]
fn bank_name_enforces_length_bounds() {
    assert!(validate_bank_name("A").is_err());
    assert_eq!(validate_bank_name("  Sber  ").expect("valid"), "Sber");
    let long: String = "b".repeat(101);
    assert!(validate_bank_name(&long).is_err());
}

#[test]
fn wish_text_enforces_length_bounds() {
    assert!(validate_wish_text("ab").is_err());
    assert_eq!(
        validate_wish_text("  a new bicycle  ").expect("valid"),
        "a new bicycle"
    );
    let long: String = "w".repeat(501);
    assert!(validate_wish_text(&long).is_err());
}

#[test]
fn url_requires_scheme_and_dotted_host() {
    assert!(validate_wish_url("example.com/item").is_err());
    assert!(validate_wish_url("https://localhost/item").is_err());
    assert_eq!(
        validate_wish_url("https://example.com/item?id=1").expect("valid"),
        "https://example.com/item?id=1"
    );
    assert!(validate_wish_url("http://shop.example.com").is_ok());
}

#[test]
fn url_rejects_excessive_length() {
    let long: String = format!("https://example.com/{}", "x".repeat(2000));
    assert!(matches!(
        validate_wish_url(&long),
        Err(DomainError::InvalidWishUrl(_))
    ));
}

#[test]
fn calendar_day_extracts_month_and_day() {
    assert_eq!(calendar_day(date(2000, Month::December, 25)), (12, 25));
}

#[test]
fn calendar_past_is_year_relative() {
    let today = date(2026, Month::March, 10);
    assert!(is_calendar_past(date(1990, Month::January, 5), today));
    assert!(!is_calendar_past(date(1985, Month::December, 25), today));
    assert!(!is_calendar_past(date(1999, Month::March, 15), today));
    assert!(!is_calendar_past(date(1999, Month::March, 10), today));
    assert!(is_calendar_past(date(1999, Month::March, 9), today));
}
