// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field validation rules for free-text workflow input.
//!
//! Each function validates one field kind, returning the normalized value on
//! success. Validation failure is expected control flow: the workflow engine
//! re-prompts the same step and the error never propagates further.

use crate::error::DomainError;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

/// Minimum length of a name field, in characters.
pub const MIN_NAME_LENGTH: usize = 2;
/// Maximum length of a name field, in characters.
pub const MAX_NAME_LENGTH: usize = 50;
/// Minimum length of a wish description, in characters.
pub const MIN_WISH_LENGTH: usize = 3;
/// Maximum length of a wish description, in characters.
pub const MAX_WISH_LENGTH: usize = 500;
/// Maximum length of a wish URL, in characters.
pub const MAX_URL_LENGTH: usize = 2000;
/// Minimum length of a bank label, in characters.
pub const MIN_BANK_LENGTH: usize = 2;
/// Maximum length of a bank label, in characters.
pub const MAX_BANK_LENGTH: usize = 100;

/// Input format for birth dates: day.month.year, zero padded.
const BIRTH_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day].[month].[year]");

/// Validates a name field (family name, given name, patronymic).
///
/// A valid name consists solely of alphabetic characters (Cyrillic and Latin
/// both qualify) and is 2–50 characters long. The returned value is
/// normalized to title case: first character uppercased, remainder lowercased.
///
/// # Arguments
///
/// * `raw` - The free-text input to validate
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the input contains non-alphabetic
/// characters or is outside the length bounds.
pub fn validate_name(raw: &str) -> Result<String, DomainError> {
    let trimmed: &str = raw.trim();
    let length: usize = trimmed.chars().count();

    if length < MIN_NAME_LENGTH || length > MAX_NAME_LENGTH {
        return Err(DomainError::InvalidName(format!(
            "must be between {MIN_NAME_LENGTH} and {MAX_NAME_LENGTH} letters"
        )));
    }
    if !trimmed.chars().all(char::is_alphabetic) {
        return Err(DomainError::InvalidName(String::from(
            "must contain only letters",
        )));
    }

    Ok(title_case(trimmed))
}

/// Parses a birth date in `DD.MM.YYYY` form.
///
/// # Arguments
///
/// * `raw` - The free-text input to parse
///
/// # Errors
///
/// Returns `DomainError::InvalidBirthDate` if the input does not parse as a
/// calendar date in the expected format.
pub fn parse_birth_date(raw: &str) -> Result<Date, DomainError> {
    Date::parse(raw.trim(), BIRTH_DATE_FORMAT)
        .map_err(|_| DomainError::InvalidBirthDate(String::from("expected DD.MM.YYYY")))
}

/// Validates a phone number used for money transfers.
///
/// Separator characters are stripped before matching; the cleaned value must
/// be `+7` followed by ten digits, or `7`/`8` followed by ten digits. The
/// cleaned form is returned.
///
/// # Arguments
///
/// * `raw` - The free-text input to validate
///
/// # Errors
///
/// Returns `DomainError::InvalidPhoneNumber` if the cleaned input does not
/// match either accepted format.
pub fn validate_phone_number(raw: &str) -> Result<String, DomainError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    let valid: bool = cleaned.strip_prefix("+7").map_or_else(
        || {
            (cleaned.starts_with('7') || cleaned.starts_with('8'))
                && cleaned.len() == 11
                && cleaned.chars().all(|c| c.is_ascii_digit())
        },
        |rest| rest.len() == 10 && rest.chars().all(|c| c.is_ascii_digit()),
    );

    if valid {
        Ok(cleaned)
    } else {
        Err(DomainError::InvalidPhoneNumber(String::from(
            "expected +7XXXXXXXXXX or 8XXXXXXXXXX",
        )))
    }
}

/// Validates a bank label (2–100 characters, trimmed).
///
/// # Errors
///
/// Returns `DomainError::InvalidBankName` if the trimmed input is outside
/// the length bounds.
pub fn validate_bank_name(raw: &str) -> Result<String, DomainError> {
    let trimmed: &str = raw.trim();
    let length: usize = trimmed.chars().count();

    if length < MIN_BANK_LENGTH {
        return Err(DomainError::InvalidBankName(String::from("too short")));
    }
    if length > MAX_BANK_LENGTH {
        return Err(DomainError::InvalidBankName(format!(
            "too long (maximum {MAX_BANK_LENGTH} characters)"
        )));
    }

    Ok(trimmed.to_owned())
}

/// Validates a wish description (3–500 characters, trimmed).
///
/// # Errors
///
/// Returns `DomainError::InvalidWishText` if the trimmed input is outside
/// the length bounds.
pub fn validate_wish_text(raw: &str) -> Result<String, DomainError> {
    let trimmed: &str = raw.trim();
    let length: usize = trimmed.chars().count();

    if length < MIN_WISH_LENGTH {
        return Err(DomainError::InvalidWishText(format!(
            "must be at least {MIN_WISH_LENGTH} characters"
        )));
    }
    if length > MAX_WISH_LENGTH {
        return Err(DomainError::InvalidWishText(format!(
            "too long (maximum {MAX_WISH_LENGTH} characters)"
        )));
    }

    Ok(trimmed.to_owned())
}

/// Validates a wish URL.
///
/// The URL must start with `http://` or `https://`, carry a non-empty host
/// containing a dot, and be at most 2000 characters long.
///
/// # Arguments
///
/// * `raw` - The free-text input to validate
///
/// # Errors
///
/// Returns `DomainError::InvalidWishUrl` if any of the checks fail.
pub fn validate_wish_url(raw: &str) -> Result<String, DomainError> {
    let trimmed: &str = raw.trim();

    let host_and_path: &str = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .ok_or_else(|| {
            DomainError::InvalidWishUrl(String::from("must start with http:// or https://"))
        })?;

    let host: &str = host_and_path
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    if host.is_empty() || !host.contains('.') {
        return Err(DomainError::InvalidWishUrl(String::from(
            "host is missing or has no domain",
        )));
    }

    if trimmed.chars().count() > MAX_URL_LENGTH {
        return Err(DomainError::InvalidWishUrl(format!(
            "too long (maximum {MAX_URL_LENGTH} characters)"
        )));
    }

    Ok(trimmed.to_owned())
}

/// Returns the (month, day) calendar key of a date.
#[must_use]
pub fn calendar_day(date: Date) -> (u8, u8) {
    (u8::from(date.month()), date.day())
}

/// Whether `birth_date` falls strictly earlier in the calendar year than
/// `today`, ignoring years.
///
/// A person born earlier in the year than today is "past" until their next
/// anniversary; a December birth date is never past in March.
#[must_use]
pub fn is_calendar_past(birth_date: Date, today: Date) -> bool {
    calendar_day(birth_date) < calendar_day(today)
}

/// Uppercases the first character and lowercases the rest.
fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}
