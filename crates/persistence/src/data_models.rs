// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Diesel row structs and their conversions to domain types.
//!
//! Dates are stored as ISO 8601 text: `YYYY-MM-DD` for birth dates and the
//! full extended form for transfer timestamps.

use diesel::prelude::*;
use gift_fund_domain::{CollectorRecord, Person, Transfer, Wish};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Iso8601;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::diesel_schema::{collectors, persons, transfers, wishes};
use crate::error::PersistenceError;

/// Storage format for birth dates.
pub(crate) const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Formats a `Date` for storage.
pub(crate) fn format_date(date: Date) -> Result<String, PersistenceError> {
    date.format(&DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a stored birth date.
pub(crate) fn parse_date(raw: &str) -> Result<Date, PersistenceError> {
    Date::parse(raw, DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(format!("bad date '{raw}': {e}")))
}

/// Formats a timestamp for storage.
pub(crate) fn format_timestamp(when: OffsetDateTime) -> Result<String, PersistenceError> {
    when.format(&Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a stored timestamp.
pub(crate) fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(raw, &Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::SerializationError(format!("bad timestamp '{raw}': {e}")))
}

/// Diesel Queryable struct for person rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = persons)]
pub(crate) struct PersonRow {
    pub person_id: i64,
    pub handle: Option<String>,
    pub family_name: String,
    pub given_name: String,
    pub patronymic: String,
    pub birth_date: String,
}

impl PersonRow {
    pub(crate) fn into_domain(self) -> Result<Person, PersistenceError> {
        Ok(Person {
            person_id: self.person_id,
            handle: self.handle,
            family_name: self.family_name,
            given_name: self.given_name,
            patronymic: self.patronymic,
            birth_date: parse_date(&self.birth_date)?,
        })
    }
}

/// Diesel Queryable struct for wish rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = wishes)]
pub(crate) struct WishRow {
    pub wish_id: i64,
    pub person_id: i64,
    pub wish_text: String,
    pub wish_url: Option<String>,
}

impl WishRow {
    pub(crate) fn into_domain(self) -> Wish {
        Wish {
            wish_id: Some(self.wish_id),
            person_id: self.person_id,
            wish_text: self.wish_text,
            wish_url: self.wish_url,
        }
    }
}

/// Diesel Queryable struct for transfer rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = transfers)]
pub(crate) struct TransferRow {
    pub transfer_id: i64,
    pub sender_id: i64,
    pub honoree_id: i64,
    pub recorded_at: String,
}

impl TransferRow {
    pub(crate) fn into_domain(self) -> Result<Transfer, PersistenceError> {
        Ok(Transfer {
            transfer_id: Some(self.transfer_id),
            sender_id: self.sender_id,
            honoree_id: self.honoree_id,
            recorded_at: parse_timestamp(&self.recorded_at)?,
        })
    }
}

/// Diesel Queryable struct for collector rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = collectors)]
pub(crate) struct CollectorRow {
    pub collector_id: i64,
    pub person_id: i64,
    pub phone_number: String,
    pub bank_name: Option<String>,
    pub is_active: i32,
}

impl CollectorRow {
    pub(crate) fn into_domain(self) -> CollectorRecord {
        CollectorRecord {
            collector_id: Some(self.collector_id),
            person_id: self.person_id,
            phone_number: self.phone_number,
            bank_name: self.bank_name,
            is_active: self.is_active != 0,
        }
    }
}
