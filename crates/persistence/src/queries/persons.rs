// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Person queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use gift_fund_domain::{calendar_day, Person};
use time::Date;
use tracing::debug;

use crate::data_models::PersonRow;
use crate::diesel_schema::persons;
use crate::error::PersistenceError;

/// Retrieves a person by identity key.
///
/// # Errors
///
/// Returns `PersistenceError::PersonNotFound` if no such person exists, or
/// an error if the query fails.
pub fn get_person(conn: &mut SqliteConnection, person_id: i64) -> Result<Person, PersistenceError> {
    find_person(conn, person_id)?.ok_or(PersistenceError::PersonNotFound(person_id))
}

/// Retrieves a person by identity key, returning `None` when absent.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_person(
    conn: &mut SqliteConnection,
    person_id: i64,
) -> Result<Option<Person>, PersistenceError> {
    let row: Option<PersonRow> = persons::table
        .filter(persons::person_id.eq(person_id))
        .select(PersonRow::as_select())
        .first(conn)
        .optional()?;

    row.map(PersonRow::into_domain).transpose()
}

/// Retrieves all persons, ordered by family name then given name.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn all_persons(conn: &mut SqliteConnection) -> Result<Vec<Person>, PersistenceError> {
    let rows: Vec<PersonRow> = persons::table
        .order((persons::family_name.asc(), persons::given_name.asc()))
        .select(PersonRow::as_select())
        .load(conn)?;

    debug!("Loaded {} persons", rows.len());
    rows.into_iter().map(PersonRow::into_domain).collect()
}

/// Retrieves all persons whose birth month and day match the given values.
///
/// The comparison ignores the birth year entirely.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn persons_with_birthday(
    conn: &mut SqliteConnection,
    month: u8,
    day: u8,
) -> Result<Vec<Person>, PersistenceError> {
    let all: Vec<Person> = all_persons(conn)?;
    Ok(all
        .into_iter()
        .filter(|person| calendar_day(person.birth_date) == (month, day))
        .collect())
}

/// Retrieves all persons whose birth month/day is strictly earlier in the
/// calendar year than `today`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn persons_with_past_birthday(
    conn: &mut SqliteConnection,
    today: Date,
) -> Result<Vec<Person>, PersistenceError> {
    let all: Vec<Person> = all_persons(conn)?;
    Ok(all
        .into_iter()
        .filter(|person| gift_fund_domain::is_calendar_past(person.birth_date, today))
        .collect())
}
