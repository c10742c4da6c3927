// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collector record queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use gift_fund_domain::CollectorRecord;

use crate::data_models::CollectorRow;
use crate::diesel_schema::collectors;
use crate::error::PersistenceError;

/// Retrieves the collector record for a person, returning `None` when
/// absent.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_collector(
    conn: &mut SqliteConnection,
    person_id: i64,
) -> Result<Option<CollectorRecord>, PersistenceError> {
    let row: Option<CollectorRow> = collectors::table
        .filter(collectors::person_id.eq(person_id))
        .select(CollectorRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(CollectorRow::into_domain))
}

/// Retrieves the collector record for a person.
///
/// # Errors
///
/// Returns `PersistenceError::CollectorNotFound` if no record exists, or an
/// error if the query fails.
pub fn get_collector(
    conn: &mut SqliteConnection,
    person_id: i64,
) -> Result<CollectorRecord, PersistenceError> {
    find_collector(conn, person_id)?.ok_or(PersistenceError::CollectorNotFound(person_id))
}

/// Retrieves all collector records.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn all_collectors(
    conn: &mut SqliteConnection,
) -> Result<Vec<CollectorRecord>, PersistenceError> {
    let rows: Vec<CollectorRow> = collectors::table
        .order(collectors::person_id.asc())
        .select(CollectorRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(CollectorRow::into_domain).collect())
}

/// Retrieves the currently active collector, if one is set.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn active_collector(
    conn: &mut SqliteConnection,
) -> Result<Option<CollectorRecord>, PersistenceError> {
    let row: Option<CollectorRow> = collectors::table
        .filter(collectors::is_active.eq(1))
        .select(CollectorRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(CollectorRow::into_domain))
}

/// Counts collector records with the active flag set.
///
/// Used as the post-commit monitoring assertion for the single-active
/// invariant.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_active_collectors(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(collectors::table
        .filter(collectors::is_active.eq(1))
        .count()
        .get_result(conn)?)
}
