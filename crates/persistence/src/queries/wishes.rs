// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wish queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use gift_fund_domain::Wish;

use crate::data_models::WishRow;
use crate::diesel_schema::wishes;
use crate::error::PersistenceError;

/// Retrieves a wish by identifier.
///
/// # Errors
///
/// Returns `PersistenceError::WishNotFound` if no such wish exists, or an
/// error if the query fails.
pub fn get_wish(conn: &mut SqliteConnection, wish_id: i64) -> Result<Wish, PersistenceError> {
    let row: Option<WishRow> = wishes::table
        .filter(wishes::wish_id.eq(wish_id))
        .select(WishRow::as_select())
        .first(conn)
        .optional()?;

    row.map(WishRow::into_domain)
        .ok_or(PersistenceError::WishNotFound { wish_id })
}

/// Retrieves all wishes owned by a person, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn wishes_for_person(
    conn: &mut SqliteConnection,
    person_id: i64,
) -> Result<Vec<Wish>, PersistenceError> {
    let rows: Vec<WishRow> = wishes::table
        .filter(wishes::person_id.eq(person_id))
        .order(wishes::wish_id.asc())
        .select(WishRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(WishRow::into_domain).collect())
}
