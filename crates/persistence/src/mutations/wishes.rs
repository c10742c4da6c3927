// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wish mutations.
//!
//! Wishes are created, edited and deleted only by their owning person; every
//! mutation takes the owner's identity key and refuses to touch another
//! person's record.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::diesel_schema::{persons, wishes};
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Creates a wish for a person and returns its identifier.
///
/// # Errors
///
/// Returns `PersistenceError::PersonNotFound` if the owner does not exist,
/// or an error if the write fails.
pub fn add_wish(
    conn: &mut SqliteConnection,
    person_id: i64,
    wish_text: &str,
    wish_url: Option<&str>,
) -> Result<i64, PersistenceError> {
    let wish_id: i64 = conn.immediate_transaction(|conn| {
        let owner_exists: i64 = persons::table
            .filter(persons::person_id.eq(person_id))
            .count()
            .get_result(conn)?;
        if owner_exists == 0 {
            return Err(PersistenceError::PersonNotFound(person_id));
        }

        diesel::insert_into(wishes::table)
            .values((
                wishes::person_id.eq(person_id),
                wishes::wish_text.eq(wish_text),
                wishes::wish_url.eq(wish_url),
            ))
            .execute(conn)?;

        get_last_insert_rowid(conn)
    })?;

    info!(person_id, wish_id, "Wish added");
    Ok(wish_id)
}

/// Updates a wish owned by the given person.
///
/// # Errors
///
/// Returns `PersistenceError::WishNotFound` if the wish does not exist or
/// belongs to someone else, or an error if the write fails.
pub fn update_wish(
    conn: &mut SqliteConnection,
    wish_id: i64,
    person_id: i64,
    wish_text: &str,
    wish_url: Option<&str>,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(wishes::table)
        .filter(wishes::wish_id.eq(wish_id))
        .filter(wishes::person_id.eq(person_id))
        .set((
            wishes::wish_text.eq(wish_text),
            wishes::wish_url.eq(wish_url),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::WishNotFound { wish_id });
    }

    info!(person_id, wish_id, "Wish updated");
    Ok(())
}

/// Deletes a wish owned by the given person.
///
/// # Errors
///
/// Returns `PersistenceError::WishNotFound` if the wish does not exist or
/// belongs to someone else, or an error if the write fails.
pub fn delete_wish(
    conn: &mut SqliteConnection,
    wish_id: i64,
    person_id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(wishes::table)
        .filter(wishes::wish_id.eq(wish_id))
        .filter(wishes::person_id.eq(person_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::WishNotFound { wish_id });
    }

    info!(person_id, wish_id, "Wish deleted");
    Ok(())
}
