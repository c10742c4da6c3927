// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin grant and service-user mutations.

use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::SqliteConnection;
use tracing::info;

use crate::diesel_schema::{admin_grants, service_user};
use crate::error::PersistenceError;

/// Grants admin privilege to a person.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateAdminGrant` if the person is already
/// an admin, or an error if the write fails.
pub fn add_admin_grant(
    conn: &mut SqliteConnection,
    person_id: i64,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        let existing: i64 = admin_grants::table
            .filter(admin_grants::person_id.eq(person_id))
            .count()
            .get_result(conn)?;
        if existing > 0 {
            return Err(PersistenceError::DuplicateAdminGrant(person_id));
        }

        diesel::insert_into(admin_grants::table)
            .values(admin_grants::person_id.eq(person_id))
            .execute(conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    PersistenceError::DuplicateAdminGrant(person_id)
                }
                other => other.into(),
            })?;

        Ok(())
    })?;

    info!(person_id, "Admin grant added");
    Ok(())
}

/// Revokes a person's admin privilege.
///
/// # Errors
///
/// Returns `PersistenceError::AdminGrantNotFound` if the person holds no
/// grant, or an error if the write fails.
pub fn delete_admin_grant(
    conn: &mut SqliteConnection,
    person_id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(admin_grants::table)
        .filter(admin_grants::person_id.eq(person_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::AdminGrantNotFound(person_id));
    }

    info!(person_id, "Admin grant deleted");
    Ok(())
}

/// Designates the service user, overwriting any previous designation.
///
/// The record is a singleton: zero or one row exists at any time.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn set_service_user(
    conn: &mut SqliteConnection,
    person_id: i64,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        let updated: usize = diesel::update(service_user::table)
            .set(service_user::person_id.eq(person_id))
            .execute(conn)?;

        if updated == 0 {
            diesel::insert_into(service_user::table)
                .values(service_user::person_id.eq(person_id))
                .execute(conn)?;
        }

        Ok::<(), PersistenceError>(())
    })?;

    info!(person_id, "Service user set");
    Ok(())
}

/// Seeds the service-user designation at startup if none exists.
///
/// Returns whether a row was written.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn seed_service_user(
    conn: &mut SqliteConnection,
    person_id: i64,
) -> Result<bool, PersistenceError> {
    let seeded: bool = conn.immediate_transaction(|conn| -> Result<bool, PersistenceError> {
        let existing: i64 = service_user::table.count().get_result(conn)?;
        if existing > 0 {
            return Ok(false);
        }

        diesel::insert_into(service_user::table)
            .values(service_user::person_id.eq(person_id))
            .execute(conn)?;
        Ok(true)
    })?;

    if seeded {
        info!(person_id, "Service user seeded from configuration");
    }
    Ok(seeded)
}
