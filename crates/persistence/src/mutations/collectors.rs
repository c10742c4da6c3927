// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collector record mutations, including the single-active invariant
//! manager.
//!
//! At most one collector record system-wide may carry the active flag. The
//! partial unique index on `is_active = 1` is the authoritative guard: a
//! racing double-activation fails its transaction instead of committing a
//! second active row. The post-commit count in [`set_active_collector`] is a
//! monitoring assertion only — if it ever fires, a race slipped past the
//! storage guard and must be surfaced, not silently repaired.

use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::SqliteConnection;
use gift_fund_domain::CollectorRecord;
use tracing::{error, info};

use crate::diesel_schema::collectors;
use crate::error::PersistenceError;
use crate::queries::collectors::{count_active_collectors, find_collector, get_collector};

/// Creates an inactive collector record for a person.
///
/// Activation is a separate, admin-driven step through
/// [`set_active_collector`].
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateCollector` if the person already has
/// a record, or an error if the write fails.
pub fn create_collector(
    conn: &mut SqliteConnection,
    person_id: i64,
    phone_number: &str,
    bank_name: Option<&str>,
) -> Result<CollectorRecord, PersistenceError> {
    let record: CollectorRecord = conn.immediate_transaction(|conn| {
        if find_collector(conn, person_id)?.is_some() {
            return Err(PersistenceError::DuplicateCollector(person_id));
        }

        diesel::insert_into(collectors::table)
            .values((
                collectors::person_id.eq(person_id),
                collectors::phone_number.eq(phone_number),
                collectors::bank_name.eq(bank_name),
                collectors::is_active.eq(0),
            ))
            .execute(conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    PersistenceError::DuplicateCollector(person_id)
                }
                other => other.into(),
            })?;

        get_collector(conn, person_id)
    })?;

    info!(person_id, "Inactive collector record created");
    Ok(record)
}

/// Replaces a collector's payment routing data.
///
/// The stored values mirror the confirmed form exactly: a `None` bank label
/// clears the field.
///
/// # Errors
///
/// Returns `PersistenceError::CollectorNotFound` if no record exists, or an
/// error if the write fails.
pub fn update_collector(
    conn: &mut SqliteConnection,
    person_id: i64,
    phone_number: &str,
    bank_name: Option<&str>,
) -> Result<CollectorRecord, PersistenceError> {
    let record: CollectorRecord = conn.immediate_transaction(|conn| {
        let rows_affected: usize = diesel::update(collectors::table)
            .filter(collectors::person_id.eq(person_id))
            .set((
                collectors::phone_number.eq(phone_number),
                collectors::bank_name.eq(bank_name),
            ))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::CollectorNotFound(person_id));
        }

        get_collector(conn, person_id)
    })?;

    info!(person_id, "Collector record updated");
    Ok(record)
}

/// Activates a collector, deactivating whoever held the role before.
///
/// The deactivate-then-activate pair runs inside one immediate transaction,
/// so concurrent activations serialize; the partial unique index makes any
/// interleaving that would commit two active rows fail outright.
///
/// # Errors
///
/// * `PersistenceError::CollectorNotFound` — the person has no record
/// * `PersistenceError::CollectorUniquenessViolation` — the post-commit
///   count saw more than one active record (critical consistency error)
/// * any underlying database error
pub fn set_active_collector(
    conn: &mut SqliteConnection,
    person_id: i64,
) -> Result<CollectorRecord, PersistenceError> {
    let record: CollectorRecord = conn.immediate_transaction(|conn| {
        if find_collector(conn, person_id)?.is_none() {
            return Err(PersistenceError::CollectorNotFound(person_id));
        }

        let deactivated: usize = diesel::update(collectors::table)
            .filter(collectors::is_active.eq(1))
            .filter(collectors::person_id.ne(person_id))
            .set(collectors::is_active.eq(0))
            .execute(conn)?;
        if deactivated > 0 {
            info!(deactivated, "Deactivated previous collector");
        }

        diesel::update(collectors::table)
            .filter(collectors::person_id.eq(person_id))
            .set(collectors::is_active.eq(1))
            .execute(conn)?;

        get_collector(conn, person_id)
    })?;

    // Monitoring assertion, not the correctness mechanism: the partial
    // unique index already prevents a second active row from committing.
    let active_count: i64 = count_active_collectors(conn)?;
    if active_count > 1 {
        error!(
            active_count,
            "Collector uniqueness violated after activation"
        );
        return Err(PersistenceError::CollectorUniquenessViolation { active_count });
    }

    info!(person_id, "Collector activated");
    Ok(record)
}
