// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transfer ledger mutations.
//!
//! The ledger is idempotent by (sender, honoree) pair: recording the same
//! contribution twice stores exactly one row and reports the repeat as
//! already recorded. The unique index on the pair is the authoritative race
//! guard; the in-transaction existence check exists to produce the friendly
//! outcome instead of a constraint error.

use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::SqliteConnection;
use time::{Date, OffsetDateTime};
use tracing::{info, warn};

use crate::data_models::format_timestamp;
use crate::diesel_schema::{persons, transfers};
use crate::error::PersistenceError;
use crate::queries::persons::persons_with_past_birthday;
use crate::queries::transfers::transfer_exists;

/// The result of an idempotent transfer recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// A new row was stored.
    Recorded,
    /// The (sender, honoree) pair already had a row; nothing was written.
    AlreadyRecorded,
}

/// Records a gift contribution, once per (sender, honoree) pair.
///
/// Both persons must exist. The existence check and the insert run inside
/// one immediate transaction; a unique-constraint violation from a racing
/// duplicate maps to `AlreadyRecorded` rather than an error.
///
/// # Errors
///
/// Returns `PersistenceError::PersonNotFound` if either person is missing,
/// or an error if the write fails.
pub fn record_transfer(
    conn: &mut SqliteConnection,
    sender_id: i64,
    honoree_id: i64,
    recorded_at: OffsetDateTime,
) -> Result<TransferOutcome, PersistenceError> {
    let timestamp: String = format_timestamp(recorded_at)?;

    let outcome: TransferOutcome = conn.immediate_transaction(|conn| {
        for person_id in [sender_id, honoree_id] {
            let exists: i64 = persons::table
                .filter(persons::person_id.eq(person_id))
                .count()
                .get_result(conn)?;
            if exists == 0 {
                return Err(PersistenceError::PersonNotFound(person_id));
            }
        }

        if transfer_exists(conn, sender_id, honoree_id)? {
            return Ok(TransferOutcome::AlreadyRecorded);
        }

        let inserted = diesel::insert_into(transfers::table)
            .values((
                transfers::sender_id.eq(sender_id),
                transfers::honoree_id.eq(honoree_id),
                transfers::recorded_at.eq(&timestamp),
            ))
            .execute(conn);

        match inserted {
            Ok(_) => Ok(TransferOutcome::Recorded),
            Err(diesel::result::Error::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                _,
            )) => Ok(TransferOutcome::AlreadyRecorded),
            Err(other) => Err(other.into()),
        }
    })?;

    match outcome {
        TransferOutcome::Recorded => {
            info!(sender_id, honoree_id, "Transfer recorded");
        }
        TransferOutcome::AlreadyRecorded => {
            warn!(sender_id, honoree_id, "Transfer already recorded");
        }
    }

    Ok(outcome)
}

/// Deletes every transfer whose honoree's birthday has already passed this
/// calendar year.
///
/// The comparison is year-relative: a person whose (month, day) is strictly
/// earlier than today's is past; a December birthday is not past in March.
/// Returns the number of deleted rows. This run is destructive and intended
/// to fire once daily.
///
/// # Errors
///
/// Returns an error if the query or delete fails.
pub fn purge_past_transfers(
    conn: &mut SqliteConnection,
    today: Date,
) -> Result<usize, PersistenceError> {
    let deleted: usize = conn.immediate_transaction(|conn| -> Result<usize, PersistenceError> {
        let past_ids: Vec<i64> = persons_with_past_birthday(conn, today)?
            .into_iter()
            .map(|person| person.person_id)
            .collect();

        if past_ids.is_empty() {
            return Ok(0);
        }

        Ok(diesel::delete(transfers::table)
            .filter(transfers::honoree_id.eq_any(&past_ids))
            .execute(conn)?)
    })?;

    info!(deleted, "Purged past-birthday transfer records");
    Ok(deleted)
}
