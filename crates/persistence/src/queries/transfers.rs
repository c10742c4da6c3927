// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transfer ledger queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use gift_fund_domain::Transfer;

use crate::data_models::TransferRow;
use crate::diesel_schema::transfers;
use crate::error::PersistenceError;

/// Whether a transfer already exists for the (sender, honoree) pair.
///
/// Callers that decide based on this must run inside the same transaction
/// as the subsequent write; the unique index remains the authoritative
/// guard either way.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn transfer_exists(
    conn: &mut SqliteConnection,
    sender_id: i64,
    honoree_id: i64,
) -> Result<bool, PersistenceError> {
    let count: i64 = transfers::table
        .filter(transfers::sender_id.eq(sender_id))
        .filter(transfers::honoree_id.eq(honoree_id))
        .count()
        .get_result(conn)?;

    Ok(count > 0)
}

/// Retrieves all transfers recorded for one honoree, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn transfers_for_honoree(
    conn: &mut SqliteConnection,
    honoree_id: i64,
) -> Result<Vec<Transfer>, PersistenceError> {
    let rows: Vec<TransferRow> = transfers::table
        .filter(transfers::honoree_id.eq(honoree_id))
        .order(transfers::recorded_at.desc())
        .select(TransferRow::as_select())
        .load(conn)?;

    rows.into_iter().map(TransferRow::into_domain).collect()
}

/// Retrieves the identity keys of everyone who recorded a transfer for the
/// honoree.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn sender_ids_for_honoree(
    conn: &mut SqliteConnection,
    honoree_id: i64,
) -> Result<Vec<i64>, PersistenceError> {
    Ok(transfers::table
        .filter(transfers::honoree_id.eq(honoree_id))
        .select(transfers::sender_id)
        .load(conn)?)
}

/// Retrieves the full ledger, grouped by honoree, newest first within each
/// group.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn all_transfers(conn: &mut SqliteConnection) -> Result<Vec<Transfer>, PersistenceError> {
    let rows: Vec<TransferRow> = transfers::table
        .order((transfers::honoree_id.asc(), transfers::recorded_at.desc()))
        .select(TransferRow::as_select())
        .load(conn)?;

    rows.into_iter().map(TransferRow::into_domain).collect()
}
