// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The transfer ledger report, as panel text and as CSV export.

use gift_fund_domain::{Person, Transfer};
use gift_fund_persistence::{Persistence, PersistenceError};
use std::collections::HashMap;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::error::ReportError;

/// Display format for transfer timestamps.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day].[month].[year] [hour]:[minute]");

/// Builds the transfer report shown in the collector panel.
///
/// Transfers are grouped by honoree, newest first within each group.
///
/// # Errors
///
/// Returns an error if the ledger cannot be read.
pub fn transfers_report_text(persistence: &mut Persistence) -> Result<String, PersistenceError> {
    let transfers: Vec<Transfer> = persistence.all_transfers()?;
    if transfers.is_empty() {
        return Ok(String::from("The transfer list is empty."));
    }

    let names: HashMap<i64, Person> = person_index(persistence)?;

    let mut text: String = String::from("Transfer report:\n");
    let mut current_honoree: Option<i64> = None;
    for transfer in &transfers {
        if current_honoree != Some(transfer.honoree_id) {
            current_honoree = Some(transfer.honoree_id);
            text.push_str(&format!(
                "\n{}:\n",
                full_name_or_id(&names, transfer.honoree_id)
            ));
        }
        text.push_str(&format!(
            "  {} - {}\n",
            short_name_or_id(&names, transfer.sender_id),
            format_timestamp(transfer)
        ));
    }

    Ok(text)
}

/// Renders the transfer ledger as CSV: honoree, sender, recorded-at.
///
/// # Errors
///
/// Returns an error if the ledger cannot be read or serialization fails.
pub fn transfers_report_csv(persistence: &mut Persistence) -> Result<String, ReportError> {
    let transfers: Vec<Transfer> = persistence.all_transfers()?;
    let names: HashMap<i64, Person> = person_index(persistence)?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["honoree", "sender", "recorded_at"])?;
    for transfer in &transfers {
        writer.write_record([
            full_name_or_id(&names, transfer.honoree_id),
            full_name_or_id(&names, transfer.sender_id),
            format_timestamp(transfer),
        ])?;
    }

    let buffer: Vec<u8> = writer
        .into_inner()
        .map_err(|e| ReportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(buffer)?)
}

fn person_index(persistence: &mut Persistence) -> Result<HashMap<i64, Person>, PersistenceError> {
    Ok(persistence
        .all_persons()?
        .into_iter()
        .map(|person| (person.person_id, person))
        .collect())
}

fn full_name_or_id(names: &HashMap<i64, Person>, person_id: i64) -> String {
    names
        .get(&person_id)
        .map_or_else(|| format!("id {person_id}"), Person::full_name)
}

fn short_name_or_id(names: &HashMap<i64, Person>, person_id: i64) -> String {
    names
        .get(&person_id)
        .map_or_else(|| format!("id {person_id}"), Person::short_name)
}

fn format_timestamp(transfer: &Transfer) -> String {
    transfer
        .recorded_at
        .format(&TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| String::from("?"))
}
