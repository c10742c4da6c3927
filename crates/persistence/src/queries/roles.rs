// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin grant and service-user queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use gift_fund_domain::Person;

use crate::data_models::PersonRow;
use crate::diesel_schema::{admin_grants, persons, service_user};
use crate::error::PersistenceError;

/// Whether the person holds an admin grant.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn is_admin(conn: &mut SqliteConnection, person_id: i64) -> Result<bool, PersistenceError> {
    let count: i64 = admin_grants::table
        .filter(admin_grants::person_id.eq(person_id))
        .count()
        .get_result(conn)?;

    Ok(count > 0)
}

/// Retrieves every person holding an admin grant, ordered by family name.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn admin_persons(conn: &mut SqliteConnection) -> Result<Vec<Person>, PersistenceError> {
    let rows: Vec<PersonRow> = admin_grants::table
        .inner_join(persons::table)
        .order(persons::family_name.asc())
        .select(PersonRow::as_select())
        .load(conn)?;

    rows.into_iter().map(PersonRow::into_domain).collect()
}

/// Retrieves the designated service user's identity key, if one is set.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn service_user_id(conn: &mut SqliteConnection) -> Result<Option<i64>, PersistenceError> {
    Ok(service_user::table
        .select(service_user::person_id)
        .first(conn)
        .optional()?)
}
