// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Person mutations.

use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::SqliteConnection;
use gift_fund_domain::Person;
use tracing::info;

use crate::data_models::format_date;
use crate::diesel_schema::persons;
use crate::error::PersistenceError;

/// Creates a new person.
///
/// The identity key is externally assigned; creating a person whose key is
/// already present is a duplicate, not an upsert.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicatePerson` if the identity key is taken,
/// or an error if the write fails.
pub fn add_person(conn: &mut SqliteConnection, person: &Person) -> Result<(), PersistenceError> {
    let birth_date: String = format_date(person.birth_date)?;

    conn.immediate_transaction(|conn| {
        let existing: i64 = persons::table
            .filter(persons::person_id.eq(person.person_id))
            .count()
            .get_result(conn)?;
        if existing > 0 {
            return Err(PersistenceError::DuplicatePerson(person.person_id));
        }

        diesel::insert_into(persons::table)
            .values((
                persons::person_id.eq(person.person_id),
                persons::handle.eq(&person.handle),
                persons::family_name.eq(&person.family_name),
                persons::given_name.eq(&person.given_name),
                persons::patronymic.eq(&person.patronymic),
                persons::birth_date.eq(&birth_date),
            ))
            .execute(conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    PersistenceError::DuplicatePerson(person.person_id)
                }
                other => other.into(),
            })?;

        Ok(())
    })?;

    info!(person_id = person.person_id, "Person added");
    Ok(())
}

/// Updates an existing person's profile fields.
///
/// # Errors
///
/// Returns `PersistenceError::PersonNotFound` if no such person exists, or
/// an error if the write fails.
pub fn update_person(conn: &mut SqliteConnection, person: &Person) -> Result<(), PersistenceError> {
    let birth_date: String = format_date(person.birth_date)?;

    let rows_affected: usize = diesel::update(persons::table)
        .filter(persons::person_id.eq(person.person_id))
        .set((
            persons::handle.eq(&person.handle),
            persons::family_name.eq(&person.family_name),
            persons::given_name.eq(&person.given_name),
            persons::patronymic.eq(&person.patronymic),
            persons::birth_date.eq(&birth_date),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::PersonNotFound(person.person_id));
    }

    info!(person_id = person.person_id, "Person updated");
    Ok(())
}

/// Deletes a person and, via cascade, all dependent records.
///
/// # Errors
///
/// Returns `PersistenceError::PersonNotFound` if no such person exists, or
/// an error if the write fails.
pub fn delete_person(conn: &mut SqliteConnection, person_id: i64) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(persons::table)
        .filter(persons::person_id.eq(person_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::PersonNotFound(person_id));
    }

    info!(person_id, "Person deleted (dependent records cascaded)");
    Ok(())
}
