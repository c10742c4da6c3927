// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Gift Fund Coordinator.
//!
//! This crate provides `SQLite` persistence for the six domain entities via
//! Diesel, with embedded migrations. The adapter owns one connection; the
//! server serializes access behind an async mutex, and the two contended
//! operations — transfer recording and collector activation — additionally
//! run inside immediate transactions with storage-level unique indexes as
//! the authoritative guards.
//!
//! ## Testing
//!
//! Tests run against unique in-memory databases created by
//! [`Persistence::new_in_memory`]; no external infrastructure is required.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use gift_fund_domain::{CollectorRecord, Person, Transfer, Wish};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, OffsetDateTime};

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use mutations::TransferOutcome;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over the six domain entities.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_test_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = sqlite::initialize_database(&shared_memory_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = sqlite::initialize_database(path_str)?;
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // === Persons ===

    /// Creates a new person.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicatePerson` if the identity key is
    /// taken.
    pub fn add_person(&mut self, person: &Person) -> Result<(), PersistenceError> {
        mutations::persons::add_person(&mut self.conn, person)
    }

    /// Updates an existing person's profile.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::PersonNotFound` if no such person exists.
    pub fn update_person(&mut self, person: &Person) -> Result<(), PersistenceError> {
        mutations::persons::update_person(&mut self.conn, person)
    }

    /// Deletes a person; dependent records cascade.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::PersonNotFound` if no such person exists.
    pub fn delete_person(&mut self, person_id: i64) -> Result<(), PersistenceError> {
        mutations::persons::delete_person(&mut self.conn, person_id)
    }

    /// Retrieves a person by identity key.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::PersonNotFound` if no such person exists.
    pub fn get_person(&mut self, person_id: i64) -> Result<Person, PersistenceError> {
        queries::persons::get_person(&mut self.conn, person_id)
    }

    /// Retrieves a person by identity key, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_person(&mut self, person_id: i64) -> Result<Option<Person>, PersistenceError> {
        queries::persons::find_person(&mut self.conn, person_id)
    }

    /// Retrieves all persons ordered by family name then given name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn all_persons(&mut self) -> Result<Vec<Person>, PersistenceError> {
        queries::persons::all_persons(&mut self.conn)
    }

    /// Retrieves all persons whose birth month/day match exactly.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn persons_with_birthday(
        &mut self,
        month: u8,
        day: u8,
    ) -> Result<Vec<Person>, PersistenceError> {
        queries::persons::persons_with_birthday(&mut self.conn, month, day)
    }

    // === Wishes ===

    /// Creates a wish and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::PersonNotFound` if the owner is missing.
    pub fn add_wish(
        &mut self,
        person_id: i64,
        wish_text: &str,
        wish_url: Option<&str>,
    ) -> Result<i64, PersistenceError> {
        mutations::wishes::add_wish(&mut self.conn, person_id, wish_text, wish_url)
    }

    /// Retrieves a wish by identifier.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::WishNotFound` if no such wish exists.
    pub fn get_wish(&mut self, wish_id: i64) -> Result<Wish, PersistenceError> {
        queries::wishes::get_wish(&mut self.conn, wish_id)
    }

    /// Retrieves a person's wishes, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn wishes_for_person(&mut self, person_id: i64) -> Result<Vec<Wish>, PersistenceError> {
        queries::wishes::wishes_for_person(&mut self.conn, person_id)
    }

    /// Updates a wish owned by the given person.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::WishNotFound` if the wish does not exist
    /// or belongs to someone else.
    pub fn update_wish(
        &mut self,
        wish_id: i64,
        person_id: i64,
        wish_text: &str,
        wish_url: Option<&str>,
    ) -> Result<(), PersistenceError> {
        mutations::wishes::update_wish(&mut self.conn, wish_id, person_id, wish_text, wish_url)
    }

    /// Deletes a wish owned by the given person.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::WishNotFound` if the wish does not exist
    /// or belongs to someone else.
    pub fn delete_wish(&mut self, wish_id: i64, person_id: i64) -> Result<(), PersistenceError> {
        mutations::wishes::delete_wish(&mut self.conn, wish_id, person_id)
    }

    // === Transfers ===

    /// Records a gift contribution, once per (sender, honoree) pair.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::PersonNotFound` if either person is
    /// missing.
    pub fn record_transfer(
        &mut self,
        sender_id: i64,
        honoree_id: i64,
        recorded_at: OffsetDateTime,
    ) -> Result<TransferOutcome, PersistenceError> {
        mutations::transfers::record_transfer(&mut self.conn, sender_id, honoree_id, recorded_at)
    }

    /// Retrieves all transfers for one honoree, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn transfers_for_honoree(
        &mut self,
        honoree_id: i64,
    ) -> Result<Vec<Transfer>, PersistenceError> {
        queries::transfers::transfers_for_honoree(&mut self.conn, honoree_id)
    }

    /// Retrieves the identity keys of everyone who contributed for the
    /// honoree.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn sender_ids_for_honoree(
        &mut self,
        honoree_id: i64,
    ) -> Result<Vec<i64>, PersistenceError> {
        queries::transfers::sender_ids_for_honoree(&mut self.conn, honoree_id)
    }

    /// Retrieves the full ledger grouped by honoree.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn all_transfers(&mut self) -> Result<Vec<Transfer>, PersistenceError> {
        queries::transfers::all_transfers(&mut self.conn)
    }

    /// Deletes transfers whose honoree's birthday has passed this calendar
    /// year; returns the deleted row count.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn purge_past_transfers(&mut self, today: Date) -> Result<usize, PersistenceError> {
        mutations::transfers::purge_past_transfers(&mut self.conn, today)
    }

    // === Admin grants ===

    /// Grants admin privilege.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateAdminGrant` if already granted.
    pub fn add_admin_grant(&mut self, person_id: i64) -> Result<(), PersistenceError> {
        mutations::roles::add_admin_grant(&mut self.conn, person_id)
    }

    /// Revokes admin privilege.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::AdminGrantNotFound` if no grant exists.
    pub fn delete_admin_grant(&mut self, person_id: i64) -> Result<(), PersistenceError> {
        mutations::roles::delete_admin_grant(&mut self.conn, person_id)
    }

    /// Whether the person holds an admin grant.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn is_admin(&mut self, person_id: i64) -> Result<bool, PersistenceError> {
        queries::roles::is_admin(&mut self.conn, person_id)
    }

    /// Retrieves every admin's person record, ordered by family name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn admin_persons(&mut self) -> Result<Vec<Person>, PersistenceError> {
        queries::roles::admin_persons(&mut self.conn)
    }

    // === Service user ===

    /// Designates the service user, overwriting any previous designation.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_service_user(&mut self, person_id: i64) -> Result<(), PersistenceError> {
        mutations::roles::set_service_user(&mut self.conn, person_id)
    }

    /// Seeds the service-user designation if none exists; returns whether a
    /// row was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn seed_service_user(&mut self, person_id: i64) -> Result<bool, PersistenceError> {
        mutations::roles::seed_service_user(&mut self.conn, person_id)
    }

    /// Retrieves the service user's identity key, if set.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn service_user_id(&mut self) -> Result<Option<i64>, PersistenceError> {
        queries::roles::service_user_id(&mut self.conn)
    }

    // === Collectors ===

    /// Creates an inactive collector record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateCollector` if a record exists.
    pub fn create_collector(
        &mut self,
        person_id: i64,
        phone_number: &str,
        bank_name: Option<&str>,
    ) -> Result<CollectorRecord, PersistenceError> {
        mutations::collectors::create_collector(&mut self.conn, person_id, phone_number, bank_name)
    }

    /// Replaces a collector's payment routing data.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CollectorNotFound` if no record exists.
    pub fn update_collector(
        &mut self,
        person_id: i64,
        phone_number: &str,
        bank_name: Option<&str>,
    ) -> Result<CollectorRecord, PersistenceError> {
        mutations::collectors::update_collector(&mut self.conn, person_id, phone_number, bank_name)
    }

    /// Retrieves a person's collector record, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_collector(
        &mut self,
        person_id: i64,
    ) -> Result<Option<CollectorRecord>, PersistenceError> {
        queries::collectors::find_collector(&mut self.conn, person_id)
    }

    /// Retrieves all collector records.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn all_collectors(&mut self) -> Result<Vec<CollectorRecord>, PersistenceError> {
        queries::collectors::all_collectors(&mut self.conn)
    }

    /// Retrieves the active collector, if one is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn active_collector(&mut self) -> Result<Option<CollectorRecord>, PersistenceError> {
        queries::collectors::active_collector(&mut self.conn)
    }

    /// Counts active collector records.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_active_collectors(&mut self) -> Result<i64, PersistenceError> {
        queries::collectors::count_active_collectors(&mut self.conn)
    }

    /// Activates a collector, deactivating the previous holder; enforces the
    /// single-active invariant.
    ///
    /// # Errors
    ///
    /// * `PersistenceError::CollectorNotFound` — the person has no record
    /// * `PersistenceError::CollectorUniquenessViolation` — the post-commit
    ///   assertion saw more than one active record
    pub fn set_active_collector(
        &mut self,
        person_id: i64,
    ) -> Result<CollectorRecord, PersistenceError> {
        mutations::collectors::set_active_collector(&mut self.conn, person_id)
    }
}
