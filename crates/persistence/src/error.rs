// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested person was not found.
    PersonNotFound(i64),
    /// A person with this identity key already exists.
    DuplicatePerson(i64),
    /// The requested wish was not found for the given owner.
    WishNotFound {
        /// The wish identifier.
        wish_id: i64,
    },
    /// The requested collector record was not found.
    CollectorNotFound(i64),
    /// A collector record already exists for this person.
    DuplicateCollector(i64),
    /// The requested admin grant was not found.
    AdminGrantNotFound(i64),
    /// An admin grant already exists for this person.
    DuplicateAdminGrant(i64),
    /// More than one active collector was observed after a commit.
    ///
    /// This is a critical consistency violation: it means a race slipped
    /// past the storage-level guard. It is surfaced, never auto-corrected.
    CollectorUniquenessViolation {
        /// How many active records were counted.
        active_count: i64,
    },
    /// The requested resource was not found.
    NotFound(String),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::PersonNotFound(person_id) => write!(f, "Person {person_id} not found"),
            Self::DuplicatePerson(person_id) => {
                write!(f, "Person {person_id} already exists")
            }
            Self::WishNotFound { wish_id } => write!(f, "Wish {wish_id} not found"),
            Self::CollectorNotFound(person_id) => {
                write!(f, "Collector record for person {person_id} not found")
            }
            Self::DuplicateCollector(person_id) => {
                write!(f, "Collector record for person {person_id} already exists")
            }
            Self::AdminGrantNotFound(person_id) => {
                write!(f, "Admin grant for person {person_id} not found")
            }
            Self::DuplicateAdminGrant(person_id) => {
                write!(f, "Admin grant for person {person_id} already exists")
            }
            Self::CollectorUniquenessViolation { active_count } => {
                write!(
                    f,
                    "Found {active_count} active collectors, exactly one is allowed"
                )
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
