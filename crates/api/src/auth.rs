// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The authorization chain.
//!
//! Every inbound event passes through identity resolution exactly once,
//! producing an immutable [`RequestContext`]: the acting person (or none),
//! role flags, the actor's own collector record, and the system-wide active
//! collector. Downstream handlers read the context; none of them re-derive
//! roles. Role gates are independent predicate checks composed in front of
//! restricted handler groups — a failed gate produces a denial message, not
//! a fatal error.

use gift_fund_domain::{CollectorRecord, Person};
use gift_fund_persistence::{Persistence, PersistenceError};
use tracing::debug;

use crate::error::AuthError;

/// Everything the dispatcher knows about the acting identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// The acting identity key.
    pub identity: i64,
    /// The registered person, when the identity has completed registration.
    pub person: Option<Person>,
    /// Whether the person holds an admin grant.
    pub is_admin: bool,
    /// Whether the person is the designated service user.
    pub is_service_user: bool,
    /// The actor's own collector record, when one exists.
    pub collector: Option<CollectorRecord>,
    /// The system-wide active collector, when one is assigned.
    pub active_collector: Option<CollectorRecord>,
}

impl RequestContext {
    /// Whether the identity has completed registration.
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        self.person.is_some()
    }
}

/// Resolves the request context for an identity.
///
/// Unregistered identities resolve with `person = None` and all role flags
/// cleared; role and collector lookups are only performed for registered
/// persons.
///
/// # Errors
///
/// Returns an error if any lookup fails. The dispatcher answers such
/// failures with a generic server-error message and drops the event.
pub fn resolve_context(
    persistence: &mut Persistence,
    identity: i64,
) -> Result<RequestContext, PersistenceError> {
    let person: Option<Person> = persistence.find_person(identity)?;

    if person.is_none() {
        debug!(identity, "Unregistered identity");
        return Ok(RequestContext {
            identity,
            person: None,
            is_admin: false,
            is_service_user: false,
            collector: None,
            active_collector: None,
        });
    }

    let is_admin: bool = persistence.is_admin(identity)?;
    let is_service_user: bool = persistence.service_user_id()? == Some(identity);
    let collector: Option<CollectorRecord> = persistence.find_collector(identity)?;
    let active_collector: Option<CollectorRecord> = persistence.active_collector()?;

    debug!(
        identity,
        is_admin, is_service_user, "Request context resolved"
    );

    Ok(RequestContext {
        identity,
        person,
        is_admin,
        is_service_user,
        collector,
        active_collector,
    })
}

/// Gate: the actor must hold an admin grant.
///
/// # Errors
///
/// Returns `AuthError::AdminRequired` otherwise.
pub const fn require_admin(ctx: &RequestContext) -> Result<(), AuthError> {
    if ctx.is_admin {
        Ok(())
    } else {
        Err(AuthError::AdminRequired)
    }
}

/// Gate: the actor must be the designated service user.
///
/// # Errors
///
/// Returns `AuthError::ServiceUserRequired` otherwise.
pub const fn require_service_user(ctx: &RequestContext) -> Result<(), AuthError> {
    if ctx.is_service_user {
        Ok(())
    } else {
        Err(AuthError::ServiceUserRequired)
    }
}

/// Gate: the actor must hold the active collector role.
///
/// # Errors
///
/// Returns `AuthError::ActiveCollectorRequired` otherwise.
pub fn require_active_collector(ctx: &RequestContext) -> Result<(), AuthError> {
    match &ctx.collector {
        Some(record) if record.is_active => Ok(()),
        _ => Err(AuthError::ActiveCollectorRequired),
    }
}
