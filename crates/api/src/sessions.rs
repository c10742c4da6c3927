// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The ephemeral per-identity session store.
//!
//! Session data lives only for the duration of one in-progress interaction,
//! addressed by the initiating identity key, and is explicitly cleared on
//! every terminal transition: commit success, domain error, unexpected
//! error, or explicit cancel. Nothing here survives a process restart, by
//! design. Sessions are retained indefinitely while non-terminal; there is
//! no TTL.

use gift_fund::FlowSession;
use std::collections::{BTreeMap, HashMap};

/// A cached numbered roster: display number to identity key.
pub type Roster = BTreeMap<u32, i64>;

/// What an admin's pending number input selects a person for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSelection {
    /// Deleting the person.
    DeletePerson,
    /// Assigning the person as active collector.
    AssignCollector,
}

/// One identity's in-progress interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// A multi-step flow (registration, wish entry, collector registration).
    Flow(FlowSession),
    /// Waiting for the admin secret phrase.
    AwaitingAdminPhrase,
    /// Waiting for the service-user secret phrase.
    AwaitingServicePhrase,
    /// The admin panel was shown; its numbered roster is cached.
    AdminPanel {
        /// Display number to identity key.
        roster: Roster,
    },
    /// Waiting for an admin to type a roster number.
    ///
    /// `roster` is `None` when the panel cache was lost (session expired);
    /// the number handler reports that instead of guessing.
    AdminAwaitingNumber {
        /// What the number selects a person for.
        purpose: AdminSelection,
        /// The cached roster, if still available.
        roster: Option<Roster>,
    },
    /// Waiting for the service user to type an admin roster number.
    ServiceAwaitingNumber {
        /// The cached admin roster, if still available.
        roster: Option<Roster>,
    },
    /// The wish list was shown; its entries are cached for selection.
    WishBrowse {
        /// Wish identifiers in display order.
        wish_ids: Vec<i64>,
        /// The wish picked from the numbered selection, if any.
        selected: Option<i64>,
    },
}

/// In-memory session store keyed by identity.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<i64, Session>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Returns the session for an identity, if one is in progress.
    #[must_use]
    pub fn get(&self, identity: i64) -> Option<&Session> {
        self.sessions.get(&identity)
    }

    /// Removes and returns the session for an identity.
    pub fn take(&mut self, identity: i64) -> Option<Session> {
        self.sessions.remove(&identity)
    }

    /// Replaces the session for an identity.
    pub fn set(&mut self, identity: i64, session: Session) {
        self.sessions.insert(identity, session);
    }

    /// Clears the session for an identity unconditionally.
    pub fn clear(&mut self, identity: i64) {
        self.sessions.remove(&identity);
    }

    /// Whether the identity's session belongs to the registration flow.
    ///
    /// The registration gate uses this to let an unregistered person's
    /// in-progress registration input through.
    #[must_use]
    pub fn in_registration_flow(&self, identity: i64) -> bool {
        matches!(
            self.get(identity),
            Some(Session::Flow(flow)) if flow.kind() == gift_fund::FlowKind::Registration
        )
    }
}
