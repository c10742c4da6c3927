// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The service-user surface: admin roster and grant revocation.

use gift_fund_domain::Person;
use gift_fund_persistence::{Persistence, PersistenceError};
use tracing::{error, info};

use crate::auth::{self, RequestContext};
use crate::request_response::{Action, ActionButton, OutboundMessage};
use crate::sessions::{Roster, Session, SessionStore};

use super::{denial_text, MSG_SESSION_EXPIRED, MSG_UNEXPECTED_ERROR};

const MSG_ADMIN_NOT_FOUND: &str = "Admin not found.\nTry entering the number again:";

/// Shows the numbered admin roster and awaits a revocation number.
pub(crate) fn show_admin_list(
    persistence: &mut Persistence,
    sessions: &mut SessionStore,
    ctx: &RequestContext,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    if let Err(err) = auth::require_service_user(ctx) {
        return vec![OutboundMessage::text(identity, denial_text(err))];
    }

    let admins: Vec<Person> = match persistence.admin_persons() {
        Ok(admins) => admins,
        Err(err) => {
            error!(identity, %err, "Failed to build the admin roster");
            return vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)];
        }
    };

    if admins.is_empty() {
        return vec![OutboundMessage::text(identity, "The admin list is empty.")];
    }

    let mut text: String = String::from("Admin management\n\nAll admins:\n");
    let mut roster: Roster = Roster::new();
    for (index, admin) in admins.iter().enumerate() {
        let number: u32 = u32::try_from(index + 1).unwrap_or(u32::MAX);
        text.push_str(&format!("  {number}. {}\n", admin.full_name()));
        roster.insert(number, admin.person_id);
    }
    text.push_str("\nEnter a number from the list to revoke that admin's rights.");

    sessions.set(
        identity,
        Session::ServiceAwaitingNumber {
            roster: Some(roster),
        },
    );

    vec![OutboundMessage::text(identity, text)]
}

/// Handles the typed roster number for a pending revocation.
pub(crate) fn handle_roster_number(
    persistence: &mut Persistence,
    sessions: &mut SessionStore,
    ctx: &RequestContext,
    roster: Option<Roster>,
    text: &str,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    if let Err(err) = auth::require_service_user(ctx) {
        return vec![OutboundMessage::text(identity, denial_text(err))];
    }

    let Some(roster) = roster else {
        return vec![OutboundMessage::text(identity, MSG_SESSION_EXPIRED)];
    };

    let parsed: Option<i64> = text
        .trim()
        .parse::<u32>()
        .ok()
        .and_then(|number| roster.get(&number).copied());
    let Some(person_id) = parsed else {
        let numbers: String = roster
            .keys()
            .map(ToString::to_string)
            .collect::<Vec<String>>()
            .join(", ");
        sessions.set(
            identity,
            Session::ServiceAwaitingNumber {
                roster: Some(roster),
            },
        );
        return vec![OutboundMessage::text(
            identity,
            format!("Invalid number. Enter one of:\n{numbers}"),
        )];
    };

    let admin: Person = match persistence.get_person(person_id) {
        Ok(person) => person,
        Err(PersistenceError::PersonNotFound(_)) => {
            sessions.set(
                identity,
                Session::ServiceAwaitingNumber {
                    roster: Some(roster),
                },
            );
            return vec![OutboundMessage::text(identity, MSG_ADMIN_NOT_FOUND)];
        }
        Err(err) => {
            error!(identity, person_id, %err, "Failed to load the selected admin");
            return vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)];
        }
    };

    vec![OutboundMessage::with_buttons(
        identity,
        format!(
            "Are you sure you want to revoke {}'s admin rights?",
            admin.full_name()
        ),
        vec![
            ActionButton::new("Yes, revoke", &Action::ConfirmRevokeAdmin { person_id }),
            ActionButton::new("Cancel", &Action::Cancel),
        ],
    )]
}

/// Revokes an admin grant after button confirmation.
pub(crate) fn confirm_revoke_admin(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    person_id: i64,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    if let Err(err) = auth::require_service_user(ctx) {
        return vec![OutboundMessage::text(identity, denial_text(err))];
    }

    let name: String = persistence
        .find_person(person_id)
        .ok()
        .flatten()
        .map_or_else(|| format!("id {person_id}"), |person| person.full_name());

    match persistence.delete_admin_grant(person_id) {
        Ok(()) => {
            info!(identity, person_id, "Service user revoked an admin grant");
            vec![OutboundMessage::text(
                identity,
                format!("{name}'s admin rights have been revoked."),
            )]
        }
        Err(PersistenceError::AdminGrantNotFound(_)) => {
            vec![OutboundMessage::text(identity, "Admin not found.")]
        }
        Err(err) => {
            error!(identity, person_id, %err, "Failed to revoke the admin grant");
            vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)]
        }
    }
}
