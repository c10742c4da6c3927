// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The admin panel: person roster, deletion, and collector assignment.
//!
//! The panel caches a numbered roster in the actor's session; number input
//! arriving after the cache is gone is answered with a session-expired
//! message rather than a guess.

use gift_fund_domain::Person;
use gift_fund_persistence::{Persistence, PersistenceError};
use tracing::{error, info};

use crate::auth::{self, RequestContext};
use crate::request_response::{Action, ActionButton, OutboundMessage};
use crate::sessions::{AdminSelection, Roster, Session, SessionStore};

use super::{denial_text, MSG_SESSION_EXPIRED, MSG_UNEXPECTED_ERROR};

const MSG_USER_NOT_FOUND: &str = "Person not found.\nTry entering the number again:";
const MSG_PROTECTED_USER: &str = "You cannot delete this person.";

/// Shows the admin panel: a numbered roster of all persons plus the current
/// active collector.
pub(crate) fn show_panel(
    persistence: &mut Persistence,
    sessions: &mut SessionStore,
    ctx: &RequestContext,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    if let Err(err) = auth::require_admin(ctx) {
        return vec![OutboundMessage::text(identity, denial_text(err))];
    }

    let persons: Vec<Person> = match persistence.all_persons() {
        Ok(persons) => persons,
        Err(err) => {
            error!(identity, %err, "Failed to build the person roster");
            return vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)];
        }
    };

    if persons.is_empty() {
        return vec![OutboundMessage::text(identity, "The person list is empty.")];
    }

    let mut text: String = String::from("Admin panel\n\nAll persons:\n");
    let mut roster: Roster = Roster::new();
    for (index, person) in persons.iter().enumerate() {
        let number: u32 = u32::try_from(index + 1).unwrap_or(u32::MAX);
        text.push_str(&format!("  {number}. {}\n", person.full_name()));
        roster.insert(number, person.person_id);
    }

    if let Some(active) = &ctx.active_collector {
        let short: String = persistence
            .find_person(active.person_id)
            .ok()
            .flatten()
            .map_or_else(|| format!("id {}", active.person_id), |p| p.short_name());
        text.push_str(&format!("\nGift fund collector: {short}\n"));
    }
    text.push_str("\nChoose an action:");

    sessions.set(identity, Session::AdminPanel { roster });

    vec![OutboundMessage::with_buttons(
        identity,
        text,
        vec![
            ActionButton::new("Delete person", &Action::AdminDeleteUser),
            ActionButton::new("Assign collector", &Action::AdminSetCollector),
        ],
    )]
}

/// Starts a roster-number selection for deletion or collector assignment.
pub(crate) fn begin_selection(
    sessions: &mut SessionStore,
    ctx: &RequestContext,
    purpose: AdminSelection,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    if let Err(err) = auth::require_admin(ctx) {
        return vec![OutboundMessage::text(identity, denial_text(err))];
    }

    // Carry the roster cached when the panel was shown, if it still exists.
    let roster: Option<Roster> = match sessions.take(identity) {
        Some(Session::AdminPanel { roster }) => Some(roster),
        Some(other) => {
            sessions.set(identity, other);
            None
        }
        None => None,
    };
    sessions.set(identity, Session::AdminAwaitingNumber { purpose, roster });

    let prompt: &str = match purpose {
        AdminSelection::DeletePerson => {
            "Enter the person's number from the admin panel to delete them:"
        }
        AdminSelection::AssignCollector => {
            "Enter the person's number from the admin panel to assign them as collector:"
        }
    };
    vec![OutboundMessage::text(identity, prompt)]
}

/// Handles the typed roster number for a pending admin selection.
///
/// The session has already been taken by the dispatcher; it is re-set only
/// when the input should be retried.
pub(crate) fn handle_roster_number(
    persistence: &mut Persistence,
    sessions: &mut SessionStore,
    ctx: &RequestContext,
    purpose: AdminSelection,
    roster: Option<Roster>,
    text: &str,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    if let Err(err) = auth::require_admin(ctx) {
        return vec![OutboundMessage::text(identity, denial_text(err))];
    }

    let Some(roster) = roster else {
        return vec![OutboundMessage::text(identity, MSG_SESSION_EXPIRED)];
    };

    let Some(person_id) = lookup_roster(&roster, text) else {
        let numbers: String = roster_numbers(&roster);
        sessions.set(
            identity,
            Session::AdminAwaitingNumber {
                purpose,
                roster: Some(roster),
            },
        );
        return vec![OutboundMessage::text(
            identity,
            format!("Invalid number. Enter one of:\n{numbers}"),
        )];
    };

    let person: Person = match persistence.get_person(person_id) {
        Ok(person) => person,
        Err(PersistenceError::PersonNotFound(_)) => {
            sessions.set(
                identity,
                Session::AdminAwaitingNumber {
                    purpose,
                    roster: Some(roster),
                },
            );
            return vec![OutboundMessage::text(identity, MSG_USER_NOT_FOUND)];
        }
        Err(err) => {
            error!(identity, person_id, %err, "Failed to load the selected person");
            return vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)];
        }
    };

    match purpose {
        AdminSelection::DeletePerson => {
            // Admins and the service user are protected from deletion.
            let protected: bool = match protected_person(persistence, person_id) {
                Ok(protected) => protected,
                Err(err) => {
                    error!(identity, person_id, %err, "Failed to check deletion guard");
                    return vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)];
                }
            };
            if protected {
                return vec![OutboundMessage::text(identity, MSG_PROTECTED_USER)];
            }

            vec![OutboundMessage::with_buttons(
                identity,
                format!(
                    "Are you sure you want to delete {}?",
                    person.full_name()
                ),
                vec![
                    ActionButton::new("Yes, delete", &Action::ConfirmDeleteUser { person_id }),
                    ActionButton::new("Cancel", &Action::Cancel),
                ],
            )]
        }
        AdminSelection::AssignCollector => vec![OutboundMessage::with_buttons(
            identity,
            format!(
                "Are you sure you want to assign {} as the gift fund collector?",
                person.full_name()
            ),
            vec![
                ActionButton::new("Yes, assign", &Action::ConfirmSetCollector { person_id }),
                ActionButton::new("Cancel", &Action::Cancel),
            ],
        )],
    }
}

/// Deletes a person after button confirmation.
pub(crate) fn confirm_delete_person(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    person_id: i64,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    if let Err(err) = auth::require_admin(ctx) {
        return vec![OutboundMessage::text(identity, denial_text(err))];
    }

    let name: String = match persistence.get_person(person_id) {
        Ok(person) => person.full_name(),
        Err(PersistenceError::PersonNotFound(_)) => {
            return vec![OutboundMessage::text(identity, "Person not found.")];
        }
        Err(err) => {
            error!(identity, person_id, %err, "Failed to load person before deletion");
            return vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)];
        }
    };

    match persistence.delete_person(person_id) {
        Ok(()) => {
            info!(identity, person_id, "Admin deleted a person");
            vec![OutboundMessage::text(
                identity,
                format!("{name} has been deleted."),
            )]
        }
        Err(PersistenceError::PersonNotFound(_)) => {
            vec![OutboundMessage::text(identity, "Person not found.")]
        }
        Err(err) => {
            error!(identity, person_id, %err, "Failed to delete person");
            vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)]
        }
    }
}

/// Assigns the active collector after button confirmation.
///
/// When the target has no collector record yet, the admin's action does not
/// fail: the target receives an invitation to register their transfer
/// details and the admin a pending notice.
pub(crate) fn confirm_assign_collector(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    person_id: i64,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    if let Err(err) = auth::require_admin(ctx) {
        return vec![OutboundMessage::text(identity, denial_text(err))];
    }

    let person: Person = match persistence.get_person(person_id) {
        Ok(person) => person,
        Err(PersistenceError::PersonNotFound(_)) => {
            return vec![OutboundMessage::text(identity, "Person not found.")];
        }
        Err(err) => {
            error!(identity, person_id, %err, "Failed to load collector candidate");
            return vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)];
        }
    };

    match persistence.set_active_collector(person_id) {
        Ok(record) => {
            info!(identity, person_id, "Admin assigned the active collector");
            vec![OutboundMessage::text(
                identity,
                format!(
                    "{} is now responsible for collecting gift funds.\n\nTransfer details:\nPhone: {}\nBank: {}",
                    person.full_name(),
                    record.phone_number,
                    record.bank_name.as_deref().unwrap_or("not specified"),
                ),
            )]
        }
        Err(PersistenceError::CollectorNotFound(_)) => vec![
            OutboundMessage::with_buttons(
                person_id,
                "An admin has assigned you to collect gift funds.\n\nPlease provide your transfer details:",
                vec![ActionButton::new(
                    "Provide details",
                    &Action::CreateCollectorData,
                )],
            ),
            OutboundMessage::text(
                identity,
                format!(
                    "{} has been asked to register their transfer details.\nYou will see them as collector once the details are in.",
                    person.full_name()
                ),
            ),
        ],
        Err(err) => {
            error!(identity, person_id, %err, "Failed to assign the active collector");
            vec![OutboundMessage::text(
                identity,
                "An error occurred while assigning the collector.",
            )]
        }
    }
}

fn lookup_roster(roster: &Roster, text: &str) -> Option<i64> {
    let number: u32 = text.trim().parse().ok()?;
    roster.get(&number).copied()
}

fn roster_numbers(roster: &Roster) -> String {
    roster
        .keys()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join(", ")
}

fn protected_person(
    persistence: &mut Persistence,
    person_id: i64,
) -> Result<bool, PersistenceError> {
    let is_admin: bool = persistence.is_admin(person_id)?;
    let is_service: bool = persistence.service_user_id()? == Some(person_id);
    Ok(is_admin || is_service)
}
