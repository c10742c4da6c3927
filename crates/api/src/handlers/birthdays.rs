// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Birthday listing, gift collection details and transfer recording.

use gift_fund_domain::{calendar_day, Person};
use gift_fund_persistence::{Persistence, PersistenceError, TransferOutcome};
use time::OffsetDateTime;
use tracing::{error, info, warn};

use crate::auth::RequestContext;
use crate::request_response::{Action, ActionButton, OutboundMessage};

use super::MSG_UNEXPECTED_ERROR;

const MSG_NO_ACTIVE_COLLECTOR: &str =
    "No one is assigned to collect gift funds.\nContact an admin or support to resolve this.";

const MSG_TRANSFER_ALREADY_RECORDED: &str =
    "Your transfer is already recorded.\n\nThanks for taking part!";

const MSG_TRANSFER_RECORDED: &str = "Thanks for taking part!\nYour transfer is recorded.";

/// Shows everyone's birthdays, split into upcoming and already passed.
pub(crate) fn show_birthdays(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    now: OffsetDateTime,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    let persons: Vec<Person> = match persistence.all_persons() {
        Ok(persons) => persons,
        Err(err) => {
            error!(identity, %err, "Failed to load persons for the birthday list");
            return vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)];
        }
    };

    if persons.is_empty() {
        return vec![OutboundMessage::text(identity, "The birthday list is empty.")];
    }

    let today: (u8, u8) = calendar_day(now.date());
    let mut upcoming: Vec<&Person> = Vec::new();
    let mut past: Vec<&Person> = Vec::new();
    for person in &persons {
        if calendar_day(person.birth_date) >= today {
            upcoming.push(person);
        } else {
            past.push(person);
        }
    }
    upcoming.sort_by_key(|person| calendar_day(person.birth_date));
    past.sort_by_key(|person| calendar_day(person.birth_date));

    let mut text: String = String::from("Birthdays\n\nUpcoming:\n");
    for person in &upcoming {
        text.push_str(&birthday_line(person));
    }
    if !past.is_empty() {
        text.push_str("\nAlready passed:\n");
        for person in &past {
            text.push_str(&birthday_line(person));
        }
    }

    vec![OutboundMessage::text(identity, text)]
}

fn birthday_line(person: &Person) -> String {
    format!(
        "{} {} - {}\n",
        person.birth_date.day(),
        person.birth_date.month(),
        person.short_name()
    )
}

/// Shows the active collector's payment details for an honoree.
pub(crate) fn show_gift_details(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    honoree_id: i64,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    let Some(active) = &ctx.active_collector else {
        return vec![OutboundMessage::text(identity, MSG_NO_ACTIVE_COLLECTOR)];
    };

    let collector_name: String = match persistence.get_person(active.person_id) {
        Ok(person) => person.full_name(),
        Err(err) => {
            error!(identity, %err, "Failed to load the active collector's profile");
            return vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)];
        }
    };

    let text: String = format!(
        "Gift fund collection\n\nCollected by: {collector_name}\nTransfer by phone number: {}\nBank: {}\n\nTransfer whichever way suits you.",
        active.phone_number,
        active.bank_name.as_deref().unwrap_or("not specified"),
    );

    vec![OutboundMessage::with_buttons(
        identity,
        text,
        vec![ActionButton::new(
            "I have transferred",
            &Action::Transferred { honoree_id },
        )],
    )]
}

/// Records a gift contribution and notifies the active collector.
///
/// Recording is idempotent by (sender, honoree) pair: a repeat press
/// reports "already recorded" and stores nothing.
pub(crate) fn record_contribution(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    honoree_id: i64,
    now: OffsetDateTime,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    let honoree: Person = match persistence.get_person(honoree_id) {
        Ok(person) => person,
        Err(PersistenceError::PersonNotFound(_)) => {
            return vec![OutboundMessage::text(identity, "Person not found.")];
        }
        Err(err) => {
            error!(identity, honoree_id, %err, "Failed to load the honoree");
            return vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)];
        }
    };

    let outcome: TransferOutcome = match persistence.record_transfer(identity, honoree_id, now) {
        Ok(outcome) => outcome,
        Err(PersistenceError::PersonNotFound(_)) => {
            return vec![OutboundMessage::text(identity, "Person not found.")];
        }
        Err(err) => {
            error!(identity, honoree_id, %err, "Failed to record the transfer");
            return vec![OutboundMessage::text(
                identity,
                "An error occurred while recording your transfer.",
            )];
        }
    };

    if outcome == TransferOutcome::AlreadyRecorded {
        return vec![OutboundMessage::text(identity, MSG_TRANSFER_ALREADY_RECORDED)];
    }

    let sender_name: String = ctx
        .person
        .as_ref()
        .map_or_else(|| format!("id {identity}"), Person::full_name);

    let mut messages: Vec<OutboundMessage> =
        vec![OutboundMessage::text(identity, MSG_TRANSFER_RECORDED)];

    match &ctx.active_collector {
        Some(active) => {
            let when: String = super::flows::format_display_date(now.date());
            messages.push(OutboundMessage::text(
                active.person_id,
                format!(
                    "New gift transfer!\n\nFrom: {sender_name}\nFor: {}\nDate: {when}",
                    honoree.full_name(),
                ),
            ));
            messages.push(OutboundMessage::text(
                identity,
                "The collector has been notified of your transfer.",
            ));
            info!(identity, honoree_id, "Transfer recorded and collector notified");
        }
        None => {
            warn!(
                identity,
                honoree_id, "Transfer recorded but no active collector to notify"
            );
            messages.push(OutboundMessage::text(
                identity,
                "The collector could not be notified: no one is currently assigned.",
            ));
        }
    }

    messages
}
