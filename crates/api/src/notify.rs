// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time-triggered birthday notification fan-out.
//!
//! Invoked by the external scheduler, reads from the entity store and
//! produces outbound messages addressed to arbitrary persons independent of
//! any inbound event. One message is built per recipient so that delivery
//! failures stay isolated per recipient at the transport layer.

use gift_fund_domain::{calendar_day, Person};
use gift_fund_persistence::{Persistence, PersistenceError};
use std::collections::HashSet;
use time::{Date, Duration};
use tracing::{info, warn};

use crate::request_response::{Action, ActionButton, OutboundMessage};

/// Builds the notification fan-out for birthdays `days_before` days ahead.
///
/// Every person whose birth month/day equals `today + days_before` is an
/// honoree; every other person receives one message about them. On the
/// one-day lead, recipients who already recorded a transfer for the honoree
/// get the message without the call to action.
///
/// # Errors
///
/// Returns an error if the entity store cannot be read.
pub fn upcoming_birthday_notifications(
    persistence: &mut Persistence,
    today: Date,
    days_before: i64,
) -> Result<Vec<OutboundMessage>, PersistenceError> {
    let target: Date = today.saturating_add(Duration::days(days_before));
    let (target_month, target_day): (u8, u8) = calendar_day(target);

    let all_persons: Vec<Person> = persistence.all_persons()?;
    if all_persons.is_empty() {
        warn!("No recipients for birthday notifications");
        return Ok(Vec::new());
    }

    let honorees: Vec<&Person> = all_persons
        .iter()
        .filter(|person| calendar_day(person.birth_date) == (target_month, target_day))
        .collect();

    let when_text: &str = lead_text(days_before);
    if honorees.is_empty() {
        info!(days_before, "No birthdays {when_text}");
        return Ok(Vec::new());
    }

    let mut messages: Vec<OutboundMessage> = Vec::new();
    for honoree in &honorees {
        // Senders who already chipped in are only looked up on the final
        // reminder, where the call to action is suppressed for them.
        let already_sent: HashSet<i64> = if days_before == 1 {
            persistence
                .sender_ids_for_honoree(honoree.person_id)?
                .into_iter()
                .collect()
        } else {
            HashSet::new()
        };

        for recipient in &all_persons {
            if recipient.person_id == honoree.person_id {
                continue;
            }

            let with_call_to_action: bool = !already_sent.contains(&recipient.person_id);
            let text: String = notification_text(when_text, target, honoree, with_call_to_action);

            let message: OutboundMessage = if with_call_to_action {
                OutboundMessage::with_buttons(
                    recipient.person_id,
                    text,
                    vec![ActionButton::new(
                        "Chip in for the gift",
                        &Action::BirthdayGift {
                            honoree_id: honoree.person_id,
                        },
                    )],
                )
            } else {
                OutboundMessage::text(recipient.person_id, text)
            };
            messages.push(message);
        }
    }

    info!(
        count = honorees.len(),
        days_before, "Built birthday reminders ({when_text})"
    );
    Ok(messages)
}

const fn lead_text(days_before: i64) -> &'static str {
    match days_before {
        1 => "tomorrow",
        7 => "in a week",
        _ => "soon",
    }
}

fn notification_text(
    when_text: &str,
    target: Date,
    honoree: &Person,
    with_call_to_action: bool,
) -> String {
    let mut text: String = format!(
        "Good morning!\n\nBirthday {when_text}: {:02}.{:02}\nHonoree: {}",
        target.day(),
        u8::from(target.month()),
        honoree.full_name(),
    );
    if with_call_to_action {
        text.push_str("\n\nJoin in on the gift!");
    }
    text
}
