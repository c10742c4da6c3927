// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Profile display and support contact.

use gift_fund_persistence::Persistence;
use tracing::error;

use crate::auth::RequestContext;
use crate::request_response::{Action, ActionButton, OutboundMessage};

use super::flows::format_display_date;
use super::MSG_SERVER_ERROR;

/// Shows the actor's stored profile with an edit entry point.
pub(crate) fn show_profile(ctx: &RequestContext) -> Vec<OutboundMessage> {
    let Some(person) = &ctx.person else {
        return vec![OutboundMessage::text(ctx.identity, MSG_SERVER_ERROR)];
    };

    let text: String = format!(
        "Your data:\n\nFamily name: {}\nGiven name: {}\nPatronymic: {}\n\nBirth date: {}",
        person.family_name,
        person.given_name,
        person.patronymic,
        format_display_date(person.birth_date)
    );

    vec![OutboundMessage::with_buttons(
        ctx.identity,
        text,
        vec![ActionButton::new("Edit", &Action::EditProfile)],
    )]
}

/// Shows the support contact.
pub(crate) fn show_support(
    persistence: &mut Persistence,
    ctx: &RequestContext,
) -> Vec<OutboundMessage> {
    let contact: Option<i64> = match persistence.service_user_id() {
        Ok(contact) => contact,
        Err(err) => {
            error!(identity = ctx.identity, %err, "Failed to load the service contact");
            return vec![OutboundMessage::text(
                ctx.identity,
                "Failed to reach the support contact.",
            )];
        }
    };

    let Some(service_id) = contact else {
        return vec![OutboundMessage::text(
            ctx.identity,
            "No support contact is configured.",
        )];
    };

    // The service user may not have registered yet; fall back to the raw
    // identity key when there is no profile to name them by.
    let who: String = persistence
        .find_person(service_id)
        .ok()
        .flatten()
        .map_or_else(|| format!("id {service_id}"), |person| person.full_name());

    vec![OutboundMessage::text(
        ctx.identity,
        format!("If you have any questions, please contact the support specialist: {who}"),
    )]
}
