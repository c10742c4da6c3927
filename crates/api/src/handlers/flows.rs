// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Driving the three multi-step flows through the workflow engine.
//!
//! Each function takes the actor's session out of the store, applies one
//! engine transition, and either puts the session back (non-terminal) or
//! leaves it cleared (terminal: commit attempted or data invalid beyond
//! recovery). The commit phase never leaves a session dangling: success,
//! domain error and unexpected error all clear it.

use gift_fund::{
    CollectorDraft, CollectorForm, CoreError, FlowData, FlowKind, FlowMode, FlowSession,
    FlowState, FlowStep, RegistrationDraft, RegistrationForm, StepAdvance, WishDraft, WishForm,
};
use gift_fund_domain::{DomainError, Person};
use gift_fund_persistence::{Persistence, PersistenceError};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;
use tracing::error;

use crate::auth::RequestContext;
use crate::request_response::{Action, ActionButton, InboundEvent, OutboundMessage};
use crate::sessions::{Session, SessionStore};

use super::{MSG_SESSION_EXPIRED, MSG_UNEXPECTED_ERROR};

/// Display format for birth dates.
const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day].[month].[year]");

const MSG_USE_BUTTONS: &str = "Use the buttons above, or Cancel.";

pub(crate) fn format_display_date(date: Date) -> String {
    date.format(&DISPLAY_DATE_FORMAT)
        .unwrap_or_else(|_| String::from("?"))
}

// === Flow entry points ===

/// Begins a fresh registration.
pub(crate) fn begin_registration(
    sessions: &mut SessionStore,
    ctx: &RequestContext,
) -> Vec<OutboundMessage> {
    let flow = FlowSession::begin(FlowKind::Registration, FlowMode::Create);
    sessions.set(ctx.identity, Session::Flow(flow));
    vec![OutboundMessage::text(
        ctx.identity,
        "Starting registration.\n\nEnter your family name:",
    )]
}

/// Begins adding a wish.
pub(crate) fn begin_add_wish(
    sessions: &mut SessionStore,
    ctx: &RequestContext,
) -> Vec<OutboundMessage> {
    let flow = FlowSession::begin(FlowKind::WishEntry, FlowMode::Create);
    sessions.set(ctx.identity, Session::Flow(flow));
    vec![OutboundMessage::text(
        ctx.identity,
        "Adding a new gift.\n\nDescribe your wish:",
    )]
}

/// Opens the profile edit menu, seeded from the stored person.
pub(crate) fn begin_profile_edit(
    sessions: &mut SessionStore,
    ctx: &RequestContext,
) -> Vec<OutboundMessage> {
    let Some(person) = &ctx.person else {
        return vec![OutboundMessage::text(ctx.identity, MSG_SESSION_EXPIRED)];
    };

    let draft = RegistrationDraft {
        family_name: Some(person.family_name.clone()),
        given_name: Some(person.given_name.clone()),
        patronymic: Some(person.patronymic.clone()),
        birth_date: Some(person.birth_date),
    };
    let flow = FlowSession::begin_revision(FlowData::Registration(draft));
    sessions.set(ctx.identity, Session::Flow(flow));
    vec![edit_menu_message(ctx.identity, FlowKind::Registration)]
}

/// Begins collector registration after an admin invitation.
pub(crate) fn begin_collector_create(
    sessions: &mut SessionStore,
    ctx: &RequestContext,
) -> Vec<OutboundMessage> {
    if ctx.collector.is_some() {
        return vec![OutboundMessage::text(
            ctx.identity,
            "You already have transfer details. Use the collector panel to update them.",
        )];
    }
    let flow = FlowSession::begin(FlowKind::CollectorRegistration, FlowMode::Create);
    sessions.set(ctx.identity, Session::Flow(flow));
    vec![step_prompt_message(ctx.identity, FlowStep::PhoneNumber)]
}

/// Opens the collector data edit menu, seeded from the stored record.
pub(crate) fn begin_collector_update(
    sessions: &mut SessionStore,
    ctx: &RequestContext,
) -> Vec<OutboundMessage> {
    let Some(record) = &ctx.collector else {
        return vec![OutboundMessage::text(
            ctx.identity,
            "You do not have access to this function.",
        )];
    };

    let draft = CollectorDraft {
        phone_number: Some(record.phone_number.clone()),
        bank_name: record.bank_name.clone(),
    };
    let flow = FlowSession::begin_revision(FlowData::Collector(draft));
    sessions.set(ctx.identity, Session::Flow(flow));
    vec![edit_menu_message(ctx.identity, FlowKind::CollectorRegistration)]
}

/// Opens the wish edit menu, seeded from an existing wish.
pub(crate) fn begin_wish_revision(
    sessions: &mut SessionStore,
    identity: i64,
    wish_id: i64,
    wish_text: String,
    wish_url: Option<String>,
) -> Vec<OutboundMessage> {
    let draft = WishDraft {
        wish_text: Some(wish_text),
        wish_url,
        url_collected: true,
        target_wish_id: Some(wish_id),
    };
    let flow = FlowSession::begin_revision(FlowData::Wish(draft));
    sessions.set(identity, Session::Flow(flow));
    vec![edit_menu_message(identity, FlowKind::WishEntry)]
}

// === Engine transitions ===

/// Feeds free-text input to the in-progress flow.
pub(crate) fn handle_flow_text(
    sessions: &mut SessionStore,
    ctx: &RequestContext,
    mut flow: FlowSession,
    text: &str,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;
    let step: Option<FlowStep> = flow.current_step();

    match flow.submit_text(text) {
        Ok(StepAdvance::Next(next)) => {
            sessions.set(identity, Session::Flow(flow));
            vec![step_prompt_message(identity, next)]
        }
        Ok(StepAdvance::Confirm) => {
            let message: OutboundMessage = confirmation_message(identity, &flow);
            sessions.set(identity, Session::Flow(flow));
            vec![message]
        }
        Err(CoreError::Validation(err)) => {
            // Re-prompt the same step; the session keeps its state and all
            // previously collected fields.
            let message: String = step.map_or_else(
                || err.to_string(),
                |step| validation_message(step, &err),
            );
            sessions.set(identity, Session::Flow(flow));
            vec![OutboundMessage::text(identity, message)]
        }
        Err(_) => {
            // Text while confirming or edit-selecting: point at the buttons.
            sessions.set(identity, Session::Flow(flow));
            vec![OutboundMessage::text(identity, MSG_USE_BUTTONS)]
        }
    }
}

/// Skips the current optional step.
pub(crate) fn skip_step(
    sessions: &mut SessionStore,
    ctx: &RequestContext,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;
    let Some(Session::Flow(mut flow)) = sessions.take(identity) else {
        return vec![OutboundMessage::text(identity, MSG_SESSION_EXPIRED)];
    };

    match flow.skip_step() {
        Ok(_) => {
            let message: OutboundMessage = confirmation_message(identity, &flow);
            sessions.set(identity, Session::Flow(flow));
            vec![message]
        }
        Err(_) => {
            sessions.set(identity, Session::Flow(flow));
            vec![OutboundMessage::text(identity, MSG_USE_BUTTONS)]
        }
    }
}

/// Moves a confirming flow into the edit-selection menu.
pub(crate) fn request_revision(
    sessions: &mut SessionStore,
    ctx: &RequestContext,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;
    let Some(Session::Flow(mut flow)) = sessions.take(identity) else {
        return vec![OutboundMessage::text(identity, MSG_SESSION_EXPIRED)];
    };

    match flow.request_revision() {
        Ok(()) => {
            let kind: FlowKind = flow.kind();
            sessions.set(identity, Session::Flow(flow));
            vec![edit_menu_message(identity, kind)]
        }
        Err(_) => {
            sessions.set(identity, Session::Flow(flow));
            vec![OutboundMessage::text(identity, MSG_USE_BUTTONS)]
        }
    }
}

/// Re-enters one field's collection step in edit mode.
pub(crate) fn edit_field(
    sessions: &mut SessionStore,
    ctx: &RequestContext,
    step: FlowStep,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;
    let Some(Session::Flow(mut flow)) = sessions.take(identity) else {
        return vec![OutboundMessage::text(identity, MSG_SESSION_EXPIRED)];
    };

    match flow.select_step(step) {
        Ok(()) => {
            sessions.set(identity, Session::Flow(flow));
            vec![step_prompt_message(identity, step)]
        }
        Err(_) => {
            sessions.set(identity, Session::Flow(flow));
            vec![OutboundMessage::text(identity, MSG_USE_BUTTONS)]
        }
    }
}

// === Commit phase ===

/// Commits a confirmed flow.
///
/// The session is cleared on every outcome; it is never re-set here.
pub(crate) fn confirm(
    persistence: &mut Persistence,
    sessions: &mut SessionStore,
    ctx: &RequestContext,
    event: &InboundEvent,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    let Some(Session::Flow(flow)) = sessions.take(identity) else {
        return vec![OutboundMessage::text(identity, MSG_SESSION_EXPIRED)];
    };

    if flow.state() != FlowState::Confirming {
        sessions.set(identity, Session::Flow(flow));
        return vec![OutboundMessage::text(identity, MSG_USE_BUTTONS)];
    }

    match flow.kind() {
        FlowKind::Registration => commit_registration(persistence, ctx, event, &flow),
        FlowKind::WishEntry => commit_wish(persistence, ctx, &flow),
        FlowKind::CollectorRegistration => commit_collector(persistence, ctx, &flow),
    }
}

fn commit_registration(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    event: &InboundEvent,
    flow: &FlowSession,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;
    let form: RegistrationForm = match flow.registration_form() {
        Ok(form) => form,
        Err(err) => {
            error!(identity, %err, "Registration session data incomplete");
            return vec![OutboundMessage::text(identity, MSG_SESSION_EXPIRED)];
        }
    };

    let person = Person::new(
        identity,
        event.handle.clone(),
        form.family_name,
        form.given_name,
        form.patronymic,
        form.birth_date,
    );

    let result = match flow.mode() {
        FlowMode::Create => persistence.add_person(&person),
        FlowMode::Update => persistence.update_person(&person),
    };

    match result {
        Ok(()) => {
            let summary: String = format!(
                "Data saved!\n\n{}\n{}",
                person.full_name(),
                format_display_date(person.birth_date)
            );
            let mut messages: Vec<OutboundMessage> =
                vec![OutboundMessage::text(identity, summary)];
            if flow.mode() == FlowMode::Create {
                messages.push(OutboundMessage::text(
                    identity,
                    "You can now fill your wish list.",
                ));
            }
            messages
        }
        Err(PersistenceError::DuplicatePerson(_)) => {
            vec![OutboundMessage::text(identity, super::MSG_ALREADY_REGISTERED)]
        }
        Err(PersistenceError::PersonNotFound(_)) => {
            vec![OutboundMessage::with_buttons(
                identity,
                "Your profile was not found.\nPlease register:",
                vec![ActionButton::new("Register", &Action::Register)],
            )]
        }
        Err(err) => {
            error!(identity, %err, "Failed to save registration data");
            vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)]
        }
    }
}

fn commit_wish(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    flow: &FlowSession,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;
    let form: WishForm = match flow.wish_form() {
        Ok(form) => form,
        Err(err) => {
            error!(identity, %err, "Wish session data incomplete");
            return vec![OutboundMessage::text(identity, MSG_SESSION_EXPIRED)];
        }
    };

    let result = match form.target_wish_id {
        Some(wish_id) => persistence.update_wish(
            wish_id,
            identity,
            &form.wish_text,
            form.wish_url.as_deref(),
        ),
        None => persistence
            .add_wish(identity, &form.wish_text, form.wish_url.as_deref())
            .map(|_| ()),
    };

    match result {
        Ok(()) => {
            let mut summary: String = format!("Wish saved!\n\n{}", form.wish_text);
            if let Some(url) = &form.wish_url {
                summary.push_str(&format!("\n{url}"));
            }
            vec![OutboundMessage::text(identity, summary)]
        }
        Err(PersistenceError::WishNotFound { .. } | PersistenceError::PersonNotFound(_)) => {
            vec![OutboundMessage::text(
                identity,
                "Record not found in the database.",
            )]
        }
        Err(err) => {
            error!(identity, %err, "Failed to save wish");
            vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)]
        }
    }
}

fn commit_collector(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    flow: &FlowSession,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;
    let form: CollectorForm = match flow.collector_form() {
        Ok(form) => form,
        Err(err) => {
            error!(identity, %err, "Collector session data incomplete");
            return vec![OutboundMessage::text(identity, MSG_SESSION_EXPIRED)];
        }
    };

    let result = match flow.mode() {
        FlowMode::Create => persistence
            .create_collector(identity, &form.phone_number, form.bank_name.as_deref())
            // A freshly invited collector becomes the active one right away.
            .and_then(|_| persistence.set_active_collector(identity)),
        FlowMode::Update => {
            persistence.update_collector(identity, &form.phone_number, form.bank_name.as_deref())
        }
    };

    match result {
        Ok(_) => {
            vec![OutboundMessage::text(
                identity,
                format!(
                    "Transfer details saved!\n\nPhone: {}\nBank: {}",
                    form.phone_number,
                    form.bank_name.as_deref().unwrap_or("not specified")
                ),
            )]
        }
        Err(PersistenceError::DuplicateCollector(_)) => {
            vec![OutboundMessage::text(
                identity,
                "You already have transfer details. Use the collector panel to update them.",
            )]
        }
        Err(PersistenceError::CollectorNotFound(_)) => {
            vec![OutboundMessage::text(
                identity,
                "Collector record not found.",
            )]
        }
        Err(err) => {
            error!(identity, %err, "Failed to save collector data");
            vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)]
        }
    }
}

// === Rendering ===

/// The prompt for one collection step, with skip buttons where applicable.
pub(crate) fn step_prompt_message(identity: i64, step: FlowStep) -> OutboundMessage {
    match step {
        FlowStep::FamilyName => OutboundMessage::text(identity, "Enter your family name:"),
        FlowStep::GivenName => OutboundMessage::text(identity, "Now enter your given name:"),
        FlowStep::Patronymic => OutboundMessage::text(identity, "Enter your patronymic:"),
        FlowStep::BirthDate => {
            OutboundMessage::text(identity, "Enter your birth date as DD.MM.YYYY:")
        }
        FlowStep::WishText => OutboundMessage::text(identity, "Describe your wish:"),
        FlowStep::WishUrl => OutboundMessage::with_buttons(
            identity,
            "Enter a link to the gift:\nIf there is none, press 'No URL'.",
            vec![ActionButton::new("No URL", &Action::NoUrl)],
        ),
        FlowStep::PhoneNumber => OutboundMessage::text(
            identity,
            "Enter the phone number for transfers:\n+7XXXXXXXXXX or 8XXXXXXXXXX",
        ),
        FlowStep::BankName => OutboundMessage::with_buttons(
            identity,
            "Enter the bank name:",
            vec![ActionButton::new("No bank", &Action::SkipBank)],
        ),
    }
}

/// The re-prompt shown when a step rejects its input.
pub(crate) fn validation_message(step: FlowStep, err: &DomainError) -> String {
    match err {
        DomainError::InvalidName(_) => format!(
            "{} must contain only letters (2-50). Try again:",
            field_label(step)
        ),
        DomainError::InvalidBirthDate(_) => {
            String::from("Wrong date format. Try again as DD.MM.YYYY:")
        }
        DomainError::InvalidPhoneNumber(_) => String::from(
            "Wrong phone number format.\nUse +7XXXXXXXXXX or 8XXXXXXXXXX. Try again:",
        ),
        DomainError::InvalidBankName(reason) => format!("Bank name {reason}. Try again:"),
        DomainError::InvalidWishText(reason) => format!("Wish text {reason}. Try again:"),
        DomainError::InvalidWishUrl(reason) => format!("Invalid URL: {reason}. Try again:"),
    }
}

const fn field_label(step: FlowStep) -> &'static str {
    match step {
        FlowStep::FamilyName => "Family name",
        FlowStep::GivenName => "Given name",
        FlowStep::Patronymic => "Patronymic",
        FlowStep::BirthDate => "Birth date",
        FlowStep::WishText => "Wish text",
        FlowStep::WishUrl => "Wish URL",
        FlowStep::PhoneNumber => "Phone number",
        FlowStep::BankName => "Bank name",
    }
}

/// The confirmation screen: all collected values plus confirm / revise /
/// cancel.
pub(crate) fn confirmation_message(identity: i64, flow: &FlowSession) -> OutboundMessage {
    let summary: String = match flow.data() {
        FlowData::Registration(draft) => format!(
            "Check your data:\n\nFamily name: {}\nGiven name: {}\nPatronymic: {}\nBirth date: {}",
            draft.family_name.as_deref().unwrap_or("—"),
            draft.given_name.as_deref().unwrap_or("—"),
            draft.patronymic.as_deref().unwrap_or("—"),
            draft
                .birth_date
                .map_or_else(|| String::from("—"), format_display_date),
        ),
        FlowData::Wish(draft) => format!(
            "Check your wish:\n\n{}\nURL: {}",
            draft.wish_text.as_deref().unwrap_or("—"),
            draft.wish_url.as_deref().unwrap_or("none"),
        ),
        FlowData::Collector(draft) => format!(
            "Check your transfer details:\n\nPhone: {}\nBank: {}",
            draft.phone_number.as_deref().unwrap_or("—"),
            draft.bank_name.as_deref().unwrap_or("not specified"),
        ),
    };

    OutboundMessage::with_buttons(
        identity,
        summary,
        vec![
            ActionButton::new("Confirm", &Action::ConfirmYes),
            ActionButton::new("Revise", &Action::ConfirmNo),
            ActionButton::new("Cancel", &Action::Cancel),
        ],
    )
}

/// The edit-selection menu naming each field of the flow.
pub(crate) fn edit_menu_message(identity: i64, kind: FlowKind) -> OutboundMessage {
    let mut buttons: Vec<ActionButton> = kind
        .steps()
        .iter()
        .map(|step| ActionButton::new(field_label(*step), &Action::EditField(*step)))
        .collect();
    buttons.push(ActionButton::new("Cancel", &Action::Cancel));

    OutboundMessage::with_buttons(identity, "Choose what to change:", buttons)
}
