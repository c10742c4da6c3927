// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The inbound event dispatcher and its handler groups.
//!
//! Control flow per event: resolve the request context (authorization
//! chain), apply the registration gate, then route to the owning workflow or
//! direct command handler. Domain errors are answered where they are
//! meaningful; unexpected errors are caught here at the outermost boundary,
//! logged with context, answered with a generic failure message, and the
//! session — if any — is cleared so nothing dangles.

mod admin;
mod birthdays;
mod collector;
mod flows;
mod menu;
mod roles;
mod service;
mod wishes;

use gift_fund_persistence::Persistence;
use time::OffsetDateTime;
use tracing::{error, warn};

use crate::auth::{self, RequestContext};
use crate::error::AuthError;
use crate::request_response::{Action, ActionButton, InboundEvent, InboundPayload, OutboundMessage};
use crate::sessions::{Session, SessionStore};

/// Secret phrases redeemable for elevated roles.
///
/// Loaded from configuration at startup; never persisted.
#[derive(Debug, Clone)]
pub struct Secrets {
    /// Phrase granting an admin role.
    pub admin_phrase: String,
    /// Phrase designating the service user.
    pub service_phrase: String,
}

pub(crate) const CMD_START: &str = "/start";
pub(crate) const CMD_GET_ADMIN: &str = "/get_admin";
pub(crate) const CMD_GET_SERVICE_USER: &str = "/get_service_user";
pub(crate) const CMD_ADMIN_LIST: &str = "/admin_list";

pub(crate) const MENU_MY_DATA: &str = "My data";
pub(crate) const MENU_MY_WISHES: &str = "My wishes";
pub(crate) const MENU_ADD_WISH: &str = "Add wish";
pub(crate) const MENU_BIRTHDAYS: &str = "Birthdays";
pub(crate) const MENU_COLLECTOR_PANEL: &str = "Collector panel";
pub(crate) const MENU_ADMIN_PANEL: &str = "Admin panel";
pub(crate) const MENU_SUPPORT: &str = "Support";
pub(crate) const MENU_CANCEL: &str = "Cancel";

pub(crate) const MSG_SERVER_ERROR: &str = "Server error, please try again later.";
pub(crate) const MSG_UNEXPECTED_ERROR: &str = "An unexpected error occurred.";
pub(crate) const MSG_SESSION_EXPIRED: &str = "Your session has expired.";
pub(crate) const MSG_CANCELLED: &str = "Input cancelled.";
pub(crate) const MSG_ALREADY_REGISTERED: &str = "You are already registered.";
pub(crate) const MSG_NO_ADMIN_RIGHTS: &str = "You do not have admin rights.";
pub(crate) const MSG_NO_SERVICE_RIGHTS: &str = "You do not have service-user rights.";
pub(crate) const MSG_COLLECTOR_ONLY: &str = "Available to the active collector only.";
pub(crate) const MSG_UNKNOWN_ACTION: &str = "This action is no longer available.";
pub(crate) const MSG_USE_MENU: &str = "Use the menu, or /start to begin.";

/// Maps a failed role gate to its denial message.
pub(crate) const fn denial_text(err: AuthError) -> &'static str {
    match err {
        AuthError::AdminRequired => MSG_NO_ADMIN_RIGHTS,
        AuthError::ServiceUserRequired => MSG_NO_SERVICE_RIGHTS,
        AuthError::ActiveCollectorRequired => MSG_COLLECTOR_ONLY,
    }
}

/// Handles one inbound event and returns the outbound message requests.
///
/// This function never fails: every error path is converted into messages
/// for the acting identity, and unexpected persistence failures clear the
/// actor's session.
pub fn dispatch(
    persistence: &mut Persistence,
    sessions: &mut SessionStore,
    secrets: &Secrets,
    event: &InboundEvent,
    now: OffsetDateTime,
) -> Vec<OutboundMessage> {
    let identity: i64 = event.identity;

    let ctx: RequestContext = match auth::resolve_context(persistence, identity) {
        Ok(ctx) => ctx,
        Err(err) => {
            error!(identity, %err, "Identity resolution failed, dropping event");
            return vec![OutboundMessage::text(identity, MSG_SERVER_ERROR)];
        }
    };

    // Registration gate.
    if ctx.is_registered() {
        if matches!(&event.payload, InboundPayload::Callback(data) if data == "register") {
            return vec![OutboundMessage::text(identity, MSG_ALREADY_REGISTERED)];
        }
    } else {
        // The registration workflow's own inputs (field text, confirm,
        // revise, edit buttons) must pass while the flow is in progress.
        let allowed: bool = match &event.payload {
            InboundPayload::Message(text) => {
                text == CMD_START || sessions.in_registration_flow(identity)
            }
            InboundPayload::Callback(data) => {
                data == "register" || sessions.in_registration_flow(identity)
            }
        };
        if !allowed {
            return vec![OutboundMessage::with_buttons(
                identity,
                "You are not registered.\nPress the button to register:",
                vec![ActionButton::new("Register", &Action::Register)],
            )];
        }
    }

    match &event.payload {
        InboundPayload::Message(text) => {
            dispatch_message(persistence, sessions, secrets, &ctx, text, now)
        }
        InboundPayload::Callback(raw) => Action::parse(raw).map_or_else(
            || {
                warn!(identity, raw, "Unknown callback payload");
                vec![OutboundMessage::text(identity, MSG_UNKNOWN_ACTION)]
            },
            |action| dispatch_action(persistence, sessions, &ctx, event, action, now),
        ),
    }
}

/// Routes a free-text or command message.
fn dispatch_message(
    persistence: &mut Persistence,
    sessions: &mut SessionStore,
    secrets: &Secrets,
    ctx: &RequestContext,
    text: &str,
    now: OffsetDateTime,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    match text.trim() {
        CMD_START => {
            return vec![OutboundMessage::with_buttons(
                identity,
                "Welcome!\nTo get started, register yourself:",
                vec![ActionButton::new("Register", &Action::Register)],
            )];
        }
        CMD_GET_ADMIN => return roles::begin_admin_phrase(sessions, ctx),
        CMD_GET_SERVICE_USER => return roles::begin_service_phrase(sessions, ctx),
        CMD_ADMIN_LIST => return service::show_admin_list(persistence, sessions, ctx),
        MENU_MY_DATA => return menu::show_profile(ctx),
        MENU_MY_WISHES => return wishes::show_wish_list(persistence, sessions, ctx),
        MENU_ADD_WISH => return flows::begin_add_wish(sessions, ctx),
        MENU_BIRTHDAYS => return birthdays::show_birthdays(persistence, ctx, now),
        MENU_COLLECTOR_PANEL => return collector::show_panel(ctx),
        MENU_ADMIN_PANEL => return admin::show_panel(persistence, sessions, ctx),
        MENU_SUPPORT => return menu::show_support(persistence, ctx),
        MENU_CANCEL => {
            sessions.clear(identity);
            return vec![OutboundMessage::text(identity, MSG_CANCELLED)];
        }
        _ => {}
    }

    // Not a command or menu label: feed it to the in-progress session.
    match sessions.take(identity) {
        Some(Session::Flow(flow)) => flows::handle_flow_text(sessions, ctx, flow, text),
        Some(Session::AwaitingAdminPhrase) => {
            roles::check_admin_phrase(persistence, sessions, secrets, ctx, text)
        }
        Some(Session::AwaitingServicePhrase) => {
            roles::check_service_phrase(persistence, sessions, secrets, ctx, text)
        }
        Some(Session::AdminAwaitingNumber { purpose, roster }) => {
            admin::handle_roster_number(persistence, sessions, ctx, purpose, roster, text)
        }
        Some(Session::ServiceAwaitingNumber { roster }) => {
            service::handle_roster_number(persistence, sessions, ctx, roster, text)
        }
        Some(other) => {
            // Panel and wish-list caches are not waiting for text; keep them.
            sessions.set(identity, other);
            vec![OutboundMessage::text(identity, MSG_USE_MENU)]
        }
        None => vec![OutboundMessage::text(identity, MSG_USE_MENU)],
    }
}

/// Routes a parsed button-press action.
fn dispatch_action(
    persistence: &mut Persistence,
    sessions: &mut SessionStore,
    ctx: &RequestContext,
    event: &InboundEvent,
    action: Action,
    now: OffsetDateTime,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    match action {
        Action::Register => flows::begin_registration(sessions, ctx),
        Action::Cancel => {
            sessions.clear(identity);
            vec![OutboundMessage::text(identity, "Action cancelled.")]
        }
        Action::ConfirmYes => flows::confirm(persistence, sessions, ctx, event),
        Action::ConfirmNo => flows::request_revision(sessions, ctx),
        Action::EditField(step) => flows::edit_field(sessions, ctx, step),
        Action::NoUrl | Action::SkipBank => flows::skip_step(sessions, ctx),
        Action::EditProfile => flows::begin_profile_edit(sessions, ctx),
        Action::EditWishlist => wishes::show_wish_selection(sessions, ctx),
        Action::SelectWish { wish_id } => wishes::select_wish(sessions, ctx, wish_id),
        Action::EditWish => wishes::begin_wish_edit(persistence, sessions, ctx),
        Action::DeleteWish => wishes::delete_selected_wish(persistence, sessions, ctx),
        Action::CreateCollectorData => flows::begin_collector_create(sessions, ctx),
        Action::UpdateCollectorData => flows::begin_collector_update(sessions, ctx),
        Action::ViewTransfers => collector::view_transfers(persistence, ctx),
        Action::BirthdayGift { honoree_id } => {
            birthdays::show_gift_details(persistence, ctx, honoree_id)
        }
        Action::Transferred { honoree_id } => {
            birthdays::record_contribution(persistence, ctx, honoree_id, now)
        }
        Action::AdminDeleteUser => {
            admin::begin_selection(sessions, ctx, crate::sessions::AdminSelection::DeletePerson)
        }
        Action::AdminSetCollector => {
            admin::begin_selection(sessions, ctx, crate::sessions::AdminSelection::AssignCollector)
        }
        Action::ConfirmDeleteUser { person_id } => {
            admin::confirm_delete_person(persistence, ctx, person_id)
        }
        Action::ConfirmSetCollector { person_id } => {
            admin::confirm_assign_collector(persistence, ctx, person_id)
        }
        Action::ConfirmRevokeAdmin { person_id } => {
            service::confirm_revoke_admin(persistence, ctx, person_id)
        }
    }
}
