// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Secret-phrase redemption for the admin and service-user roles.
//!
//! A wrong phrase re-prompts and keeps the session waiting; redeeming a
//! phrase is a terminal transition and clears the session whatever the
//! persistence outcome.

use gift_fund_persistence::{Persistence, PersistenceError};
use tracing::{error, info, warn};

use crate::auth::RequestContext;
use crate::request_response::OutboundMessage;
use crate::sessions::{Session, SessionStore};

use super::{Secrets, MSG_UNEXPECTED_ERROR};

const MSG_WRONG_PHRASE: &str = "Wrong phrase.\nTry again:";

/// Starts the admin-phrase redemption flow.
pub(crate) fn begin_admin_phrase(
    sessions: &mut SessionStore,
    ctx: &RequestContext,
) -> Vec<OutboundMessage> {
    sessions.set(ctx.identity, Session::AwaitingAdminPhrase);
    vec![OutboundMessage::text(
        ctx.identity,
        "To receive admin rights,\nenter the secret phrase:",
    )]
}

/// Starts the service-phrase redemption flow.
pub(crate) fn begin_service_phrase(
    sessions: &mut SessionStore,
    ctx: &RequestContext,
) -> Vec<OutboundMessage> {
    sessions.set(ctx.identity, Session::AwaitingServicePhrase);
    vec![OutboundMessage::text(
        ctx.identity,
        "To become the service user,\nenter the secret phrase:",
    )]
}

/// Checks a typed admin phrase.
///
/// The dispatcher has already taken the session; it is re-set only when the
/// phrase was wrong and another attempt is expected.
pub(crate) fn check_admin_phrase(
    persistence: &mut Persistence,
    sessions: &mut SessionStore,
    secrets: &Secrets,
    ctx: &RequestContext,
    text: &str,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    if text != secrets.admin_phrase {
        warn!(identity, "Wrong admin phrase attempt");
        sessions.set(identity, Session::AwaitingAdminPhrase);
        return vec![OutboundMessage::text(identity, MSG_WRONG_PHRASE)];
    }

    match persistence.add_admin_grant(identity) {
        Ok(()) => {
            info!(identity, "Admin grant redeemed");
            vec![OutboundMessage::text(
                identity,
                "Rights granted!\n\nThe admin panel is now available in the menu.",
            )]
        }
        Err(PersistenceError::DuplicateAdminGrant(_)) => vec![OutboundMessage::text(
            identity,
            "You already have admin rights.",
        )],
        Err(err) => {
            error!(identity, %err, "Failed to add the admin grant");
            vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)]
        }
    }
}

/// Checks a typed service phrase.
pub(crate) fn check_service_phrase(
    persistence: &mut Persistence,
    sessions: &mut SessionStore,
    secrets: &Secrets,
    ctx: &RequestContext,
    text: &str,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    if text != secrets.service_phrase {
        warn!(identity, "Wrong service phrase attempt");
        sessions.set(identity, Session::AwaitingServicePhrase);
        return vec![OutboundMessage::text(identity, MSG_WRONG_PHRASE)];
    }

    match persistence.set_service_user(identity) {
        Ok(()) => {
            info!(identity, "Service user designated");
            vec![OutboundMessage::text(
                identity,
                "Rights granted!\n\nUse /admin_list to manage the admin list.",
            )]
        }
        Err(err) => {
            error!(identity, %err, "Failed to set the service user");
            vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)]
        }
    }
}
