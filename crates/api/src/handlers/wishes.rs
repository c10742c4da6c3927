// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wish list display, selection, editing and deletion.
//!
//! Numbered selection works on a list cached in the session when the wish
//! list was last shown; a selection arriving after the cache is gone is a
//! `StateDataMissing` situation and answered with a session-expired message.

use gift_fund_domain::Wish;
use gift_fund_persistence::Persistence;
use tracing::error;

use crate::auth::RequestContext;
use crate::request_response::{Action, ActionButton, OutboundMessage};
use crate::sessions::{Session, SessionStore};

use super::{flows, MSG_SESSION_EXPIRED, MSG_UNEXPECTED_ERROR};

/// Shows the actor's wish list and caches it for numbered selection.
pub(crate) fn show_wish_list(
    persistence: &mut Persistence,
    sessions: &mut SessionStore,
    ctx: &RequestContext,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    let wishes: Vec<Wish> = match persistence.wishes_for_person(identity) {
        Ok(wishes) => wishes,
        Err(err) => {
            error!(identity, %err, "Failed to load the wish list");
            sessions.clear(identity);
            return vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)];
        }
    };

    if wishes.is_empty() {
        return vec![OutboundMessage::text(identity, "Your wish list is empty.")];
    }

    let mut text: String = String::from("Your wish list:\n\n");
    let mut wish_ids: Vec<i64> = Vec::with_capacity(wishes.len());
    for (number, wish) in wishes.iter().enumerate() {
        let line: String = wish.wish_url.as_deref().map_or_else(
            || format!("{}. {}\n", number + 1, wish.wish_text),
            |url| format!("{}. {} ({url})\n", number + 1, wish.wish_text),
        );
        text.push_str(&line);
        if let Some(wish_id) = wish.wish_id {
            wish_ids.push(wish_id);
        }
    }

    sessions.set(
        identity,
        Session::WishBrowse {
            wish_ids,
            selected: None,
        },
    );

    vec![OutboundMessage::with_buttons(
        identity,
        text,
        vec![ActionButton::new("Edit wish list", &Action::EditWishlist)],
    )]
}

/// Shows the numbered wish selection buttons.
pub(crate) fn show_wish_selection(
    sessions: &mut SessionStore,
    ctx: &RequestContext,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    let Some(Session::WishBrowse { wish_ids, selected }) = sessions.take(identity) else {
        return vec![OutboundMessage::text(identity, MSG_SESSION_EXPIRED)];
    };

    let buttons: Vec<ActionButton> = wish_ids
        .iter()
        .enumerate()
        .map(|(index, wish_id)| {
            ActionButton::new(
                &(index + 1).to_string(),
                &Action::SelectWish { wish_id: *wish_id },
            )
        })
        .collect();

    sessions.set(identity, Session::WishBrowse { wish_ids, selected });

    vec![OutboundMessage::with_buttons(
        identity,
        "Choose which wish to edit:",
        buttons,
    )]
}

/// Remembers the selected wish and offers edit/delete.
pub(crate) fn select_wish(
    sessions: &mut SessionStore,
    ctx: &RequestContext,
    wish_id: i64,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    let Some(Session::WishBrowse { wish_ids, .. }) = sessions.take(identity) else {
        return vec![OutboundMessage::text(identity, MSG_SESSION_EXPIRED)];
    };

    if !wish_ids.contains(&wish_id) {
        sessions.set(
            identity,
            Session::WishBrowse {
                wish_ids,
                selected: None,
            },
        );
        return vec![OutboundMessage::text(identity, MSG_SESSION_EXPIRED)];
    }

    sessions.set(
        identity,
        Session::WishBrowse {
            wish_ids,
            selected: Some(wish_id),
        },
    );

    vec![OutboundMessage::with_buttons(
        identity,
        "What would you like to do with this wish?",
        vec![
            ActionButton::new("Edit", &Action::EditWish),
            ActionButton::new("Delete", &Action::DeleteWish),
            ActionButton::new("Cancel", &Action::Cancel),
        ],
    )]
}

/// Opens the edit menu for the selected wish.
pub(crate) fn begin_wish_edit(
    persistence: &mut Persistence,
    sessions: &mut SessionStore,
    ctx: &RequestContext,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    let Some(Session::WishBrowse {
        selected: Some(wish_id),
        ..
    }) = sessions.take(identity)
    else {
        return vec![OutboundMessage::text(identity, MSG_SESSION_EXPIRED)];
    };

    let wish: Wish = match persistence.get_wish(wish_id) {
        Ok(wish) if wish.person_id == identity => wish,
        Ok(_) | Err(_) => {
            error!(identity, wish_id, "Failed to load wish for editing");
            return vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)];
        }
    };

    flows::begin_wish_revision(sessions, identity, wish_id, wish.wish_text, wish.wish_url)
}

/// Deletes the selected wish.
pub(crate) fn delete_selected_wish(
    persistence: &mut Persistence,
    sessions: &mut SessionStore,
    ctx: &RequestContext,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    let Some(Session::WishBrowse {
        selected: Some(wish_id),
        ..
    }) = sessions.take(identity)
    else {
        return vec![OutboundMessage::text(identity, MSG_SESSION_EXPIRED)];
    };

    match persistence.delete_wish(wish_id, identity) {
        Ok(()) => vec![OutboundMessage::text(identity, "Wish deleted.")],
        Err(err) => {
            error!(identity, wish_id, %err, "Failed to delete wish");
            vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)]
        }
    }
}
