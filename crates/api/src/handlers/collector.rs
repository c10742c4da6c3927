// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The collector panel.

use gift_fund_persistence::Persistence;
use tracing::error;

use crate::auth::{self, RequestContext};
use crate::report;
use crate::request_response::{Action, ActionButton, OutboundMessage};

use super::{denial_text, MSG_UNEXPECTED_ERROR};

/// Shows the collector panel to a person holding a collector record.
pub(crate) fn show_panel(ctx: &RequestContext) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    let Some(record) = &ctx.collector else {
        return vec![OutboundMessage::text(
            identity,
            "You do not have access to the collector panel.",
        )];
    };

    let status: &str = if record.is_active {
        "Active"
    } else {
        "Inactive"
    };

    let text: String = format!(
        "Collector panel\n\nTransfer details:\nPhone number: {}\nBank: {}\n\nStatus: {status}\n\nChoose an action:",
        record.phone_number,
        record.bank_name.as_deref().unwrap_or("not specified"),
    );

    vec![OutboundMessage::with_buttons(
        identity,
        text,
        vec![
            ActionButton::new("Update details", &Action::UpdateCollectorData),
            ActionButton::new("View transfers", &Action::ViewTransfers),
        ],
    )]
}

/// Shows the transfer report, grouped by honoree.
///
/// Available to the active collector only.
pub(crate) fn view_transfers(
    persistence: &mut Persistence,
    ctx: &RequestContext,
) -> Vec<OutboundMessage> {
    let identity: i64 = ctx.identity;

    if let Err(err) = auth::require_active_collector(ctx) {
        return vec![OutboundMessage::text(identity, denial_text(err))];
    }

    match report::transfers_report_text(persistence) {
        Ok(text) => vec![OutboundMessage::text(identity, text)],
        Err(err) => {
            error!(identity, %err, "Failed to build the transfer report");
            vec![OutboundMessage::text(identity, MSG_UNEXPECTED_ERROR)]
        }
    }
}
