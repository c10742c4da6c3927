// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wire DTOs at the channel boundary.
//!
//! The inbound channel transport is an external collaborator: it delivers
//! two event kinds — free-text/command messages and button-press callbacks —
//! each carrying the acting identity key, and it renders the outbound
//! message requests this core produces. Button payloads are opaque action
//! strings round-tripped through [`Action`].

use gift_fund::FlowStep;
use serde::{Deserialize, Serialize};

/// An inbound event from the channel gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// The acting identity key, assigned by the external channel.
    pub identity: i64,
    /// The actor's channel handle, when the channel knows one.
    #[serde(default)]
    pub handle: Option<String>,
    /// What the actor did.
    pub payload: InboundPayload,
}

impl InboundEvent {
    /// A free-text or command message.
    #[must_use]
    pub fn message(identity: i64, text: &str) -> Self {
        Self {
            identity,
            handle: None,
            payload: InboundPayload::Message(text.to_owned()),
        }
    }

    /// A button-press callback.
    #[must_use]
    pub fn callback(identity: i64, data: &str) -> Self {
        Self {
            identity,
            handle: None,
            payload: InboundPayload::Callback(data.to_owned()),
        }
    }
}

/// The two inbound event kinds the channel delivers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum InboundPayload {
    /// A free-text or command message.
    Message(String),
    /// A button-press callback carrying an action string.
    Callback(String),
}

/// One outbound message request.
///
/// Zero or more of these are produced per inbound event; the notifier
/// produces them independently of any inbound event. The gateway routes by
/// `recipient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// The identity key the message is addressed to.
    pub recipient: i64,
    /// Literal message text.
    pub text: String,
    /// Optional action buttons rendered under the message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<ActionButton>,
}

impl OutboundMessage {
    /// A plain text message.
    #[must_use]
    pub fn text(recipient: i64, text: impl Into<String>) -> Self {
        Self {
            recipient,
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    /// A message with action buttons.
    #[must_use]
    pub fn with_buttons(
        recipient: i64,
        text: impl Into<String>,
        buttons: Vec<ActionButton>,
    ) -> Self {
        Self {
            recipient,
            text: text.into(),
            buttons,
        }
    }
}

/// A single action button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    /// Visible label.
    pub label: String,
    /// Opaque callback payload, produced by [`Action::encode`].
    pub action: String,
}

impl ActionButton {
    /// Creates a button for an action.
    #[must_use]
    pub fn new(label: &str, action: &Action) -> Self {
        Self {
            label: label.to_owned(),
            action: action.encode(),
        }
    }
}

/// Every button-press action the dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Begin the registration flow.
    Register,
    /// Confirm the current flow's collected data.
    ConfirmYes,
    /// Ask to revise the current flow's data.
    ConfirmNo,
    /// Abandon the current session.
    Cancel,
    /// Re-enter one field of the current flow.
    EditField(FlowStep),
    /// Skip the wish-URL step.
    NoUrl,
    /// Skip the bank-name step.
    SkipBank,
    /// Enter the profile edit menu.
    EditProfile,
    /// Show the numbered wish selection.
    EditWishlist,
    /// Select one wish from the cached list.
    SelectWish {
        /// The selected wish.
        wish_id: i64,
    },
    /// Edit the selected wish.
    EditWish,
    /// Delete the selected wish.
    DeleteWish,
    /// Begin collector registration after an admin invitation.
    CreateCollectorData,
    /// Enter the collector data edit menu.
    UpdateCollectorData,
    /// Show the transfer report (active collector only).
    ViewTransfers,
    /// Show the active collector's payment details for an honoree.
    BirthdayGift {
        /// The honoree.
        honoree_id: i64,
    },
    /// Record a gift contribution for an honoree.
    Transferred {
        /// The honoree.
        honoree_id: i64,
    },
    /// Admin: start deleting a person by roster number.
    AdminDeleteUser,
    /// Admin: start assigning the active collector by roster number.
    AdminSetCollector,
    /// Admin: confirmed deletion of a person.
    ConfirmDeleteUser {
        /// The person to delete.
        person_id: i64,
    },
    /// Admin: confirmed collector assignment.
    ConfirmSetCollector {
        /// The person to activate.
        person_id: i64,
    },
    /// Service user: confirmed admin revocation.
    ConfirmRevokeAdmin {
        /// The admin to revoke.
        person_id: i64,
    },
}

impl Action {
    /// Encodes the action as an opaque callback payload.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Register => String::from("register"),
            Self::ConfirmYes => String::from("confirm_yes"),
            Self::ConfirmNo => String::from("confirm_no"),
            Self::Cancel => String::from("cancel"),
            Self::EditField(step) => format!("edit_{}", step.name()),
            Self::NoUrl => String::from("url_no"),
            Self::SkipBank => String::from("skip_bank"),
            Self::EditProfile => String::from("edit_user_data"),
            Self::EditWishlist => String::from("edit_wishlist"),
            Self::SelectWish { wish_id } => format!("select_wish:{wish_id}"),
            Self::EditWish => String::from("edit_wish"),
            Self::DeleteWish => String::from("delete_wish"),
            Self::CreateCollectorData => String::from("create_collector_data"),
            Self::UpdateCollectorData => String::from("update_collector_data"),
            Self::ViewTransfers => String::from("view_transfers"),
            Self::BirthdayGift { honoree_id } => format!("birthday_gift:{honoree_id}"),
            Self::Transferred { honoree_id } => format!("transferred:{honoree_id}"),
            Self::AdminDeleteUser => String::from("admin_delete_user"),
            Self::AdminSetCollector => String::from("admin_set_collector"),
            Self::ConfirmDeleteUser { person_id } => format!("confirm_delete_user:{person_id}"),
            Self::ConfirmSetCollector { person_id } => {
                format!("confirm_set_collector:{person_id}")
            }
            Self::ConfirmRevokeAdmin { person_id } => {
                format!("confirm_revoke_admin:{person_id}")
            }
        }
    }

    /// Parses a callback payload.
    ///
    /// Unknown payloads yield `None`; the dispatcher answers them with a
    /// generic unknown-action message rather than failing the request.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let plain: Option<Self> = match raw {
            "register" => Some(Self::Register),
            "confirm_yes" => Some(Self::ConfirmYes),
            "confirm_no" => Some(Self::ConfirmNo),
            "cancel" => Some(Self::Cancel),
            "url_no" => Some(Self::NoUrl),
            "skip_bank" => Some(Self::SkipBank),
            "edit_user_data" => Some(Self::EditProfile),
            "edit_wishlist" => Some(Self::EditWishlist),
            "edit_wish" => Some(Self::EditWish),
            "delete_wish" => Some(Self::DeleteWish),
            "create_collector_data" => Some(Self::CreateCollectorData),
            "update_collector_data" => Some(Self::UpdateCollectorData),
            "view_transfers" => Some(Self::ViewTransfers),
            "admin_delete_user" => Some(Self::AdminDeleteUser),
            "admin_set_collector" => Some(Self::AdminSetCollector),
            _ => None,
        };
        if plain.is_some() {
            return plain;
        }

        if let Some(step_name) = raw.strip_prefix("edit_") {
            if let Some(step) = parse_step(step_name) {
                return Some(Self::EditField(step));
            }
        }

        let (prefix, id) = raw.split_once(':')?;
        let id: i64 = id.parse().ok()?;
        match prefix {
            "select_wish" => Some(Self::SelectWish { wish_id: id }),
            "birthday_gift" => Some(Self::BirthdayGift { honoree_id: id }),
            "transferred" => Some(Self::Transferred { honoree_id: id }),
            "confirm_delete_user" => Some(Self::ConfirmDeleteUser { person_id: id }),
            "confirm_set_collector" => Some(Self::ConfirmSetCollector { person_id: id }),
            "confirm_revoke_admin" => Some(Self::ConfirmRevokeAdmin { person_id: id }),
            _ => None,
        }
    }
}

fn parse_step(name: &str) -> Option<FlowStep> {
    match name {
        "family_name" => Some(FlowStep::FamilyName),
        "given_name" => Some(FlowStep::GivenName),
        "patronymic" => Some(FlowStep::Patronymic),
        "birth_date" => Some(FlowStep::BirthDate),
        "wish_text" => Some(FlowStep::WishText),
        "wish_url" => Some(FlowStep::WishUrl),
        "phone_number" => Some(FlowStep::PhoneNumber),
        "bank_name" => Some(FlowStep::BankName),
        _ => None,
    }
}
