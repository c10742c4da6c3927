// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transient per-session data accumulated during a flow.
//!
//! Drafts hold partially collected fields; forms are the completed values a
//! caller commits. A draft converts to a form only once every required field
//! has been collected.

use crate::error::CoreError;
use crate::flow::FlowKind;
use time::Date;

/// Transient data for one in-progress flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowData {
    /// Registration fields.
    Registration(RegistrationDraft),
    /// Wish fields.
    Wish(WishDraft),
    /// Collector fields.
    Collector(CollectorDraft),
}

impl FlowData {
    /// Returns an empty draft for the given flow.
    #[must_use]
    pub const fn empty(kind: FlowKind) -> Self {
        match kind {
            FlowKind::Registration => Self::Registration(RegistrationDraft::new()),
            FlowKind::WishEntry => Self::Wish(WishDraft::new(None)),
            FlowKind::CollectorRegistration => Self::Collector(CollectorDraft::new()),
        }
    }

    /// Returns the flow this data belongs to.
    #[must_use]
    pub const fn kind(&self) -> FlowKind {
        match self {
            Self::Registration(_) => FlowKind::Registration,
            Self::Wish(_) => FlowKind::WishEntry,
            Self::Collector(_) => FlowKind::CollectorRegistration,
        }
    }
}

/// Partially collected registration fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    /// Family name, once collected.
    pub family_name: Option<String>,
    /// Given name, once collected.
    pub given_name: Option<String>,
    /// Patronymic, once collected.
    pub patronymic: Option<String>,
    /// Birth date, once collected.
    pub birth_date: Option<Date>,
}

impl RegistrationDraft {
    /// Creates an empty draft.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            family_name: None,
            given_name: None,
            patronymic: None,
            birth_date: None,
        }
    }

    /// Converts the draft into a complete form.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::IncompleteDraft` naming the first missing field.
    pub fn into_form(self) -> Result<RegistrationForm, CoreError> {
        Ok(RegistrationForm {
            family_name: self
                .family_name
                .ok_or(CoreError::IncompleteDraft {
                    field: "family_name",
                })?,
            given_name: self.given_name.ok_or(CoreError::IncompleteDraft {
                field: "given_name",
            })?,
            patronymic: self.patronymic.ok_or(CoreError::IncompleteDraft {
                field: "patronymic",
            })?,
            birth_date: self.birth_date.ok_or(CoreError::IncompleteDraft {
                field: "birth_date",
            })?,
        })
    }
}

/// Completed registration values, ready to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub family_name: String,
    pub given_name: String,
    pub patronymic: String,
    pub birth_date: Date,
}

/// Partially collected wish fields.
///
/// `wish_url` is optional by design: `url_collected` distinguishes "not yet
/// asked" from "explicitly skipped".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishDraft {
    /// Wish description, once collected.
    pub wish_text: Option<String>,
    /// Item URL, if one was provided.
    pub wish_url: Option<String>,
    /// Whether the URL step has been answered (value or skip).
    pub url_collected: bool,
    /// The wish being edited, when the session updates an existing record.
    pub target_wish_id: Option<i64>,
}

impl WishDraft {
    /// Creates a draft, optionally targeting an existing wish.
    #[must_use]
    pub const fn new(target_wish_id: Option<i64>) -> Self {
        Self {
            wish_text: None,
            wish_url: None,
            url_collected: false,
            target_wish_id,
        }
    }

    /// Converts the draft into a complete form.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::IncompleteDraft` if the description is missing.
    pub fn into_form(self) -> Result<WishForm, CoreError> {
        Ok(WishForm {
            wish_text: self
                .wish_text
                .ok_or(CoreError::IncompleteDraft { field: "wish_text" })?,
            wish_url: self.wish_url,
            target_wish_id: self.target_wish_id,
        })
    }
}

/// Completed wish values, ready to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishForm {
    pub wish_text: String,
    pub wish_url: Option<String>,
    /// `Some` when the commit updates an existing wish.
    pub target_wish_id: Option<i64>,
}

/// Partially collected collector fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectorDraft {
    /// Phone number, once collected.
    pub phone_number: Option<String>,
    /// Bank label, if one was provided.
    pub bank_name: Option<String>,
}

impl CollectorDraft {
    /// Creates an empty draft.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phone_number: None,
            bank_name: None,
        }
    }

    /// Converts the draft into a complete form.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::IncompleteDraft` if the phone number is missing.
    pub fn into_form(self) -> Result<CollectorForm, CoreError> {
        Ok(CollectorForm {
            phone_number: self.phone_number.ok_or(CoreError::IncompleteDraft {
                field: "phone_number",
            })?,
            bank_name: self.bank_name,
        })
    }
}

/// Completed collector values, ready to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorForm {
    pub phone_number: String,
    pub bank_name: Option<String>,
}
