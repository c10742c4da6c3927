// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// A registered community member.
///
/// The identity key is assigned by the external channel and is immutable.
/// Name fields are non-empty once a person is registered; the birth year may
/// be a placeholder — only month and day are meaningful for scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Externally assigned identity key (immutable).
    pub person_id: i64,
    /// Optional unique handle from the external channel.
    pub handle: Option<String>,
    /// Family name (normalized to title case).
    pub family_name: String,
    /// Given name (normalized to title case).
    pub given_name: String,
    /// Patronymic (normalized to title case).
    pub patronymic: String,
    /// Birth date. Month and day drive notifications and purging.
    pub birth_date: Date,
}

impl Person {
    /// Creates a new `Person`.
    #[must_use]
    pub const fn new(
        person_id: i64,
        handle: Option<String>,
        family_name: String,
        given_name: String,
        patronymic: String,
        birth_date: Date,
    ) -> Self {
        Self {
            person_id,
            handle,
            family_name,
            given_name,
            patronymic,
            birth_date,
        }
    }

    /// Returns the full display name: "Family Given Patronymic".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!(
            "{} {} {}",
            self.family_name, self.given_name, self.patronymic
        )
    }

    /// Returns the abbreviated name: "Family G. P.".
    #[must_use]
    pub fn short_name(&self) -> String {
        let given_initial: String = self.given_name.chars().take(1).collect();
        let patronymic_initial: String = self.patronymic.chars().take(1).collect();
        format!(
            "{} {given_initial}. {patronymic_initial}.",
            self.family_name
        )
    }
}

/// A single wish-list entry owned by one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wish {
    /// Storage-assigned identifier. `None` before the wish is persisted.
    pub wish_id: Option<i64>,
    /// The owning person's identity key.
    pub person_id: i64,
    /// Free-text description of the wish.
    pub wish_text: String,
    /// Optional link to the wished item.
    pub wish_url: Option<String>,
}

impl Wish {
    /// Creates a new unpersisted `Wish`.
    #[must_use]
    pub const fn new(person_id: i64, wish_text: String, wish_url: Option<String>) -> Self {
        Self {
            wish_id: None,
            person_id,
            wish_text,
            wish_url,
        }
    }
}

/// A user-attested gift contribution record.
///
/// At most one transfer exists per (sender, honoree) pair. This is not money
/// movement — it is a log entry the sender confirms after transferring funds
/// to the active collector out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Storage-assigned identifier. `None` before the transfer is persisted.
    pub transfer_id: Option<i64>,
    /// The contributing person's identity key.
    pub sender_id: i64,
    /// The birthday person's identity key.
    pub honoree_id: i64,
    /// When the sender confirmed the contribution.
    pub recorded_at: OffsetDateTime,
}

/// Marks one person as holding elevated privilege.
///
/// Created by secret-phrase redemption; removed by the service user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminGrant {
    /// Storage-assigned identifier. `None` before the grant is persisted.
    pub grant_id: Option<i64>,
    /// The privileged person's identity key.
    pub person_id: i64,
}

/// Payment routing data for a person who may act as gift-fund collector.
///
/// At most one record system-wide has `is_active` set. Activation and
/// deactivation go exclusively through the invariant manager in the
/// persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorRecord {
    /// Storage-assigned identifier. `None` before the record is persisted.
    pub collector_id: Option<i64>,
    /// The collector's identity key.
    pub person_id: i64,
    /// Phone-equivalent token used for money transfers.
    pub phone_number: String,
    /// Optional bank label shown alongside the phone number.
    pub bank_name: Option<String>,
    /// Whether this collector currently receives transfers.
    pub is_active: bool,
}

impl CollectorRecord {
    /// Creates a new, inactive, unpersisted `CollectorRecord`.
    #[must_use]
    pub const fn new(person_id: i64, phone_number: String, bank_name: Option<String>) -> Self {
        Self {
            collector_id: None,
            person_id,
            phone_number,
            bank_name,
            is_active: false,
        }
    }
}
