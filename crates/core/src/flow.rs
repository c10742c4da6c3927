// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// The three multi-step flows driven by the workflow engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    /// Collects a person's name fields and birth date.
    Registration,
    /// Collects a wish description and an optional URL.
    WishEntry,
    /// Collects a collector's payment routing data.
    CollectorRegistration,
}

impl FlowKind {
    /// Returns the first collection step of this flow.
    #[must_use]
    pub const fn first_step(self) -> FlowStep {
        match self {
            Self::Registration => FlowStep::FamilyName,
            Self::WishEntry => FlowStep::WishText,
            Self::CollectorRegistration => FlowStep::PhoneNumber,
        }
    }

    /// Returns every collection step of this flow, in order.
    #[must_use]
    pub const fn steps(self) -> &'static [FlowStep] {
        match self {
            Self::Registration => &[
                FlowStep::FamilyName,
                FlowStep::GivenName,
                FlowStep::Patronymic,
                FlowStep::BirthDate,
            ],
            Self::WishEntry => &[FlowStep::WishText, FlowStep::WishUrl],
            Self::CollectorRegistration => &[FlowStep::PhoneNumber, FlowStep::BankName],
        }
    }
}

impl std::fmt::Display for FlowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name: &str = match self {
            Self::Registration => "registration",
            Self::WishEntry => "wish entry",
            Self::CollectorRegistration => "collector registration",
        };
        write!(f, "{name}")
    }
}

/// Whether a flow creates a new record or updates an existing one.
///
/// The distinction only matters at commit time; collection, confirmation and
/// editing behave identically in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowMode {
    /// Commit creates a new record.
    Create,
    /// Commit updates the record the session was seeded from.
    Update,
}

/// A single named collection step.
///
/// Entering a step means "waiting for one specific kind of input". Steps are
/// namespaced by flow; feeding a step to a session of another flow is a
/// transition error, not a panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    /// Registration: family name.
    FamilyName,
    /// Registration: given name.
    GivenName,
    /// Registration: patronymic.
    Patronymic,
    /// Registration: birth date in `DD.MM.YYYY` form.
    BirthDate,
    /// Wish entry: free-text description.
    WishText,
    /// Wish entry: optional item URL.
    WishUrl,
    /// Collector registration: phone number for transfers.
    PhoneNumber,
    /// Collector registration: optional bank label.
    BankName,
}

impl FlowStep {
    /// Returns the flow this step belongs to.
    #[must_use]
    pub const fn kind(self) -> FlowKind {
        match self {
            Self::FamilyName | Self::GivenName | Self::Patronymic | Self::BirthDate => {
                FlowKind::Registration
            }
            Self::WishText | Self::WishUrl => FlowKind::WishEntry,
            Self::PhoneNumber | Self::BankName => FlowKind::CollectorRegistration,
        }
    }

    /// Returns the step after this one in the linear collection phase.
    ///
    /// `None` means this is the last step and the flow proceeds to
    /// confirmation.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::FamilyName => Some(Self::GivenName),
            Self::GivenName => Some(Self::Patronymic),
            Self::Patronymic => Some(Self::BirthDate),
            Self::WishText => Some(Self::WishUrl),
            Self::PhoneNumber => Some(Self::BankName),
            Self::BirthDate | Self::WishUrl | Self::BankName => None,
        }
    }

    /// Whether the step may be skipped, leaving its field unset.
    #[must_use]
    pub const fn is_optional(self) -> bool {
        matches!(self, Self::WishUrl | Self::BankName)
    }

    /// Stable machine name, used in transition errors and logging.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FamilyName => "family_name",
            Self::GivenName => "given_name",
            Self::Patronymic => "patronymic",
            Self::BirthDate => "birth_date",
            Self::WishText => "wish_text",
            Self::WishUrl => "wish_url",
            Self::PhoneNumber => "phone_number",
            Self::BankName => "bank_name",
        }
    }
}

impl std::fmt::Display for FlowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
