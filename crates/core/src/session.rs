// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The per-identity workflow session state machine.

use crate::data::{CollectorForm, FlowData, RegistrationForm, WishForm};
use crate::error::CoreError;
use crate::flow::{FlowKind, FlowMode, FlowStep};
use gift_fund_domain::{
    parse_birth_date, validate_bank_name, validate_name, validate_phone_number,
    validate_wish_text, validate_wish_url,
};

/// The state of one in-progress flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// Waiting for input to a specific step.
    Collecting(FlowStep),
    /// All fields collected; waiting for confirm / revise / cancel.
    Confirming,
    /// Waiting for the user to pick which field to correct.
    EditSelecting,
}

impl FlowState {
    /// Stable machine name, used in transition errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Collecting(_) => "collecting",
            Self::Confirming => "confirming",
            Self::EditSelecting => "edit_selecting",
        }
    }
}

/// The result of successfully accepting input for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAdvance {
    /// The flow moved on to the next collection step.
    Next(FlowStep),
    /// All fields are collected; the flow is now confirming.
    Confirm,
}

/// One identity's in-progress flow: current state plus transient data.
///
/// Sessions are pure values. Persistence of the confirmed form, message
/// rendering, and session storage all belong to the caller. Every terminal
/// transition (commit outcome or cancel) is expressed by the caller dropping
/// the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSession {
    kind: FlowKind,
    mode: FlowMode,
    state: FlowState,
    data: FlowData,
    /// Set while a single field is being corrected: the next accepted input
    /// returns to confirmation instead of advancing linearly.
    editing_field: bool,
}

impl FlowSession {
    /// Starts a fresh flow at its first collection step.
    #[must_use]
    pub const fn begin(kind: FlowKind, mode: FlowMode) -> Self {
        Self {
            kind,
            mode,
            state: FlowState::Collecting(kind.first_step()),
            data: FlowData::empty(kind),
            editing_field: false,
        }
    }

    /// Starts a revision of an existing record.
    ///
    /// The session is seeded with the record's current values and opens in
    /// the edit-selection state; the user picks a field, corrects it, and
    /// confirms the full form.
    #[must_use]
    pub const fn begin_revision(data: FlowData) -> Self {
        Self {
            kind: data.kind(),
            mode: FlowMode::Update,
            state: FlowState::EditSelecting,
            data,
            editing_field: false,
        }
    }

    /// Returns the flow kind.
    #[must_use]
    pub const fn kind(&self) -> FlowKind {
        self.kind
    }

    /// Returns whether commit creates or updates.
    #[must_use]
    pub const fn mode(&self) -> FlowMode {
        self.mode
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> FlowState {
        self.state
    }

    /// Returns the collected data.
    #[must_use]
    pub const fn data(&self) -> &FlowData {
        &self.data
    }

    /// Returns the step currently waiting for input, if any.
    #[must_use]
    pub const fn current_step(&self) -> Option<FlowStep> {
        match self.state {
            FlowState::Collecting(step) => Some(step),
            FlowState::Confirming | FlowState::EditSelecting => None,
        }
    }

    /// Accepts free-text input for the current collection step.
    ///
    /// On validation failure the session is left exactly as it was — same
    /// step, previously collected fields intact — and the caller re-prompts.
    /// On success the value is stored and the flow advances: to the next
    /// step, or straight to confirmation when the last step completes or a
    /// single field was being corrected.
    ///
    /// # Errors
    ///
    /// * `CoreError::Validation` — the input failed the step's field rule
    /// * `CoreError::InvalidTransition` — the session is not collecting
    pub fn submit_text(&mut self, input: &str) -> Result<StepAdvance, CoreError> {
        let FlowState::Collecting(step) = self.state else {
            return Err(CoreError::InvalidTransition {
                state: self.state.name(),
                action: "submit_text",
            });
        };

        self.store_value(step, input)?;
        Ok(self.advance_from(step))
    }

    /// Skips the current step, leaving its optional field unset.
    ///
    /// # Errors
    ///
    /// * `CoreError::StepNotSkippable` — the step requires a value
    /// * `CoreError::InvalidTransition` — the session is not collecting
    pub fn skip_step(&mut self) -> Result<StepAdvance, CoreError> {
        let FlowState::Collecting(step) = self.state else {
            return Err(CoreError::InvalidTransition {
                state: self.state.name(),
                action: "skip_step",
            });
        };
        if !step.is_optional() {
            return Err(CoreError::StepNotSkippable(step));
        }

        match (&mut self.data, step) {
            (FlowData::Wish(draft), FlowStep::WishUrl) => {
                draft.wish_url = None;
                draft.url_collected = true;
            }
            (FlowData::Collector(draft), FlowStep::BankName) => {
                draft.bank_name = None;
            }
            _ => {
                return Err(CoreError::StepOutsideFlow {
                    step,
                    kind: self.data.kind(),
                });
            }
        }

        Ok(self.advance_from(step))
    }

    /// Moves from confirmation to the edit-selection menu.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the session is not
    /// confirming.
    pub fn request_revision(&mut self) -> Result<(), CoreError> {
        if self.state != FlowState::Confirming {
            return Err(CoreError::InvalidTransition {
                state: self.state.name(),
                action: "request_revision",
            });
        }
        self.state = FlowState::EditSelecting;
        Ok(())
    }

    /// Re-enters a single field's collection step in edit mode.
    ///
    /// # Errors
    ///
    /// * `CoreError::StepOutsideFlow` — the step belongs to another flow
    /// * `CoreError::InvalidTransition` — the session is not edit-selecting
    pub fn select_step(&mut self, step: FlowStep) -> Result<(), CoreError> {
        if self.state != FlowState::EditSelecting {
            return Err(CoreError::InvalidTransition {
                state: self.state.name(),
                action: "select_step",
            });
        }
        if step.kind() != self.kind {
            return Err(CoreError::StepOutsideFlow {
                step,
                kind: self.kind,
            });
        }
        self.state = FlowState::Collecting(step);
        self.editing_field = true;
        Ok(())
    }

    /// Returns the completed registration form.
    ///
    /// # Errors
    ///
    /// * `CoreError::InvalidTransition` — the session is not confirming
    /// * `CoreError::IncompleteDraft` — a required field was never collected
    /// * `CoreError::StepOutsideFlow` — the session is not a registration
    pub fn registration_form(&self) -> Result<RegistrationForm, CoreError> {
        self.require_confirming("registration_form")?;
        match &self.data {
            FlowData::Registration(draft) => draft.clone().into_form(),
            FlowData::Wish(_) | FlowData::Collector(_) => Err(CoreError::StepOutsideFlow {
                step: FlowStep::FamilyName,
                kind: self.kind,
            }),
        }
    }

    /// Returns the completed wish form.
    ///
    /// # Errors
    ///
    /// Mirrors [`Self::registration_form`].
    pub fn wish_form(&self) -> Result<WishForm, CoreError> {
        self.require_confirming("wish_form")?;
        match &self.data {
            FlowData::Wish(draft) => draft.clone().into_form(),
            FlowData::Registration(_) | FlowData::Collector(_) => {
                Err(CoreError::StepOutsideFlow {
                    step: FlowStep::WishText,
                    kind: self.kind,
                })
            }
        }
    }

    /// Returns the completed collector form.
    ///
    /// # Errors
    ///
    /// Mirrors [`Self::registration_form`].
    pub fn collector_form(&self) -> Result<CollectorForm, CoreError> {
        self.require_confirming("collector_form")?;
        match &self.data {
            FlowData::Collector(draft) => draft.clone().into_form(),
            FlowData::Registration(_) | FlowData::Wish(_) => Err(CoreError::StepOutsideFlow {
                step: FlowStep::PhoneNumber,
                kind: self.kind,
            }),
        }
    }

    fn require_confirming(&self, action: &'static str) -> Result<(), CoreError> {
        if self.state == FlowState::Confirming {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                state: self.state.name(),
                action,
            })
        }
    }

    /// Validates and stores one field value.
    fn store_value(&mut self, step: FlowStep, input: &str) -> Result<(), CoreError> {
        match (&mut self.data, step) {
            (FlowData::Registration(draft), FlowStep::FamilyName) => {
                draft.family_name = Some(validate_name(input)?);
            }
            (FlowData::Registration(draft), FlowStep::GivenName) => {
                draft.given_name = Some(validate_name(input)?);
            }
            (FlowData::Registration(draft), FlowStep::Patronymic) => {
                draft.patronymic = Some(validate_name(input)?);
            }
            (FlowData::Registration(draft), FlowStep::BirthDate) => {
                draft.birth_date = Some(parse_birth_date(input)?);
            }
            (FlowData::Wish(draft), FlowStep::WishText) => {
                draft.wish_text = Some(validate_wish_text(input)?);
            }
            (FlowData::Wish(draft), FlowStep::WishUrl) => {
                draft.wish_url = Some(validate_wish_url(input)?);
                draft.url_collected = true;
            }
            (FlowData::Collector(draft), FlowStep::PhoneNumber) => {
                draft.phone_number = Some(validate_phone_number(input)?);
            }
            (FlowData::Collector(draft), FlowStep::BankName) => {
                draft.bank_name = Some(validate_bank_name(input)?);
            }
            _ => {
                return Err(CoreError::StepOutsideFlow {
                    step,
                    kind: self.data.kind(),
                });
            }
        }
        Ok(())
    }

    /// Advances after a step's value has been accepted.
    fn advance_from(&mut self, step: FlowStep) -> StepAdvance {
        if self.editing_field {
            self.editing_field = false;
            self.state = FlowState::Confirming;
            return StepAdvance::Confirm;
        }
        match step.next() {
            Some(next) => {
                self.state = FlowState::Collecting(next);
                StepAdvance::Next(next)
            }
            None => {
                self.state = FlowState::Confirming;
                StepAdvance::Confirm
            }
        }
    }
}
