// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::flow::{FlowKind, FlowStep};
use gift_fund_domain::DomainError;

/// Errors that can occur while driving a workflow session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Input failed a field rule. Recovered locally by re-prompting the same
    /// step; the session is left unchanged.
    Validation(DomainError),
    /// An action was attempted in a state that does not accept it.
    InvalidTransition {
        /// The state the session was in.
        state: &'static str,
        /// The attempted action.
        action: &'static str,
    },
    /// A step from another flow was fed to this session.
    StepOutsideFlow {
        /// The offending step.
        step: FlowStep,
        /// The session's flow.
        kind: FlowKind,
    },
    /// A skip was requested for a step that requires a value.
    StepNotSkippable(FlowStep),
    /// The draft is missing a field a complete form requires.
    IncompleteDraft {
        /// The missing field.
        field: &'static str,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "Validation failed: {err}"),
            Self::InvalidTransition { state, action } => {
                write!(f, "Action '{action}' is not valid in state '{state}'")
            }
            Self::StepOutsideFlow { step, kind } => {
                write!(f, "Step '{step}' does not belong to the {kind} flow")
            }
            Self::StepNotSkippable(step) => {
                write!(f, "Step '{step}' requires a value and cannot be skipped")
            }
            Self::IncompleteDraft { field } => {
                write!(f, "Session data is missing the '{field}' field")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err)
    }
}
