// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reusable conversational workflow engine.
//!
//! A workflow is a step sequence: an ordered list of named states where each
//! state waits for one specific kind of input. Three concrete flows share the
//! machinery — user registration, wish entry, and collector registration —
//! with a common edit/confirm/cancel sub-protocol:
//!
//! ```text
//! Collecting(step_1..step_n) -> Confirming -> committed
//!                                  |  ^
//!                                  v  |
//!                      EditSelecting -> Collecting(step_k)
//! ```
//!
//! Cancellation is reachable from every non-terminal state and is handled by
//! the session store (the session is simply dropped). This crate is a pure
//! state machine: it validates and accumulates input but performs no I/O; the
//! commit phase belongs to the caller.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod data;
mod error;
mod flow;
mod session;

#[cfg(test)]
mod tests;

pub use data::{
    CollectorDraft, CollectorForm, FlowData, RegistrationDraft, RegistrationForm, WishDraft,
    WishForm,
};
pub use error::CoreError;
pub use flow::{FlowKind, FlowMode, FlowStep};
pub use session::{FlowSession, FlowState, StepAdvance};
