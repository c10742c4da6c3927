// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Gift Fund Coordinator.
//!
//! This crate turns inbound channel events into outbound message requests
//! and state transitions: the authorization chain resolves the acting
//! person and role flags once per event, the registration gate and role
//! gates short-circuit where required, and the dispatcher drives the three
//! multi-step workflows plus the direct command handlers. It also hosts the
//! scheduler-facing notification fan-out and the collector's transfer
//! report.

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
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod notify;
mod report;
mod request_response;
mod sessions;

#[cfg(test)]
mod tests;

pub use auth::{
    require_active_collector, require_admin, require_service_user, resolve_context,
    RequestContext,
};
pub use error::{AuthError, ReportError};
pub use handlers::{dispatch, Secrets};
pub use notify::upcoming_birthday_notifications;
pub use report::{transfers_report_csv, transfers_report_text};
pub use request_response::{
    Action, ActionButton, InboundEvent, InboundPayload, OutboundMessage,
};
pub use sessions::{AdminSelection, Roster, Session, SessionStore};
