// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use gift_fund_persistence::PersistenceError;
use thiserror::Error;

/// Authorization failures from the role gates.
///
/// These are non-fatal: the dispatcher converts them into denial messages
/// without forwarding the request to the gated handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The action requires an admin grant.
    #[error("admin privilege required")]
    AdminRequired,
    /// The action requires the service-user designation.
    #[error("service-user privilege required")]
    ServiceUserRequired,
    /// The action requires holding the active collector role.
    #[error("active collector privilege required")]
    ActiveCollectorRequired,
}

/// Failures while producing the transfer report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The underlying ledger could not be read.
    #[error("failed to read the ledger: {0}")]
    Persistence(#[from] PersistenceError),
    /// CSV serialization failed.
    #[error("failed to serialize the report: {0}")]
    Csv(#[from] csv::Error),
    /// The CSV buffer was not valid UTF-8.
    #[error("report buffer was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
