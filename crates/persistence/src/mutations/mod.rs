// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations, one module per entity.
//!
//! Every mutation that reads before it decides runs inside one immediate
//! transaction; storage-level unique indexes remain the authoritative guard
//! for the two contended operations (transfer recording, collector
//! activation).

pub mod collectors;
pub mod persons;
pub mod roles;
pub mod transfers;
pub mod wishes;

pub use transfers::TransferOutcome;
