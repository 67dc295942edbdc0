// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! Single-statement building blocks live in the per-table modules and are
//! deliberately conditional: updates carry a `WHERE` guard on the state
//! they expect and report the affected-row count, so two racing callers
//! cannot both succeed. The multi-row units of work (`workflows`) compose
//! those blocks inside one `Connection::transaction` each.
//!
//! ## Module Organization
//!
//! - `templates` — Direction and slot template inserts/deletes
//! - `bookings` — Booking inserts and guarded status transitions
//! - `subscriptions` — Conditional debit, credit, cached status flips
//! - `notifications` — Notification inserts and read-marking
//! - `workflows` — Transactional units of work (`book`, `cancel`, cascade
//!   delete, purchase, notice sync, the auto-complete sweep)

pub mod bookings;
pub mod notifications;
pub mod subscriptions;
pub mod templates;
pub mod workflows;

pub use workflows::{BookOutcome, CascadeCancellation, PurchaseOutcome, TransitionOutcome};
