// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only query modules.
//!
//! All functions here use Diesel DSL exclusively and never write. Rows are
//! converted into domain types at the boundary; a row that fails conversion
//! surfaces as `PersistenceError::CorruptRow`.
//!
//! ## Module Organization
//!
//! - `templates` — Direction and slot template lookups
//! - `bookings` — Booking record lookups
//! - `subscriptions` — Subscription lookups (FIFO ordering by purchase time)
//! - `notifications` — Notification lookups and content-prefix dedup checks

pub mod bookings;
pub mod notifications;
pub mod subscriptions;
pub mod templates;
