// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outbound notification seam.
//!
//! Booking confirmations are handed to an external channel (mail,
//! messenger) after the booking transaction commits. Delivery is
//! fire-and-forget: a failing channel must not fail the booking, so
//! implementations report problems through their own logging.

use studio_booking_domain::Occurrence;

/// External delivery channel for booking confirmations.
pub trait Notifier: Send + Sync {
    /// Called after a booking has been committed.
    fn booking_confirmed(&self, user_id: i64, occurrence: &Occurrence);
}

/// A `Notifier` that drops everything. Useful for tests and for
/// deployments without an outbound channel.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn booking_confirmed(&self, _user_id: i64, _occurrence: &Occurrence) {}
}
