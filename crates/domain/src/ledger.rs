// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Subscription expiry and refund policy.
//!
//! A subscription is a prepaid pack of lesson credits on one direction.
//! `expires_at` is fixed at purchase time (one month after purchase) and
//! never moves. Expiry comparisons grant the whole final day: a pass
//! expiring on the 15th is still usable at 23:59 on the 15th.
//!
//! ## Invariants
//!
//! - `credit_balance` never goes below zero.
//! - The stored `status` is a cached projection of
//!   `balance > 0 && not expired`; `effective_status` is the source of
//!   truth.
//! - A refund never revives an expired subscription.

use crate::error::DomainError;
use crate::status::SubscriptionStatus;
use chrono::{Months, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A prepaid lesson-credit pack held by one user on one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub subscription_id: Option<i64>,
    pub user_id: i64,
    pub direction_id: i64,
    pub credit_balance: i64,
    pub status: SubscriptionStatus,
    pub purchased_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

impl Subscription {
    /// Creates a subscription that has not been persisted yet.
    #[must_use]
    pub const fn new(
        user_id: i64,
        direction_id: i64,
        credit_balance: i64,
        purchased_at: NaiveDateTime,
        expires_at: NaiveDateTime,
    ) -> Self {
        Self {
            subscription_id: None,
            user_id,
            direction_id,
            credit_balance,
            status: SubscriptionStatus::Active,
            purchased_at,
            expires_at,
        }
    }

    /// Returns true if the pass has passed its end date as of `as_of`.
    #[must_use]
    pub fn is_expired(&self, as_of: NaiveDateTime) -> bool {
        is_expired(self.expires_at, as_of)
    }

    /// Computes the validity status from the balance and expiry, ignoring
    /// the cached `status` field.
    #[must_use]
    pub fn effective_status(&self, as_of: NaiveDateTime) -> SubscriptionStatus {
        if self.credit_balance > 0 && !self.is_expired(as_of) {
            SubscriptionStatus::Active
        } else {
            SubscriptionStatus::Inactive
        }
    }

    /// Decides whether a cancelled booking's credit goes back on the pass.
    #[must_use]
    pub fn refund_decision(&self, as_of: NaiveDateTime) -> RefundDecision {
        if self.is_expired(as_of) {
            RefundDecision::Forfeit
        } else {
            RefundDecision::Refund
        }
    }

    /// Whole days until the end date, negative once it has passed.
    #[must_use]
    pub fn days_until_expiry(&self, as_of: NaiveDateTime) -> i64 {
        (self.expires_at.date() - as_of.date()).num_days()
    }
}

/// Outcome of cancelling a booking against this subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundDecision {
    /// Credit is returned and the pass may reactivate.
    Refund,
    /// The pass has expired; the credit is forfeited.
    Forfeit,
}

/// Returns the fixed end date for a pass bought at `purchased_at`.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if the date cannot be
/// represented.
pub fn expiry_for_purchase(purchased_at: NaiveDateTime) -> Result<NaiveDateTime, DomainError> {
    purchased_at
        .checked_add_months(Months::new(1))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("computing expiry for purchase at {purchased_at}"),
        })
}

/// Returns true if `as_of` is past the end of `expires_at`'s calendar day.
#[must_use]
pub fn is_expired(expires_at: NaiveDateTime, as_of: NaiveDateTime) -> bool {
    // End-of-day grace: the pass is usable through the whole final day.
    as_of.date() > expires_at.date()
}
