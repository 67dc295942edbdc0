// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Subscription queries.
//!
//! Debit candidates are ordered by purchase time ascending so the oldest
//! eligible pass is always charged first. Expiry is a date comparison with
//! end-of-day grace, so candidates are filtered in Rust by the caller with
//! the domain policy rather than in SQL.

use crate::data_models::SubscriptionRow;
use crate::diesel_schema::subscriptions;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;
use studio_booking_domain::{Subscription, SubscriptionStatus};

/// Retrieves a subscription by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
pub fn get_subscription(
    conn: &mut SqliteConnection,
    subscription_id: i64,
) -> Result<Option<Subscription>, PersistenceError> {
    let row = subscriptions::table
        .filter(subscriptions::subscription_id.eq(subscription_id))
        .first::<SubscriptionRow>(conn)
        .optional()?;
    row.map(TryInto::try_into).transpose()
}

/// Lists all subscriptions of one user, oldest purchase first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<Subscription>, PersistenceError> {
    let rows = subscriptions::table
        .filter(subscriptions::user_id.eq(user_id))
        .order(subscriptions::purchased_at.asc())
        .load::<SubscriptionRow>(conn)?;
    rows.into_iter().map(TryInto::try_into).collect()
}

/// Lists the active subscriptions with credit left for one user and
/// direction, oldest purchase first.
///
/// Expiry is not filtered here; callers apply the end-of-day grace rule.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_debit_candidates(
    conn: &mut SqliteConnection,
    user_id: i64,
    direction_id: i64,
) -> Result<Vec<Subscription>, PersistenceError> {
    let rows = subscriptions::table
        .filter(subscriptions::user_id.eq(user_id))
        .filter(subscriptions::direction_id.eq(direction_id))
        .filter(subscriptions::status.eq(SubscriptionStatus::Active.as_str()))
        .filter(subscriptions::credit_balance.gt(0))
        .order(subscriptions::purchased_at.asc())
        .load::<SubscriptionRow>(conn)?;
    rows.into_iter().map(TryInto::try_into).collect()
}
