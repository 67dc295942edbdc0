// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Subscription ledger mutations.
//!
//! The debit is a conditional update guarded on `credit_balance > 0`; the
//! affected-row count tells the caller whether it won a potential race.
//! The schema additionally enforces `credit_balance >= 0`.

use crate::backend;
use crate::data_models::NewSubscriptionRow;
use crate::diesel_schema::subscriptions;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;
use studio_booking_domain::SubscriptionStatus;

/// Inserts a subscription and returns its generated ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_subscription(
    conn: &mut SqliteConnection,
    record: &NewSubscriptionRow,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(subscriptions::table)
        .values(record)
        .execute(conn)?;
    backend::get_last_insert_rowid(conn)
}

/// Debits one credit if any remain.
///
/// Returns the affected-row count: 0 means the balance was already at
/// zero when the update ran and nothing was charged.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn debit_if_available(
    conn: &mut SqliteConnection,
    subscription_id: i64,
) -> Result<usize, PersistenceError> {
    Ok(diesel::update(
        subscriptions::table
            .filter(subscriptions::subscription_id.eq(subscription_id))
            .filter(subscriptions::credit_balance.gt(0)),
    )
    .set(subscriptions::credit_balance.eq(subscriptions::credit_balance - 1))
    .execute(conn)?)
}

/// Returns one credit to the subscription.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn credit(
    conn: &mut SqliteConnection,
    subscription_id: i64,
) -> Result<usize, PersistenceError> {
    Ok(diesel::update(
        subscriptions::table.filter(subscriptions::subscription_id.eq(subscription_id)),
    )
    .set(subscriptions::credit_balance.eq(subscriptions::credit_balance + 1))
    .execute(conn)?)
}

/// Flips the cached status to inactive if the stored balance is zero.
///
/// Guarded on the balance actually in the row, so the flip tracks the
/// post-debit state rather than whatever snapshot the caller read.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn deactivate_if_drained(
    conn: &mut SqliteConnection,
    subscription_id: i64,
) -> Result<usize, PersistenceError> {
    Ok(diesel::update(
        subscriptions::table
            .filter(subscriptions::subscription_id.eq(subscription_id))
            .filter(subscriptions::credit_balance.eq(0)),
    )
    .set(subscriptions::status.eq(SubscriptionStatus::Inactive.as_str()))
    .execute(conn)?)
}

/// Overwrites the cached validity status.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_status(
    conn: &mut SqliteConnection,
    subscription_id: i64,
    status: SubscriptionStatus,
) -> Result<usize, PersistenceError> {
    Ok(diesel::update(
        subscriptions::table.filter(subscriptions::subscription_id.eq(subscription_id)),
    )
    .set(subscriptions::status.eq(status.as_str()))
    .execute(conn)?)
}
