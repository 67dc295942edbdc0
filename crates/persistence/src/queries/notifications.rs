// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification queries, including the content-prefix dedup checks.

use crate::data_models::NotificationRow;
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;
use studio_booking_domain::{Notification, NotificationStatus};

/// Lists all notifications of one user, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<Notification>, PersistenceError> {
    let rows = notifications::table
        .filter(notifications::user_id.eq(user_id))
        .order(notifications::notification_id.desc())
        .load::<NotificationRow>(conn)?;
    rows.into_iter().map(TryInto::try_into).collect()
}

/// Checks whether any notification matching the content pattern exists
/// for the user, read or not.
///
/// Used for `EXPIRED` notices, which are emitted at most once ever.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn any_with_content(
    conn: &mut SqliteConnection,
    user_id: i64,
    content_pattern: &str,
) -> Result<bool, PersistenceError> {
    let count: i64 = notifications::table
        .filter(notifications::user_id.eq(user_id))
        .filter(notifications::content.like(content_pattern))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Checks whether an unread notification matching the content pattern
/// exists for the user.
///
/// Used for `LOW_CREDIT` and `EXPIRING_SOON` notices, which are suppressed
/// only while an unread copy is outstanding.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn any_unread_with_content(
    conn: &mut SqliteConnection,
    user_id: i64,
    content_pattern: &str,
) -> Result<bool, PersistenceError> {
    let count: i64 = notifications::table
        .filter(notifications::user_id.eq(user_id))
        .filter(notifications::status.eq(NotificationStatus::New.as_str()))
        .filter(notifications::content.like(content_pattern))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
