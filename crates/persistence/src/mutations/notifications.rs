// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification mutations.

use crate::backend;
use crate::data_models::NewNotificationRow;
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;
use studio_booking_domain::NotificationStatus;

/// Inserts a notification row and returns its generated ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_notification(
    conn: &mut SqliteConnection,
    record: &NewNotificationRow,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(notifications::table)
        .values(record)
        .execute(conn)?;
    backend::get_last_insert_rowid(conn)
}

/// Marks one notification as read.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_read(
    conn: &mut SqliteConnection,
    notification_id: i64,
) -> Result<usize, PersistenceError> {
    Ok(diesel::update(
        notifications::table.filter(notifications::notification_id.eq(notification_id)),
    )
    .set(notifications::status.eq(NotificationStatus::Read.as_str()))
    .execute(conn)?)
}

/// Marks every unread notification matching the content pattern as read.
///
/// Used when an `EXPIRED` notice supersedes outstanding warnings for the
/// same subscription.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_read_by_content(
    conn: &mut SqliteConnection,
    user_id: i64,
    content_pattern: &str,
) -> Result<usize, PersistenceError> {
    Ok(diesel::update(
        notifications::table
            .filter(notifications::user_id.eq(user_id))
            .filter(notifications::status.eq(NotificationStatus::New.as_str()))
            .filter(notifications::content.like(content_pattern)),
    )
    .set(notifications::status.eq(NotificationStatus::Read.as_str()))
    .execute(conn)?)
}
