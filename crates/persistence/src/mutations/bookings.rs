// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking inserts and guarded status transitions.

use crate::backend;
use crate::data_models::{NewBookingRow, format_date, format_datetime, format_time};
use crate::diesel_schema::bookings;
use crate::error::PersistenceError;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::SqliteConnection;
use studio_booking_domain::BookingStatus;

/// Inserts a booking record and returns its generated ID.
///
/// # Errors
///
/// Returns an error if the insert fails (including the unique
/// user/occurrence constraint).
pub fn insert_booking(
    conn: &mut SqliteConnection,
    record: &NewBookingRow,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(bookings::table)
        .values(record)
        .execute(conn)?;
    backend::get_last_insert_rowid(conn)
}

/// Transitions one booking from an expected status to a new one.
///
/// The update is guarded on the expected status; a return of 0 means the
/// record was not in that status (or does not exist) at execution time.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn transition_if(
    conn: &mut SqliteConnection,
    booking_id: i64,
    from: BookingStatus,
    to: BookingStatus,
    now: NaiveDateTime,
) -> Result<usize, PersistenceError> {
    Ok(diesel::update(
        bookings::table
            .filter(bookings::booking_id.eq(booking_id))
            .filter(bookings::status.eq(from.as_str())),
    )
    .set((
        bookings::status.eq(to.as_str()),
        bookings::updated_at.eq(format_datetime(now)),
    ))
    .execute(conn)?)
}

/// Completes every open record whose occurrence has already started.
///
/// Idempotent: records already completed or cancelled are untouched, so
/// the sweep is safe to run from any number of request threads.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn complete_past_new(
    conn: &mut SqliteConnection,
    now: NaiveDateTime,
) -> Result<usize, PersistenceError> {
    let today = format_date(now.date());
    let time_now = format_time(now.time());
    Ok(diesel::update(
        bookings::table
            .filter(bookings::status.eq(BookingStatus::New.as_str()))
            .filter(
                bookings::date.lt(today.clone()).or(bookings::date
                    .eq(today)
                    .and(bookings::time_of_day.lt(time_now))),
            ),
    )
    .set((
        bookings::status.eq(BookingStatus::Completed.as_str()),
        bookings::updated_at.eq(format_datetime(now)),
    ))
    .execute(conn)?)
}
