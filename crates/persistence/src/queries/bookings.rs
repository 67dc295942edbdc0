// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking record queries.

use crate::data_models::{BookingRow, format_date};
use crate::diesel_schema::bookings;
use crate::error::PersistenceError;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::SqliteConnection;
use studio_booking_domain::{BookingRecord, BookingStatus};

/// Retrieves a booking record by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
pub fn get_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
) -> Result<Option<BookingRecord>, PersistenceError> {
    let row = bookings::table
        .filter(bookings::booking_id.eq(booking_id))
        .first::<BookingRow>(conn)
        .optional()?;
    row.map(TryInto::try_into).transpose()
}

/// Lists all booking records of one occurrence, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_for_occurrence(
    conn: &mut SqliteConnection,
    template_id: i64,
    date: NaiveDate,
) -> Result<Vec<BookingRecord>, PersistenceError> {
    let rows = bookings::table
        .filter(bookings::template_id.eq(template_id))
        .filter(bookings::date.eq(format_date(date)))
        .order(bookings::created_at.asc())
        .load::<BookingRow>(conn)?;
    rows.into_iter().map(TryInto::try_into).collect()
}

/// Lists the still-open (`new`) booking records of a template, any date.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_new_for_template(
    conn: &mut SqliteConnection,
    template_id: i64,
) -> Result<Vec<BookingRecord>, PersistenceError> {
    let rows = bookings::table
        .filter(bookings::template_id.eq(template_id))
        .filter(bookings::status.eq(BookingStatus::New.as_str()))
        .order(bookings::booking_id.asc())
        .load::<BookingRow>(conn)?;
    rows.into_iter().map(TryInto::try_into).collect()
}

/// Lists all booking records of one user, newest occurrence first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<BookingRecord>, PersistenceError> {
    let rows = bookings::table
        .filter(bookings::user_id.eq(user_id))
        .order((bookings::date.desc(), bookings::time_of_day.desc()))
        .load::<BookingRow>(conn)?;
    rows.into_iter().map(TryInto::try_into).collect()
}

/// Checks whether any record (any status) exists for a user on one
/// occurrence.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn exists_for_user_occurrence(
    conn: &mut SqliteConnection,
    user_id: i64,
    template_id: i64,
    date: NaiveDate,
) -> Result<bool, PersistenceError> {
    let count: i64 = bookings::table
        .filter(bookings::user_id.eq(user_id))
        .filter(bookings::template_id.eq(template_id))
        .filter(bookings::date.eq(format_date(date)))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
