// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Direction and slot template queries.

use crate::data_models::{DirectionRow, TemplateRow};
use crate::diesel_schema::{directions, slot_templates};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;
use studio_booking_domain::{Direction, SlotTemplate};

/// Retrieves a direction by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_direction(
    conn: &mut SqliteConnection,
    direction_id: i64,
) -> Result<Option<Direction>, PersistenceError> {
    let row = directions::table
        .filter(directions::direction_id.eq(direction_id))
        .first::<DirectionRow>(conn)
        .optional()?;
    Ok(row.map(Into::into))
}

/// Lists all directions ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_directions(conn: &mut SqliteConnection) -> Result<Vec<Direction>, PersistenceError> {
    let rows = directions::table
        .order(directions::name.asc())
        .load::<DirectionRow>(conn)?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Retrieves a slot template by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
pub fn get_template(
    conn: &mut SqliteConnection,
    template_id: i64,
) -> Result<Option<SlotTemplate>, PersistenceError> {
    let row = slot_templates::table
        .filter(slot_templates::template_id.eq(template_id))
        .first::<TemplateRow>(conn)
        .optional()?;
    row.map(TryInto::try_into).transpose()
}

/// Lists all slot templates.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_templates(conn: &mut SqliteConnection) -> Result<Vec<SlotTemplate>, PersistenceError> {
    let rows = slot_templates::table
        .order((slot_templates::weekday.asc(), slot_templates::time_of_day.asc()))
        .load::<TemplateRow>(conn)?;
    rows.into_iter().map(TryInto::try_into).collect()
}

/// Lists the slot templates held by one instructor.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_templates_by_instructor(
    conn: &mut SqliteConnection,
    instructor_id: i64,
) -> Result<Vec<SlotTemplate>, PersistenceError> {
    let rows = slot_templates::table
        .filter(slot_templates::instructor_id.eq(instructor_id))
        .order((slot_templates::weekday.asc(), slot_templates::time_of_day.asc()))
        .load::<TemplateRow>(conn)?;
    rows.into_iter().map(TryInto::try_into).collect()
}

/// Lists the slot templates of one direction.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_templates_by_direction(
    conn: &mut SqliteConnection,
    direction_id: i64,
) -> Result<Vec<SlotTemplate>, PersistenceError> {
    let rows = slot_templates::table
        .filter(slot_templates::direction_id.eq(direction_id))
        .order((slot_templates::weekday.asc(), slot_templates::time_of_day.asc()))
        .load::<TemplateRow>(conn)?;
    rows.into_iter().map(TryInto::try_into).collect()
}

/// Checks whether an instructor already holds any template at the given
/// weekday and time, across all directions.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn instructor_has_slot_at(
    conn: &mut SqliteConnection,
    instructor_id: i64,
    weekday: i32,
    time_of_day: &str,
) -> Result<bool, PersistenceError> {
    let count: i64 = slot_templates::table
        .filter(slot_templates::instructor_id.eq(instructor_id))
        .filter(slot_templates::weekday.eq(weekday))
        .filter(slot_templates::time_of_day.eq(time_of_day))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
