// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Direction and slot template mutations.

use crate::backend;
use crate::data_models::{NewDirectionRow, NewTemplateRow};
use crate::diesel_schema::{directions, slot_templates};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;

/// Inserts a direction and returns its generated ID.
///
/// # Errors
///
/// Returns an error if the insert fails (including a duplicate name).
pub fn insert_direction(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(directions::table)
        .values(&NewDirectionRow { name })
        .execute(conn)?;
    backend::get_last_insert_rowid(conn)
}

/// Inserts a slot template and returns its generated ID.
///
/// # Errors
///
/// Returns an error if the insert fails (including the unique instructor
/// slot constraint).
pub fn insert_template(
    conn: &mut SqliteConnection,
    record: &NewTemplateRow,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(slot_templates::table)
        .values(record)
        .execute(conn)?;
    backend::get_last_insert_rowid(conn)
}

/// Deletes a slot template row, returning the number of rows removed.
///
/// Only the cascade workflow calls this; booking records referencing the
/// template are left in place.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_template_row(
    conn: &mut SqliteConnection,
    template_id: i64,
) -> Result<usize, PersistenceError> {
    Ok(
        diesel::delete(slot_templates::table.filter(slot_templates::template_id.eq(template_id)))
            .execute(conn)?,
    )
}
