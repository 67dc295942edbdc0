// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Direction and slot template management.

use chrono::NaiveTime;
use studio_booking_domain::{Direction, IsoWeekday, SlotTemplate};
use studio_booking_persistence::Persistence;
use tracing::info;

use crate::error::EngineError;
use crate::{Actor, AuthorizationService};

/// Creates a dance direction. Admin only.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an Admin
/// - A direction with the same name already exists
/// - The database insert fails
pub fn create_direction(
    persistence: &mut Persistence,
    actor: &Actor,
    name: &str,
) -> Result<i64, EngineError> {
    AuthorizationService::authorize_manage_templates(actor)?;

    // The unique constraint on the name backs this check.
    if persistence.list_directions()?.iter().any(|d| d.name == name) {
        return Err(EngineError::Conflict {
            message: format!("Direction '{name}' already exists"),
        });
    }

    let direction_id = persistence.create_direction(name)?;
    info!("Created direction {} '{}'", direction_id, name);
    Ok(direction_id)
}

/// Lists all directions ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_directions(persistence: &mut Persistence) -> Result<Vec<Direction>, EngineError> {
    Ok(persistence.list_directions()?)
}

/// Creates a weekly slot template. Admin only.
///
/// An instructor may hold at most one template per (weekday, time)
/// across all directions.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an Admin
/// - The weekday is not in 1..=7
/// - The direction does not exist
/// - The instructor already has a template at that weekday and time
/// - The database insert fails
pub fn create_template(
    persistence: &mut Persistence,
    actor: &Actor,
    instructor_id: i64,
    direction_id: i64,
    weekday: u8,
    time_of_day: NaiveTime,
) -> Result<i64, EngineError> {
    AuthorizationService::authorize_manage_templates(actor)?;

    let weekday = IsoWeekday::new(weekday)?;
    if persistence.get_direction(direction_id)?.is_none() {
        return Err(EngineError::NotFound {
            resource: format!("Direction {direction_id}"),
        });
    }
    if persistence.instructor_has_slot_at(instructor_id, weekday, time_of_day)? {
        return Err(EngineError::Conflict {
            message: format!(
                "Instructor {instructor_id} already has a slot at weekday {} {}",
                weekday.number(),
                time_of_day.format("%H:%M")
            ),
        });
    }

    let template = SlotTemplate::new(instructor_id, direction_id, weekday, time_of_day);
    let template_id = persistence.create_template(&template)?;
    info!(
        "Created slot template {} (instructor {}, direction {})",
        template_id, instructor_id, direction_id
    );
    Ok(template_id)
}

/// Lists the slot templates one instructor teaches.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_templates_by_instructor(
    persistence: &mut Persistence,
    instructor_id: i64,
) -> Result<Vec<SlotTemplate>, EngineError> {
    Ok(persistence.list_templates_by_instructor(instructor_id)?)
}

/// Lists the slot templates of one direction.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_templates_by_direction(
    persistence: &mut Persistence,
    direction_id: i64,
) -> Result<Vec<SlotTemplate>, EngineError> {
    Ok(persistence.list_templates_by_direction(direction_id)?)
}
