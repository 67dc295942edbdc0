// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Structural changes that fan out over booking records: template
//! deletion and bulk occurrence status changes.

use chrono::{NaiveDate, NaiveDateTime};
use studio_booking_domain::{BookingStatus, Clock, DomainError, IsoWeekday};
use studio_booking_persistence::{CascadeCancellation, Persistence};
use tracing::info;

use crate::error::EngineError;
use crate::{Actor, AuthorizationService};

/// Notification content delivered to every student whose booking is
/// cancelled by a template deletion.
pub const TEMPLATE_CANCELLED_NOTICE: &str =
    "An administrator cancelled a scheduled class you were booked for.";

/// Deletes a slot template and cancels every open booking on it, on any
/// date. Admin only.
///
/// Each affected student is refunded (unless their pass has expired)
/// and receives a notification; any failure rolls the whole cascade
/// back. Terminal booking records survive the deletion untouched.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an Admin
/// - The template does not exist
/// - The database transaction fails
pub fn delete_template(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    actor: &Actor,
    template_id: i64,
) -> Result<Vec<CascadeCancellation>, EngineError> {
    AuthorizationService::authorize_manage_templates(actor)?;

    if persistence.get_template(template_id)?.is_none() {
        return Err(EngineError::NotFound {
            resource: format!("Slot template {template_id}"),
        });
    }

    let cancelled =
        persistence.delete_template_cascade(template_id, TEMPLATE_CANCELLED_NOTICE, clock.now())?;
    info!(
        "Admin {} deleted template {} ({} bookings cancelled)",
        actor.id,
        template_id,
        cancelled.len()
    );
    Ok(cancelled)
}

/// Applies `target` to every eligible booking record of one occurrence.
/// Instructor or Admin only.
///
/// Per-record semantics: a cancelling target touches only open records
/// (with refund), a completing target completes open records, an
/// opening target reopens terminal records. Returns the number of
/// records actually changed.
///
/// # Errors
///
/// Returns an error if:
/// - The actor has the Student role
/// - The template does not exist
/// - `date` does not fall on the template's weekday
/// - The occurrence is past and already processed
/// - `target` is completed and the occurrence has not started
/// - The database transaction fails
pub fn set_occurrence_status(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    actor: &Actor,
    template_id: i64,
    date: NaiveDate,
    target: BookingStatus,
) -> Result<usize, EngineError> {
    AuthorizationService::authorize_set_occurrence_status(actor)?;

    let template = persistence
        .get_template(template_id)?
        .ok_or_else(|| EngineError::NotFound {
            resource: format!("Slot template {template_id}"),
        })?;
    if IsoWeekday::from_date(date) != template.weekday {
        return Err(DomainError::WeekdayMismatch {
            expected: template.weekday.number(),
            date,
        }
        .into());
    }

    let now = clock.now();
    let starts_at = NaiveDateTime::new(date, template.time_of_day);
    if starts_at < now {
        // Once a past occurrence has any processed record, its history
        // is frozen.
        let records = persistence.list_bookings_for_occurrence(template_id, date)?;
        if records.iter().any(|r| r.status != BookingStatus::New) {
            return Err(EngineError::PastLocked { template_id, date });
        }
    }
    if target == BookingStatus::Completed && starts_at > now {
        return Err(EngineError::FutureCompletion { starts_at });
    }

    let changed = persistence.set_occurrence_status(template_id, date, target, now)?;
    info!(
        "Occurrence {}/{} set to '{}' by {} {} ({} records changed)",
        template_id,
        date,
        target.as_str(),
        actor.role.as_str(),
        actor.id,
        changed
    );
    Ok(changed)
}
