// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Weekly schedule resolution.
//!
//! Templates are expanded into dated occurrences for the requested
//! week. The public view carries bare occurrences; the instructor view
//! joins booking records, aggregates a display status per occurrence,
//! and runs the auto-complete sweep first so stale open records never
//! reach the caller.

use chrono::NaiveDate;
use studio_booking_domain::{
    BookingStatus, Clock, Occurrence, aggregate_display_status, expand_week, is_past,
    monday_of_week, week_dates,
};
use studio_booking_persistence::Persistence;
use tracing::debug;

use crate::error::EngineError;

/// One day of the public weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayInfo {
    /// The calendar date.
    pub date: NaiveDate,
    /// Occurrences on this date, ordered by start time.
    pub occurrences: Vec<Occurrence>,
}

/// One occurrence in the instructor view, with its aggregated state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotView {
    /// The dated occurrence.
    pub occurrence: Occurrence,
    /// Aggregated status over the occurrence's booking records.
    pub display_status: BookingStatus,
    /// Number of non-cancelled booking records.
    pub active_bookings: usize,
    /// Whether the occurrence has already started.
    pub is_past: bool,
}

/// One day of the instructor weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructorDayInfo {
    /// The calendar date.
    pub date: NaiveDate,
    /// This instructor's occurrences on this date, ordered by time.
    pub slots: Vec<SlotView>,
}

/// Resolves the public schedule for the week `week_offset` weeks from
/// the current one, optionally restricted to one direction.
///
/// Always returns seven days, Monday first; days without classes carry
/// an empty occurrence list.
///
/// # Errors
///
/// Returns an error if the week's Monday is outside the representable
/// date range or a database query fails.
pub fn resolve_week(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    week_offset: i64,
    direction_filter: Option<i64>,
) -> Result<Vec<DayInfo>, EngineError> {
    let templates = match direction_filter {
        Some(direction_id) => persistence.list_templates_by_direction(direction_id)?,
        None => persistence.list_templates()?,
    };

    let monday = monday_of_week(clock.today(), week_offset)?;
    let occurrences = expand_week(&templates, monday)?;

    let days = week_dates(monday)?
        .into_iter()
        .map(|date| DayInfo {
            date,
            occurrences: occurrences
                .iter()
                .filter(|o| o.date == date)
                .cloned()
                .collect(),
        })
        .collect();
    Ok(days)
}

/// Resolves one instructor's schedule for the week `week_offset` weeks
/// from the current one.
///
/// Runs the auto-complete sweep first, then joins each occurrence with
/// its booking records on the exact date.
///
/// # Errors
///
/// Returns an error if the week's Monday is outside the representable
/// date range or a database query fails.
pub fn resolve_week_for_instructor(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    instructor_id: i64,
    week_offset: i64,
) -> Result<Vec<InstructorDayInfo>, EngineError> {
    let now = clock.now();
    let swept = persistence.auto_complete_past(now)?;
    if swept > 0 {
        debug!("Auto-completed {} stale open bookings", swept);
    }

    let templates = persistence.list_templates_by_instructor(instructor_id)?;
    let monday = monday_of_week(now.date(), week_offset)?;
    let occurrences = expand_week(&templates, monday)?;

    let mut slots = Vec::with_capacity(occurrences.len());
    for occurrence in occurrences {
        let records =
            persistence.list_bookings_for_occurrence(occurrence.template_id, occurrence.date)?;
        let statuses: Vec<BookingStatus> = records.iter().map(|r| r.status).collect();
        let past = is_past(occurrence.date, occurrence.time_of_day, now);
        slots.push(SlotView {
            display_status: aggregate_display_status(&statuses, past),
            active_bookings: records
                .iter()
                .filter(|r| r.status != BookingStatus::Cancelled)
                .count(),
            is_past: past,
            occurrence,
        });
    }

    let days = week_dates(monday)?
        .into_iter()
        .map(|date| InstructorDayInfo {
            date,
            slots: slots
                .iter()
                .filter(|s| s.occurrence.date == date)
                .cloned()
                .collect(),
        })
        .collect();
    Ok(days)
}
