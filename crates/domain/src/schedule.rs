// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Week expansion and occurrence display logic.
//!
//! Weekly slot templates are expanded into dated occurrences one week at a
//! time. A week always runs Monday through Sunday; `week_offset` 0 is the
//! week containing today, 1 the next week, -1 the previous.
//!
//! ## Invariants
//!
//! - Expansion is pure: no occurrence is ever persisted.
//! - Occurrences within a week are ordered by date, then start time.
//! - The display status of an occurrence is an aggregation over its booking
//!   records and is never stored.

use crate::error::DomainError;
use crate::status::BookingStatus;
use crate::types::{IsoWeekday, Occurrence, SlotTemplate};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Returns the Monday of the week `week_offset` weeks away from `today`.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if the offset leaves the
/// representable date range.
pub fn monday_of_week(today: NaiveDate, week_offset: i64) -> Result<NaiveDate, DomainError> {
    let back = i64::from(IsoWeekday::from_date(today).number()) - 1;
    let days = week_offset
        .checked_mul(7)
        .and_then(|shift| shift.checked_sub(back))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("shifting week by offset {week_offset}"),
        })?;
    today
        .checked_add_signed(Duration::days(days))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("shifting week by offset {week_offset}"),
        })
}

/// Returns the seven dates of the week starting at `monday`.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if the week leaves the
/// representable date range.
pub fn week_dates(monday: NaiveDate) -> Result<Vec<NaiveDate>, DomainError> {
    (0..7)
        .map(|day| {
            monday
                .checked_add_signed(Duration::days(day))
                .ok_or_else(|| DomainError::DateArithmeticOverflow {
                    operation: format!("expanding week starting {monday}"),
                })
        })
        .collect()
}

/// Returns the date a weekday falls on within the week starting at `monday`.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if the date leaves the
/// representable range.
pub fn occurrence_date(monday: NaiveDate, weekday: IsoWeekday) -> Result<NaiveDate, DomainError> {
    monday
        .checked_add_signed(Duration::days(i64::from(weekday.number()) - 1))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("placing weekday {} in week {monday}", weekday.number()),
        })
}

/// Expands slot templates into the dated occurrences of one week.
///
/// Templates without a persisted ID are skipped. The result is ordered by
/// date, then start time.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if a date leaves the
/// representable range.
pub fn expand_week(
    templates: &[SlotTemplate],
    monday: NaiveDate,
) -> Result<Vec<Occurrence>, DomainError> {
    let mut occurrences = Vec::with_capacity(templates.len());
    for template in templates {
        let Some(template_id) = template.template_id else {
            continue;
        };
        occurrences.push(Occurrence {
            template_id,
            instructor_id: template.instructor_id,
            direction_id: template.direction_id,
            date: occurrence_date(monday, template.weekday)?,
            time_of_day: template.time_of_day,
        });
    }
    occurrences.sort_by_key(|occurrence| (occurrence.date, occurrence.time_of_day));
    Ok(occurrences)
}

/// Returns true if the occurrence at `date`/`time` has already started.
#[must_use]
pub fn is_past(date: NaiveDate, time: NaiveTime, now: NaiveDateTime) -> bool {
    NaiveDateTime::new(date, time) < now
}

/// Aggregates booking record statuses into one display status for an
/// occurrence.
///
/// An empty past occurrence reads as held; an empty future one as open.
/// Otherwise: all completed reads completed, all cancelled reads cancelled,
/// a mix of completed and cancelled with nothing outstanding reads
/// completed, and anything still `new` keeps the occurrence `new`.
#[must_use]
pub fn aggregate_display_status(statuses: &[BookingStatus], is_past: bool) -> BookingStatus {
    if statuses.is_empty() {
        return if is_past {
            BookingStatus::Completed
        } else {
            BookingStatus::New
        };
    }

    let any_new = statuses.iter().any(|s| *s == BookingStatus::New);
    let any_completed = statuses.iter().any(|s| *s == BookingStatus::Completed);
    let all_completed = statuses.iter().all(|s| *s == BookingStatus::Completed);
    let all_cancelled = statuses.iter().all(|s| *s == BookingStatus::Cancelled);

    if all_completed {
        BookingStatus::Completed
    } else if all_cancelled {
        BookingStatus::Cancelled
    } else if any_completed && !any_new {
        BookingStatus::Completed
    } else {
        BookingStatus::New
    }
}
