// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The booking lifecycle: book, cancel, complete, reset, sweep.
//!
//! Each operation validates against a pre-read snapshot, then delegates
//! to a persistence transaction whose conditional updates re-check the
//! observed state. A lost race surfaces as `InvalidTransition` or
//! `NoActiveSubscription`, never as a double debit.

use chrono::NaiveDate;
use studio_booking_domain::{
    BookingStatus, Clock, DomainError, IsoWeekday, Occurrence, is_past,
};
use studio_booking_persistence::{BookOutcome, Persistence, TransitionOutcome};
use tracing::info;

use crate::error::EngineError;
use crate::notifier::Notifier;
use crate::{Actor, AuthorizationService, Role};

/// Books the actor into the occurrence of `template_id` on `date`,
/// debiting their oldest eligible subscription.
///
/// The confirmation is handed to `notifier` after the transaction
/// commits.
///
/// # Errors
///
/// Returns an error if:
/// - The template does not exist
/// - `date` does not fall on the template's weekday
/// - The actor already has a booking for this occurrence
/// - No active, non-expired subscription with credit covers the
///   template's direction
/// - The database transaction fails
pub fn book(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    notifier: &dyn Notifier,
    actor: &Actor,
    template_id: i64,
    date: NaiveDate,
) -> Result<i64, EngineError> {
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

    match persistence.book(actor.id, &template, date, clock.now())? {
        BookOutcome::Booked {
            booking_id,
            subscription_id,
        } => {
            info!(
                "User {} booked template {} on {} (subscription {})",
                actor.id, template_id, date, subscription_id
            );
            let occurrence = Occurrence {
                template_id,
                instructor_id: template.instructor_id,
                direction_id: template.direction_id,
                date,
                time_of_day: template.time_of_day,
            };
            notifier.booking_confirmed(actor.id, &occurrence);
            Ok(booking_id)
        }
        BookOutcome::AlreadyBooked => Err(EngineError::Conflict {
            message: format!("User {} is already booked for this class", actor.id),
        }),
        BookOutcome::NoEligibleSubscription => Err(EngineError::NoActiveSubscription {
            user_id: actor.id,
            direction_id: template.direction_id,
        }),
    }
}

/// Cancels an open booking, refunding the debited credit unless the
/// paying subscription has passed its end date.
///
/// Students may cancel their own bookings; admins may cancel any.
/// Returns whether the credit was refunded.
///
/// # Errors
///
/// Returns an error if:
/// - The booking does not exist
/// - The actor is neither the booking's owner nor an Admin
/// - The booking is not open
/// - The database transaction fails
pub fn cancel(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    actor: &Actor,
    booking_id: i64,
) -> Result<bool, EngineError> {
    let booking = persistence
        .get_booking(booking_id)?
        .ok_or_else(|| EngineError::NotFound {
            resource: format!("Booking {booking_id}"),
        })?;

    if actor.role != Role::Admin && actor.id != booking.user_id {
        return Err(EngineError::Unauthorized {
            action: String::from("cancel_booking"),
            required_role: String::from("Admin"),
        });
    }

    match persistence.cancel_booking(booking_id, clock.now())? {
        TransitionOutcome::Applied { refunded } => {
            info!("Booking {} cancelled (refunded: {})", booking_id, refunded);
            Ok(refunded)
        }
        TransitionOutcome::NotApplied => Err(EngineError::InvalidTransition {
            from: booking.status,
            to: BookingStatus::Cancelled,
        }),
    }
}

/// Marks an open booking completed. No credit movement.
///
/// Instructor or Admin only; rejected while the occurrence has not yet
/// started.
///
/// # Errors
///
/// Returns an error if:
/// - The actor has the Student role
/// - The booking does not exist
/// - The occurrence starts in the future
/// - The booking is not open
/// - The database update fails
pub fn mark_completed(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    actor: &Actor,
    booking_id: i64,
) -> Result<(), EngineError> {
    AuthorizationService::authorize_mark_completed(actor)?;

    let booking = persistence
        .get_booking(booking_id)?
        .ok_or_else(|| EngineError::NotFound {
            resource: format!("Booking {booking_id}"),
        })?;

    let starts_at = booking.starts_at();
    if starts_at > clock.now() {
        return Err(EngineError::FutureCompletion { starts_at });
    }

    match persistence.complete_booking(booking_id, clock.now())? {
        TransitionOutcome::Applied { .. } => Ok(()),
        TransitionOutcome::NotApplied => Err(EngineError::InvalidTransition {
            from: booking.status,
            to: BookingStatus::Completed,
        }),
    }
}

/// Resets a terminal booking back to open. Admin only, no credit
/// movement.
///
/// A past occurrence is locked once any of its records has left the
/// open state, so corrections are effectively limited to occurrences
/// that have not started.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an Admin
/// - The booking does not exist
/// - The booking is already open
/// - The occurrence is past and locked
/// - The database update fails
pub fn reset_to_new(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    actor: &Actor,
    booking_id: i64,
) -> Result<(), EngineError> {
    AuthorizationService::authorize_reset_booking(actor)?;

    let booking = persistence
        .get_booking(booking_id)?
        .ok_or_else(|| EngineError::NotFound {
            resource: format!("Booking {booking_id}"),
        })?;

    if booking.status == BookingStatus::New {
        return Err(EngineError::InvalidTransition {
            from: BookingStatus::New,
            to: BookingStatus::New,
        });
    }

    // A past occurrence always holds at least one processed record
    // (this one), so the processed-records lock applies outright.
    let now = clock.now();
    if is_past(booking.date, booking.time_of_day, now) {
        return Err(EngineError::PastLocked {
            template_id: booking.template_id,
            date: booking.date,
        });
    }

    match persistence.reset_booking(booking_id, booking.status, now)? {
        TransitionOutcome::Applied { .. } => {
            info!("Booking {} reset to open by admin {}", booking_id, actor.id);
            Ok(())
        }
        TransitionOutcome::NotApplied => Err(EngineError::InvalidTransition {
            from: booking.status,
            to: BookingStatus::New,
        }),
    }
}

/// Sweeps every open booking whose occurrence has started into the
/// completed state. Idempotent; returns the number of rows changed.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn auto_complete_past(
    persistence: &mut Persistence,
    clock: &dyn Clock,
) -> Result<usize, EngineError> {
    Ok(persistence.auto_complete_past(clock.now())?)
}
