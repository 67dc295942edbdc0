// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the operation layer.

use chrono::{NaiveDate, NaiveDateTime};
use studio_booking_domain::{BookingStatus, DomainError};
use studio_booking_persistence::PersistenceError;
use thiserror::Error;

/// Errors surfaced by the operation layer.
///
/// These are distinct from domain and persistence errors and represent
/// the contract an outer transport layer maps onto its responses.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid input was provided.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },

    /// The request collides with existing state.
    #[error("Conflict: {message}")]
    Conflict {
        /// A human-readable description of the collision.
        message: String,
    },

    /// A requested resource was not found.
    #[error("{resource} not found")]
    NotFound {
        /// The resource that was requested.
        resource: String,
    },

    /// No subscription can pay for the requested booking.
    #[error("User {user_id} has no active subscription for direction {direction_id}")]
    NoActiveSubscription {
        /// The user who tried to book.
        user_id: i64,
        /// The direction the slot belongs to.
        direction_id: i64,
    },

    /// A class cannot be marked completed before it starts.
    #[error("Class starting at {starts_at} cannot be marked completed yet")]
    FutureCompletion {
        /// When the occurrence starts.
        starts_at: NaiveDateTime,
    },

    /// A past occurrence whose records were already processed is frozen.
    #[error("Occurrence of template {template_id} on {date} is past and already processed")]
    PastLocked {
        /// The slot template the occurrence belongs to.
        template_id: i64,
        /// The occurrence date.
        date: NaiveDate,
    },

    /// The booking is not in a state the requested transition accepts.
    #[error(
        "Invalid booking transition from '{}' to '{}'",
        .from.as_str(),
        .to.as_str()
    )]
    InvalidTransition {
        /// The status the booking was observed in.
        from: BookingStatus,
        /// The requested target status.
        to: BookingStatus,
    },

    /// The actor's role does not permit the action.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },

    /// The storage layer failed; any enclosing transaction rolled back.
    #[error("Storage failure: {0}")]
    Storage(#[from] PersistenceError),
}

impl From<DomainError> for EngineError {
    fn from(err: DomainError) -> Self {
        let field = match &err {
            DomainError::InvalidWeekday { .. } => "weekday",
            DomainError::InvalidLessonCount { .. } => "lesson_count",
            DomainError::WeekdayMismatch { .. } => "date",
            DomainError::InvalidBookingStatus(_)
            | DomainError::InvalidSubscriptionStatus(_)
            | DomainError::InvalidNotificationStatus(_)
            | DomainError::InvalidStatusTransition { .. } => "status",
            DomainError::DateArithmeticOverflow { .. } => "date",
        };
        Self::Validation {
            field: field.to_string(),
            message: err.to_string(),
        }
    }
}
