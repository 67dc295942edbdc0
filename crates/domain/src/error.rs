// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::NaiveDate;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Weekday number is outside the ISO range 1 (Monday) to 7 (Sunday).
    InvalidWeekday {
        /// The invalid weekday number.
        weekday: u8,
    },
    /// Lesson count is not one of the pack sizes on sale.
    InvalidLessonCount {
        /// The invalid count value.
        count: i64,
    },
    /// Booking status string is not recognised.
    InvalidBookingStatus(String),
    /// Subscription status string is not recognised.
    InvalidSubscriptionStatus(String),
    /// Notification status string is not recognised.
    InvalidNotificationStatus(String),
    /// Status transition is not permitted by the booking lifecycle.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition is rejected.
        reason: String,
    },
    /// Booking date does not fall on the template's weekday.
    WeekdayMismatch {
        /// The template's ISO weekday.
        expected: u8,
        /// The date that was supplied.
        date: NaiveDate,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWeekday { weekday } => {
                write!(f, "Invalid weekday: {weekday}. Must be between 1 and 7")
            }
            Self::InvalidLessonCount { count } => {
                write!(f, "Invalid lesson count: {count}. Must be 4, 8 or 12")
            }
            Self::InvalidBookingStatus(status) => {
                write!(f, "Invalid booking status: {status}")
            }
            Self::InvalidSubscriptionStatus(status) => {
                write!(f, "Invalid subscription status: {status}")
            }
            Self::InvalidNotificationStatus(status) => {
                write!(f, "Invalid notification status: {status}")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot transition booking from '{from}' to '{to}': {reason}")
            }
            Self::WeekdayMismatch { expected, date } => {
                write!(
                    f,
                    "Date {date} does not fall on the template's weekday {expected}"
                )
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
