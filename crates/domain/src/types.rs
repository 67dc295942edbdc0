// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Core value types for the scheduling and ledger domain.

use crate::error::DomainError;
use crate::status::{BookingStatus, NotificationStatus};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// ISO-8601 weekday number: 1 is Monday, 7 is Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IsoWeekday(u8);

impl IsoWeekday {
    /// Creates a weekday from its ISO number.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidWeekday` if the number is outside 1..=7.
    pub const fn new(weekday: u8) -> Result<Self, DomainError> {
        if matches!(weekday, 1..=7) {
            Ok(Self(weekday))
        } else {
            Err(DomainError::InvalidWeekday { weekday })
        }
    }

    /// Returns the weekday a calendar date falls on.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        // number_from_monday is always 1..=7
        Self(u8::try_from(date.weekday().number_from_monday()).unwrap_or(1))
    }

    /// Returns the ISO weekday number.
    #[must_use]
    pub const fn number(&self) -> u8 {
        self.0
    }
}

/// Number of lessons in a pack on sale. Only 4, 8 and 12 are sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonCount(i64);

impl LessonCount {
    /// Creates a lesson count from a raw value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLessonCount` unless the value is 4, 8
    /// or 12.
    pub const fn new(count: i64) -> Result<Self, DomainError> {
        match count {
            4 | 8 | 12 => Ok(Self(count)),
            _ => Err(DomainError::InvalidLessonCount { count }),
        }
    }

    /// Returns the number of lessons.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

/// A class direction (style) offered by the studio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Direction {
    pub direction_id: Option<i64>,
    pub name: String,
}

impl Direction {
    /// Creates a direction that has not been persisted yet.
    #[must_use]
    pub const fn new(name: String) -> Self {
        Self {
            direction_id: None,
            name,
        }
    }

    /// Creates a direction with a known database ID.
    #[must_use]
    pub const fn with_id(direction_id: i64, name: String) -> Self {
        Self {
            direction_id: Some(direction_id),
            name,
        }
    }
}

/// A weekly recurring class slot.
///
/// Templates carry no dates; dated occurrences are derived from them by
/// week expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTemplate {
    pub template_id: Option<i64>,
    pub instructor_id: i64,
    pub direction_id: i64,
    pub weekday: IsoWeekday,
    pub time_of_day: NaiveTime,
}

impl SlotTemplate {
    /// Creates a template that has not been persisted yet.
    #[must_use]
    pub const fn new(
        instructor_id: i64,
        direction_id: i64,
        weekday: IsoWeekday,
        time_of_day: NaiveTime,
    ) -> Self {
        Self {
            template_id: None,
            instructor_id,
            direction_id,
            weekday,
            time_of_day,
        }
    }

    /// Creates a template with a known database ID.
    #[must_use]
    pub const fn with_id(
        template_id: i64,
        instructor_id: i64,
        direction_id: i64,
        weekday: IsoWeekday,
        time_of_day: NaiveTime,
    ) -> Self {
        Self {
            template_id: Some(template_id),
            instructor_id,
            direction_id,
            weekday,
            time_of_day,
        }
    }
}

/// A dated instance of a slot template.
///
/// Occurrences are derived on demand and never persisted; their identity
/// is `(template_id, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub template_id: i64,
    pub instructor_id: i64,
    pub direction_id: i64,
    pub date: NaiveDate,
    pub time_of_day: NaiveTime,
}

impl Occurrence {
    /// Returns the wall-clock datetime the occurrence starts at.
    #[must_use]
    pub const fn starts_at(&self) -> NaiveDateTime {
        NaiveDateTime::new(self.date, self.time_of_day)
    }
}

/// A student's booking of one occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub booking_id: Option<i64>,
    pub user_id: i64,
    pub template_id: i64,
    /// Subscription the credit was debited from, when one was charged.
    pub subscription_id: Option<i64>,
    pub date: NaiveDate,
    pub time_of_day: NaiveTime,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl BookingRecord {
    /// Returns the wall-clock datetime of the booked occurrence.
    #[must_use]
    pub const fn starts_at(&self) -> NaiveDateTime {
        NaiveDateTime::new(self.date, self.time_of_day)
    }
}

/// A stored notification addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: Option<i64>,
    pub user_id: i64,
    pub content: String,
    pub status: NotificationStatus,
    pub created_at: NaiveDateTime,
}
