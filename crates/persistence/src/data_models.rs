// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and conversions between stored text and domain types.
//!
//! Dates, times and datetimes are stored as ISO-8601 text so that string
//! comparison in SQL matches chronological order.

use crate::diesel_schema::{bookings, directions, notifications, slot_templates, subscriptions};
use crate::error::PersistenceError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;
use studio_booking_domain::{
    BookingRecord, Direction, IsoWeekday, Notification, SlotTemplate, Subscription,
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a date for storage.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats a time of day for storage.
#[must_use]
pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Formats a datetime for storage.
#[must_use]
pub fn format_datetime(datetime: NaiveDateTime) -> String {
    datetime.format(DATETIME_FORMAT).to_string()
}

fn parse_date(table: &'static str, value: &str) -> Result<NaiveDate, PersistenceError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| PersistenceError::CorruptRow {
        table,
        reason: format!("invalid date '{value}': {e}"),
    })
}

fn parse_time(table: &'static str, value: &str) -> Result<NaiveTime, PersistenceError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|e| PersistenceError::CorruptRow {
        table,
        reason: format!("invalid time '{value}': {e}"),
    })
}

fn parse_datetime(table: &'static str, value: &str) -> Result<NaiveDateTime, PersistenceError> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map_err(|e| {
        PersistenceError::CorruptRow {
            table,
            reason: format!("invalid datetime '{value}': {e}"),
        }
    })
}

#[derive(Debug, Queryable)]
pub struct DirectionRow {
    pub direction_id: i64,
    pub name: String,
}

impl From<DirectionRow> for Direction {
    fn from(row: DirectionRow) -> Self {
        Self::with_id(row.direction_id, row.name)
    }
}

#[derive(Insertable)]
#[diesel(table_name = directions)]
pub struct NewDirectionRow<'a> {
    pub name: &'a str,
}

#[derive(Debug, Queryable)]
pub struct TemplateRow {
    pub template_id: i64,
    pub instructor_id: i64,
    pub direction_id: i64,
    pub weekday: i32,
    pub time_of_day: String,
}

impl TryFrom<TemplateRow> for SlotTemplate {
    type Error = PersistenceError;

    fn try_from(row: TemplateRow) -> Result<Self, Self::Error> {
        let weekday = u8::try_from(row.weekday)
            .ok()
            .and_then(|n| IsoWeekday::new(n).ok())
            .ok_or_else(|| PersistenceError::CorruptRow {
                table: "slot_templates",
                reason: format!("invalid weekday {}", row.weekday),
            })?;
        Ok(Self::with_id(
            row.template_id,
            row.instructor_id,
            row.direction_id,
            weekday,
            parse_time("slot_templates", &row.time_of_day)?,
        ))
    }
}

#[derive(Insertable)]
#[diesel(table_name = slot_templates)]
pub struct NewTemplateRow {
    pub instructor_id: i64,
    pub direction_id: i64,
    pub weekday: i32,
    pub time_of_day: String,
}

#[derive(Debug, Queryable)]
pub struct SubscriptionRow {
    pub subscription_id: i64,
    pub user_id: i64,
    pub direction_id: i64,
    pub credit_balance: i64,
    pub status: String,
    pub purchased_at: String,
    pub expires_at: String,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = PersistenceError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            subscription_id: Some(row.subscription_id),
            user_id: row.user_id,
            direction_id: row.direction_id,
            credit_balance: row.credit_balance,
            status: row
                .status
                .parse()
                .map_err(|e| PersistenceError::CorruptRow {
                    table: "subscriptions",
                    reason: format!("{e}"),
                })?,
            purchased_at: parse_datetime("subscriptions", &row.purchased_at)?,
            expires_at: parse_datetime("subscriptions", &row.expires_at)?,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = subscriptions)]
pub struct NewSubscriptionRow {
    pub user_id: i64,
    pub direction_id: i64,
    pub credit_balance: i64,
    pub status: String,
    pub purchased_at: String,
    pub expires_at: String,
}

#[derive(Debug, Queryable)]
pub struct BookingRow {
    pub booking_id: i64,
    pub user_id: i64,
    pub template_id: i64,
    pub subscription_id: Option<i64>,
    pub date: String,
    pub time_of_day: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<BookingRow> for BookingRecord {
    type Error = PersistenceError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            booking_id: Some(row.booking_id),
            user_id: row.user_id,
            template_id: row.template_id,
            subscription_id: row.subscription_id,
            date: parse_date("bookings", &row.date)?,
            time_of_day: parse_time("bookings", &row.time_of_day)?,
            status: row
                .status
                .parse()
                .map_err(|e| PersistenceError::CorruptRow {
                    table: "bookings",
                    reason: format!("{e}"),
                })?,
            created_at: parse_datetime("bookings", &row.created_at)?,
            updated_at: parse_datetime("bookings", &row.updated_at)?,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBookingRow {
    pub user_id: i64,
    pub template_id: i64,
    pub subscription_id: Option<i64>,
    pub date: String,
    pub time_of_day: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Queryable)]
pub struct NotificationRow {
    pub notification_id: i64,
    pub user_id: i64,
    pub content: String,
    pub status: String,
    pub created_at: String,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = PersistenceError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            notification_id: Some(row.notification_id),
            user_id: row.user_id,
            content: row.content,
            status: row
                .status
                .parse()
                .map_err(|e| PersistenceError::CorruptRow {
                    table: "notifications",
                    reason: format!("{e}"),
                })?,
            created_at: parse_datetime("notifications", &row.created_at)?,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotificationRow {
    pub user_id: i64,
    pub content: String,
    pub status: String,
    pub created_at: String,
}
