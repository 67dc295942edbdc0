// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the studio booking system.
//!
//! This crate provides Diesel-backed `SQLite` persistence for directions,
//! slot templates, bookings, subscriptions and notifications.
//!
//! ## Concurrency model
//!
//! Every multi-row unit of work (booking, cancellation, the cascade
//! delete, purchase, notice sync) runs inside a single immediate
//! transaction, so concurrent writers queue at `BEGIN` rather than
//! failing mid-unit, and every state-dependent update carries a `WHERE`
//! guard on the state it expects (`credit_balance > 0`,
//! `status = 'new'`). The affected-row count is checked, so two racing
//! requests against the same credit or record cannot both succeed.
//!
//! ## Storage conventions
//!
//! Dates, times and datetimes are ISO-8601 text columns; lexicographic
//! comparison in SQL matches chronological order. Booking rows are never
//! deleted and keep their `template_id` even after the template is gone.
//!
//! ## Testing
//!
//! Tests run against unique shared in-memory databases named from an
//! atomic counter, so they are isolated and deterministic.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use chrono::{NaiveDate, NaiveDateTime};
use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use studio_booking_domain::{
    BookingRecord, BookingStatus, Direction, IsoWeekday, LessonCount, Notification, SlotTemplate,
    Subscription, SubscriptionStatus,
};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;

pub use data_models::{DATE_FORMAT, DATETIME_FORMAT, TIME_FORMAT};
pub use error::PersistenceError;
pub use mutations::{BookOutcome, CascadeCancellation, PurchaseOutcome, TransitionOutcome};

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based collisions.
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the booking schema.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn = backend::initialize_database(&shared_memory_url)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn = backend::initialize_database(path_str)?;
        backend::enable_wal_mode(&mut conn)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Directions
    // ========================================================================

    /// Creates a direction and returns its generated ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including a duplicate name).
    pub fn create_direction(&mut self, name: &str) -> Result<i64, PersistenceError> {
        mutations::templates::insert_direction(&mut self.conn, name)
    }

    /// Retrieves a direction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_direction(
        &mut self,
        direction_id: i64,
    ) -> Result<Option<Direction>, PersistenceError> {
        queries::templates::get_direction(&mut self.conn, direction_id)
    }

    /// Lists all directions ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_directions(&mut self) -> Result<Vec<Direction>, PersistenceError> {
        queries::templates::list_directions(&mut self.conn)
    }

    // ========================================================================
    // Slot templates
    // ========================================================================

    /// Creates a slot template and returns its generated ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including the unique
    /// instructor slot constraint).
    pub fn create_template(&mut self, template: &SlotTemplate) -> Result<i64, PersistenceError> {
        mutations::templates::insert_template(
            &mut self.conn,
            &data_models::NewTemplateRow {
                instructor_id: template.instructor_id,
                direction_id: template.direction_id,
                weekday: i32::from(template.weekday.number()),
                time_of_day: data_models::format_time(template.time_of_day),
            },
        )
    }

    /// Retrieves a slot template by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or the row is corrupt.
    pub fn get_template(
        &mut self,
        template_id: i64,
    ) -> Result<Option<SlotTemplate>, PersistenceError> {
        queries::templates::get_template(&mut self.conn, template_id)
    }

    /// Lists all slot templates ordered by weekday and time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or a row is corrupt.
    pub fn list_templates(&mut self) -> Result<Vec<SlotTemplate>, PersistenceError> {
        queries::templates::list_templates(&mut self.conn)
    }

    /// Lists the slot templates held by one instructor.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or a row is corrupt.
    pub fn list_templates_by_instructor(
        &mut self,
        instructor_id: i64,
    ) -> Result<Vec<SlotTemplate>, PersistenceError> {
        queries::templates::list_templates_by_instructor(&mut self.conn, instructor_id)
    }

    /// Lists the slot templates of one direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or a row is corrupt.
    pub fn list_templates_by_direction(
        &mut self,
        direction_id: i64,
    ) -> Result<Vec<SlotTemplate>, PersistenceError> {
        queries::templates::list_templates_by_direction(&mut self.conn, direction_id)
    }

    /// Checks whether an instructor already holds a template at the given
    /// weekday and time, across all directions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn instructor_has_slot_at(
        &mut self,
        instructor_id: i64,
        weekday: IsoWeekday,
        time_of_day: chrono::NaiveTime,
    ) -> Result<bool, PersistenceError> {
        queries::templates::instructor_has_slot_at(
            &mut self.conn,
            instructor_id,
            i32::from(weekday.number()),
            &data_models::format_time(time_of_day),
        )
    }

    /// Deletes a slot template, cancelling every open booking for it first.
    ///
    /// One transaction: open records (any date) are cancelled with a
    /// refund where the subscription has not expired, a notification row
    /// is written per cancelled booking, then the template row is removed.
    ///
    /// # Arguments
    ///
    /// * `template_id` - The template to delete
    /// * `notice_content` - Notification text for affected users
    /// * `now` - The current instant
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not exist or any statement
    /// fails; the whole cascade rolls back.
    pub fn delete_template_cascade(
        &mut self,
        template_id: i64,
        notice_content: &str,
        now: NaiveDateTime,
    ) -> Result<Vec<CascadeCancellation>, PersistenceError> {
        mutations::workflows::delete_template_cascade(
            &mut self.conn,
            template_id,
            notice_content,
            now,
        )
    }

    // ========================================================================
    // Bookings
    // ========================================================================

    /// Books one occurrence for a user, debiting the oldest eligible
    /// subscription. See `BookOutcome` for the possible results.
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails; the unit rolls back.
    pub fn book(
        &mut self,
        user_id: i64,
        template: &SlotTemplate,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<BookOutcome, PersistenceError> {
        mutations::workflows::book(&mut self.conn, user_id, template, date, now)
    }

    /// Retrieves a booking record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or the row is corrupt.
    pub fn get_booking(
        &mut self,
        booking_id: i64,
    ) -> Result<Option<BookingRecord>, PersistenceError> {
        queries::bookings::get_booking(&mut self.conn, booking_id)
    }

    /// Lists all booking records of one occurrence, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or a row is corrupt.
    pub fn list_bookings_for_occurrence(
        &mut self,
        template_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<BookingRecord>, PersistenceError> {
        queries::bookings::list_for_occurrence(&mut self.conn, template_id, date)
    }

    /// Lists all booking records of one user, newest occurrence first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or a row is corrupt.
    pub fn list_bookings_for_user(
        &mut self,
        user_id: i64,
    ) -> Result<Vec<BookingRecord>, PersistenceError> {
        queries::bookings::list_for_user(&mut self.conn, user_id)
    }

    /// Cancels one open booking, refunding the credit unless the
    /// subscription has expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking does not exist or a statement
    /// fails.
    pub fn cancel_booking(
        &mut self,
        booking_id: i64,
        now: NaiveDateTime,
    ) -> Result<TransitionOutcome, PersistenceError> {
        mutations::workflows::cancel_booking(&mut self.conn, booking_id, now)
    }

    /// Marks one open booking as completed. No credit movement.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn complete_booking(
        &mut self,
        booking_id: i64,
        now: NaiveDateTime,
    ) -> Result<TransitionOutcome, PersistenceError> {
        mutations::workflows::complete_booking(&mut self.conn, booking_id, now)
    }

    /// Resets a completed or cancelled booking back to open. No credit
    /// movement.
    ///
    /// # Arguments
    ///
    /// * `booking_id` - The record to reset
    /// * `from` - The status the caller observed (the update guard)
    /// * `now` - The current instant
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn reset_booking(
        &mut self,
        booking_id: i64,
        from: BookingStatus,
        now: NaiveDateTime,
    ) -> Result<TransitionOutcome, PersistenceError> {
        mutations::workflows::reset_booking(&mut self.conn, booking_id, from, now)
    }

    /// Applies a bulk status change to every record of one occurrence.
    /// Returns the number of records actually changed.
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails; the bulk change rolls back.
    pub fn set_occurrence_status(
        &mut self,
        template_id: i64,
        date: NaiveDate,
        target: BookingStatus,
        now: NaiveDateTime,
    ) -> Result<usize, PersistenceError> {
        mutations::workflows::set_occurrence_status(&mut self.conn, template_id, date, target, now)
    }

    /// Runs the auto-complete sweep: every open record whose occurrence
    /// has started becomes completed. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn auto_complete_past(&mut self, now: NaiveDateTime) -> Result<usize, PersistenceError> {
        mutations::workflows::auto_complete_past(&mut self.conn, now)
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Creates a subscription unless a non-expired active one already
    /// exists for the user and direction.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The purchasing user
    /// * `direction_id` - The direction the pass is valid for
    /// * `lesson_count` - The validated pack size
    /// * `expires_at` - The fixed end date computed at purchase
    /// * `now` - The current instant (also recorded as the purchase time)
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails.
    pub fn purchase_subscription(
        &mut self,
        user_id: i64,
        direction_id: i64,
        lesson_count: LessonCount,
        expires_at: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<PurchaseOutcome, PersistenceError> {
        mutations::workflows::purchase(
            &mut self.conn,
            user_id,
            direction_id,
            lesson_count,
            expires_at,
            now,
        )
    }

    /// Retrieves a subscription by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or the row is corrupt.
    pub fn get_subscription(
        &mut self,
        subscription_id: i64,
    ) -> Result<Option<Subscription>, PersistenceError> {
        queries::subscriptions::get_subscription(&mut self.conn, subscription_id)
    }

    /// Lists all subscriptions of one user, oldest purchase first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or a row is corrupt.
    pub fn list_subscriptions(
        &mut self,
        user_id: i64,
    ) -> Result<Vec<Subscription>, PersistenceError> {
        queries::subscriptions::list_for_user(&mut self.conn, user_id)
    }

    /// Reconciles one subscription's cached status and notification rows
    /// with its snapshot, in one transaction. Returns the effective
    /// status.
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails; status change and
    /// notification writes roll back together.
    pub fn sync_subscription(
        &mut self,
        subscription: &Subscription,
        direction_name: &str,
        now: NaiveDateTime,
    ) -> Result<SubscriptionStatus, PersistenceError> {
        mutations::workflows::sync_subscription(&mut self.conn, subscription, direction_name, now)
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Lists all notifications of one user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or a row is corrupt.
    pub fn list_notifications(
        &mut self,
        user_id: i64,
    ) -> Result<Vec<Notification>, PersistenceError> {
        queries::notifications::list_for_user(&mut self.conn, user_id)
    }

    /// Marks one notification as read. Returns false if no such row
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_notification_read(
        &mut self,
        notification_id: i64,
    ) -> Result<bool, PersistenceError> {
        Ok(mutations::notifications::mark_read(&mut self.conn, notification_id)? > 0)
    }
}
