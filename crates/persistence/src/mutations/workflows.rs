// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transactional units of work.
//!
//! Each function here is one SQLite transaction, opened with
//! `immediate_transaction` so the write lock is taken up front and a
//! second writer blocks at `BEGIN` instead of failing mid-unit. State
//! checks are still re-executed inside the transaction through guarded
//! updates, so a caller that validated against stale reads cannot corrupt
//! the ledger: it gets a `NotApplied` / `NoEligibleSubscription` outcome
//! instead. Any error rolls the whole unit back, including notification
//! writes.

use crate::data_models::{
    NewBookingRow, NewNotificationRow, NewSubscriptionRow, format_date, format_datetime,
    format_time,
};
use crate::error::PersistenceError;
use crate::mutations::{bookings, notifications, subscriptions, templates};
use crate::queries;
use chrono::{NaiveDate, NaiveDateTime};
use diesel::SqliteConnection;
use studio_booking_domain::{
    BookingStatus, LessonCount, NoticeKind, NotificationStatus, RefundDecision, SlotTemplate,
    Subscription, SubscriptionStatus, content_prefix, derive_notices,
};
use tracing::{debug, info};

/// Outcome of the booking workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookOutcome {
    /// A credit was debited and a record created.
    Booked {
        booking_id: i64,
        subscription_id: i64,
    },
    /// A record (any status) already exists for this user and occurrence.
    AlreadyBooked,
    /// No active, non-expired subscription with credit left was found, or
    /// a concurrent booking drained the last credit first.
    NoEligibleSubscription,
}

/// Outcome of a guarded single-record status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The record transitioned; `refunded` reports any credit movement.
    Applied { refunded: bool },
    /// The record was not in the expected status when the update ran.
    NotApplied,
}

/// Outcome of the purchase workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Created(i64),
    /// A non-expired active subscription for this user and direction
    /// already exists.
    DuplicateActive,
}

/// One booking cancelled by the template-deletion cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeCancellation {
    pub booking_id: i64,
    pub user_id: i64,
    pub refunded: bool,
}

/// Books one occurrence for a user, debiting the oldest eligible
/// subscription.
///
/// One transaction: duplicate check, FIFO candidate selection, conditional
/// debit, record insert. The debit is guarded on `credit_balance > 0`, so
/// of two concurrent calls against a single remaining credit exactly one
/// returns `Booked`.
///
/// # Errors
///
/// Returns an error if the template has no ID or a statement fails; any
/// failure rolls the whole unit back.
pub fn book(
    conn: &mut SqliteConnection,
    user_id: i64,
    template: &SlotTemplate,
    date: NaiveDate,
    now: NaiveDateTime,
) -> Result<BookOutcome, PersistenceError> {
    let template_id = template
        .template_id
        .ok_or_else(|| PersistenceError::Other("Template has no ID".to_string()))?;

    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        if queries::bookings::exists_for_user_occurrence(conn, user_id, template_id, date)? {
            return Ok(BookOutcome::AlreadyBooked);
        }

        let candidates =
            queries::subscriptions::list_debit_candidates(conn, user_id, template.direction_id)?;
        let Some(subscription) = candidates.into_iter().find(|s| !s.is_expired(now)) else {
            return Ok(BookOutcome::NoEligibleSubscription);
        };
        let subscription_id = subscription
            .subscription_id
            .ok_or_else(|| PersistenceError::Other("Subscription has no ID".to_string()))?;

        if subscriptions::debit_if_available(conn, subscription_id)? == 0 {
            // Lost the race for the last credit
            return Ok(BookOutcome::NoEligibleSubscription);
        }
        subscriptions::deactivate_if_drained(conn, subscription_id)?;

        let booking_id = bookings::insert_booking(
            conn,
            &NewBookingRow {
                user_id,
                template_id,
                subscription_id: Some(subscription_id),
                date: format_date(date),
                time_of_day: format_time(template.time_of_day),
                status: BookingStatus::New.as_str().to_string(),
                created_at: format_datetime(now),
                updated_at: format_datetime(now),
            },
        )?;

        debug!(
            "Booked occurrence (template {}, {}) for user {} against subscription {}",
            template_id, date, user_id, subscription_id
        );
        Ok(BookOutcome::Booked {
            booking_id,
            subscription_id,
        })
    })
}

/// Cancels one open booking, refunding the credit unless the subscription
/// has expired.
///
/// # Errors
///
/// Returns an error if the booking does not exist or a statement fails.
pub fn cancel_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
    now: NaiveDateTime,
) -> Result<TransitionOutcome, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let Some(booking) = queries::bookings::get_booking(conn, booking_id)? else {
            return Err(PersistenceError::NotFound(format!("Booking {booking_id}")));
        };

        if bookings::transition_if(
            conn,
            booking_id,
            BookingStatus::New,
            BookingStatus::Cancelled,
            now,
        )? == 0
        {
            return Ok(TransitionOutcome::NotApplied);
        }

        let refunded = refund_if_eligible(conn, booking.subscription_id, now)?;
        debug!("Cancelled booking {} (refunded: {})", booking_id, refunded);
        Ok(TransitionOutcome::Applied { refunded })
    })
}

/// Marks one open booking as completed. No credit movement.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn complete_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
    now: NaiveDateTime,
) -> Result<TransitionOutcome, PersistenceError> {
    if bookings::transition_if(
        conn,
        booking_id,
        BookingStatus::New,
        BookingStatus::Completed,
        now,
    )? == 0
    {
        return Ok(TransitionOutcome::NotApplied);
    }
    Ok(TransitionOutcome::Applied { refunded: false })
}

/// Resets a completed or cancelled booking back to open. No credit
/// movement.
///
/// The guard is the status the caller observed; a concurrent transition
/// surfaces as `NotApplied`.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn reset_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
    from: BookingStatus,
    now: NaiveDateTime,
) -> Result<TransitionOutcome, PersistenceError> {
    if bookings::transition_if(conn, booking_id, from, BookingStatus::New, now)? == 0 {
        return Ok(TransitionOutcome::NotApplied);
    }
    Ok(TransitionOutcome::Applied { refunded: false })
}

/// Applies a bulk status change to every record of one occurrence.
///
/// One transaction. Cancelling refunds each open record's credit where the
/// subscription has not expired; completing touches only open records;
/// resetting reopens completed and cancelled records without moving
/// credits. Returns the number of records actually changed.
///
/// # Errors
///
/// Returns an error if a statement fails; the whole bulk change rolls
/// back.
pub fn set_occurrence_status(
    conn: &mut SqliteConnection,
    template_id: i64,
    date: NaiveDate,
    target: BookingStatus,
    now: NaiveDateTime,
) -> Result<usize, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let records = queries::bookings::list_for_occurrence(conn, template_id, date)?;
        let mut changed = 0;

        for record in records {
            let Some(booking_id) = record.booking_id else {
                continue;
            };
            match target {
                BookingStatus::Cancelled => {
                    if record.status == BookingStatus::New
                        && bookings::transition_if(
                            conn,
                            booking_id,
                            BookingStatus::New,
                            BookingStatus::Cancelled,
                            now,
                        )? > 0
                    {
                        refund_if_eligible(conn, record.subscription_id, now)?;
                        changed += 1;
                    }
                }
                BookingStatus::Completed => {
                    if record.status == BookingStatus::New {
                        changed += bookings::transition_if(
                            conn,
                            booking_id,
                            BookingStatus::New,
                            BookingStatus::Completed,
                            now,
                        )?;
                    }
                }
                BookingStatus::New => {
                    if record.status.is_terminal() {
                        changed += bookings::transition_if(
                            conn,
                            booking_id,
                            record.status,
                            BookingStatus::New,
                            now,
                        )?;
                    }
                }
            }
        }

        info!(
            "Occurrence (template {}, {}) set to '{}': {} records changed",
            template_id,
            date,
            target.as_str(),
            changed
        );
        Ok(changed)
    })
}

/// Deletes a slot template, cancelling every open booking for it first.
///
/// One transaction: each open record (any date) is cancelled with a refund
/// where eligible and a notification row for its owner; then the template
/// row is removed. Completed and cancelled records are untouched and keep
/// their `template_id` as a dangling reference.
///
/// # Errors
///
/// Returns an error if the template does not exist or a statement fails;
/// any failure rolls back the whole cascade.
pub fn delete_template_cascade(
    conn: &mut SqliteConnection,
    template_id: i64,
    notice_content: &str,
    now: NaiveDateTime,
) -> Result<Vec<CascadeCancellation>, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let open_records = queries::bookings::list_new_for_template(conn, template_id)?;
        let mut cancelled = Vec::with_capacity(open_records.len());

        for record in open_records {
            let Some(booking_id) = record.booking_id else {
                continue;
            };
            if bookings::transition_if(
                conn,
                booking_id,
                BookingStatus::New,
                BookingStatus::Cancelled,
                now,
            )? == 0
            {
                continue;
            }
            let refunded = refund_if_eligible(conn, record.subscription_id, now)?;
            notifications::insert_notification(
                conn,
                &NewNotificationRow {
                    user_id: record.user_id,
                    content: notice_content.to_string(),
                    status: NotificationStatus::New.as_str().to_string(),
                    created_at: format_datetime(now),
                },
            )?;
            cancelled.push(CascadeCancellation {
                booking_id,
                user_id: record.user_id,
                refunded,
            });
        }

        if templates::delete_template_row(conn, template_id)? == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Slot template {template_id}"
            )));
        }

        info!(
            "Deleted slot template {} ({} open bookings cancelled)",
            template_id,
            cancelled.len()
        );
        Ok(cancelled)
    })
}

/// Creates a subscription unless a non-expired active one already exists
/// for the user and direction.
///
/// # Errors
///
/// Returns an error if a statement fails.
pub fn purchase(
    conn: &mut SqliteConnection,
    user_id: i64,
    direction_id: i64,
    lesson_count: LessonCount,
    expires_at: NaiveDateTime,
    now: NaiveDateTime,
) -> Result<PurchaseOutcome, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let existing = queries::subscriptions::list_debit_candidates(conn, user_id, direction_id)?;
        if existing.iter().any(|s| !s.is_expired(now)) {
            return Ok(PurchaseOutcome::DuplicateActive);
        }

        let subscription_id = subscriptions::insert_subscription(
            conn,
            &NewSubscriptionRow {
                user_id,
                direction_id,
                credit_balance: lesson_count.value(),
                status: SubscriptionStatus::Active.as_str().to_string(),
                purchased_at: format_datetime(now),
                expires_at: format_datetime(expires_at),
            },
        )?;

        info!(
            "User {} purchased subscription {} ({} lessons, direction {})",
            user_id,
            subscription_id,
            lesson_count.value(),
            direction_id
        );
        Ok(PurchaseOutcome::Created(subscription_id))
    })
}

/// Runs the auto-complete sweep: every open record whose occurrence has
/// started becomes completed. Returns the number of records swept.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn auto_complete_past(
    conn: &mut SqliteConnection,
    now: NaiveDateTime,
) -> Result<usize, PersistenceError> {
    let swept = bookings::complete_past_new(conn, now)?;
    if swept > 0 {
        debug!("Auto-completed {} past bookings", swept);
    }
    Ok(swept)
}

/// Reconciles one subscription's cached status and notification rows with
/// its snapshot, in one transaction.
///
/// Returns the effective status. `EXPIRED` is inserted at most once ever
/// and marks outstanding warnings for the same subscription as read;
/// `LOW_CREDIT` and `EXPIRING_SOON` are suppressed while an unread copy
/// exists.
///
/// # Errors
///
/// Returns an error if a statement fails; status change and notification
/// writes roll back together.
pub fn sync_subscription(
    conn: &mut SqliteConnection,
    subscription: &Subscription,
    direction_name: &str,
    now: NaiveDateTime,
) -> Result<SubscriptionStatus, PersistenceError> {
    let Some(subscription_id) = subscription.subscription_id else {
        return Ok(subscription.status);
    };

    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let effective = subscription.effective_status(now);
        if effective != subscription.status {
            subscriptions::set_status(conn, subscription_id, effective)?;
            debug!(
                "Subscription {} status refreshed to '{}'",
                subscription_id,
                effective.as_str()
            );
        }

        let prefix = content_prefix(subscription_id, direction_name);
        for notice in derive_notices(subscription, direction_name, now) {
            let pattern = format!("{prefix} {}%", notice.kind.keyword());
            match notice.kind {
                NoticeKind::Expired => {
                    // Supersede outstanding warnings even when the expired
                    // notice itself was emitted on an earlier read.
                    for kind in [NoticeKind::LowCredit, NoticeKind::ExpiringSoon] {
                        notifications::mark_read_by_content(
                            conn,
                            subscription.user_id,
                            &format!("{prefix} {}%", kind.keyword()),
                        )?;
                    }
                    if !queries::notifications::any_with_content(
                        conn,
                        subscription.user_id,
                        &pattern,
                    )? {
                        insert_notice(conn, subscription.user_id, notice.content, now)?;
                    }
                }
                NoticeKind::LowCredit | NoticeKind::ExpiringSoon => {
                    if !queries::notifications::any_unread_with_content(
                        conn,
                        subscription.user_id,
                        &pattern,
                    )? {
                        insert_notice(conn, subscription.user_id, notice.content, now)?;
                    }
                }
            }
        }
        Ok(effective)
    })
}

fn refund_if_eligible(
    conn: &mut SqliteConnection,
    subscription_id: Option<i64>,
    now: NaiveDateTime,
) -> Result<bool, PersistenceError> {
    let Some(subscription_id) = subscription_id else {
        return Ok(false);
    };
    let Some(subscription) = queries::subscriptions::get_subscription(conn, subscription_id)?
    else {
        return Ok(false);
    };

    match subscription.refund_decision(now) {
        RefundDecision::Forfeit => {
            debug!(
                "Subscription {} expired; cancelled credit forfeited",
                subscription_id
            );
            Ok(false)
        }
        RefundDecision::Refund => {
            subscriptions::credit(conn, subscription_id)?;
            // Balance is now above zero and the pass is not expired
            subscriptions::set_status(conn, subscription_id, SubscriptionStatus::Active)?;
            Ok(true)
        }
    }
}

fn insert_notice(
    conn: &mut SqliteConnection,
    user_id: i64,
    content: String,
    now: NaiveDateTime,
) -> Result<(), PersistenceError> {
    notifications::insert_notification(
        conn,
        &NewNotificationRow {
            user_id,
            content,
            status: NotificationStatus::New.as_str().to_string(),
            created_at: format_datetime(now),
        },
    )?;
    Ok(())
}
