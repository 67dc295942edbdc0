// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The lesson-credit ledger: pass purchase, subscription listing with
//! status reconciliation, and the notification inbox.

use studio_booking_domain::{
    Clock, LessonCount, Notification, Subscription, expiry_for_purchase,
};
use studio_booking_persistence::{Persistence, PurchaseOutcome};
use tracing::info;

use crate::Actor;
use crate::error::EngineError;

/// Buys a lesson pass for the actor on one direction.
///
/// The end date is fixed at purchase time, one month out; it never
/// moves afterwards.
///
/// # Errors
///
/// Returns an error if:
/// - `lesson_count` is not 4, 8 or 12
/// - The direction does not exist
/// - The actor already holds a non-expired active pass for the
///   direction
/// - The database transaction fails
pub fn purchase(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    actor: &Actor,
    direction_id: i64,
    lesson_count: i64,
) -> Result<i64, EngineError> {
    let lesson_count = LessonCount::new(lesson_count)?;
    if persistence.get_direction(direction_id)?.is_none() {
        return Err(EngineError::NotFound {
            resource: format!("Direction {direction_id}"),
        });
    }

    let now = clock.now();
    let expires_at = expiry_for_purchase(now)?;
    match persistence.purchase_subscription(actor.id, direction_id, lesson_count, expires_at, now)?
    {
        PurchaseOutcome::Created(subscription_id) => {
            info!(
                "User {} bought a {}-lesson pass for direction {} (subscription {})",
                actor.id,
                lesson_count.value(),
                direction_id,
                subscription_id
            );
            Ok(subscription_id)
        }
        PurchaseOutcome::DuplicateActive => Err(EngineError::Conflict {
            message: format!(
                "User {} already has an active pass for direction {direction_id}",
                actor.id
            ),
        }),
    }
}

/// Lists one user's subscriptions with their effective status.
///
/// Each pass is reconciled on read: a stale cached status is persisted
/// and due notices are emitted. A missing direction name degrades to an
/// empty string rather than failing the read.
///
/// # Errors
///
/// Returns an error if a database query or the reconciliation fails.
pub fn list_subscriptions(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    user_id: i64,
) -> Result<Vec<Subscription>, EngineError> {
    let now = clock.now();
    let mut subscriptions = persistence.list_subscriptions(user_id)?;
    for subscription in &mut subscriptions {
        let direction_name = persistence
            .get_direction(subscription.direction_id)?
            .map(|d| d.name)
            .unwrap_or_default();
        subscription.status = persistence.sync_subscription(subscription, &direction_name, now)?;
    }
    Ok(subscriptions)
}

/// Lists one user's notifications, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_notifications(
    persistence: &mut Persistence,
    user_id: i64,
) -> Result<Vec<Notification>, EngineError> {
    Ok(persistence.list_notifications(user_id)?)
}

/// Marks one notification as read.
///
/// # Errors
///
/// Returns an error if the notification does not exist or the update
/// fails.
pub fn mark_notification_read(
    persistence: &mut Persistence,
    notification_id: i64,
) -> Result<(), EngineError> {
    if persistence.mark_notification_read(notification_id)? {
        Ok(())
    } else {
        Err(EngineError::NotFound {
            resource: format!("Notification {notification_id}"),
        })
    }
}
