// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pass purchase and subscription reconciliation tests.

use super::{admin, at, buy, clock, clock_at, date, seed_world, student, test_db, test_now};
use crate::notifier::NullNotifier;
use crate::{
    EngineError, book, cancel, list_notifications, list_subscriptions, mark_notification_read,
    purchase,
};
use studio_booking_domain::SubscriptionStatus;

#[test]
fn test_purchase_rejects_odd_lesson_count() {
    let mut db = test_db();
    let (direction_id, _) = seed_world(&mut db);

    let result = purchase(&mut db, &clock(), &student(7), direction_id, 5);
    assert!(matches!(
        result,
        Err(EngineError::Validation { ref field, .. }) if field == "lesson_count"
    ));
}

#[test]
fn test_purchase_unknown_direction() {
    let mut db = test_db();
    let result = purchase(&mut db, &clock(), &student(7), 999, 8);
    assert!(matches!(result, Err(EngineError::NotFound { .. })));
}

#[test]
fn test_duplicate_active_pass_conflicts() {
    let mut db = test_db();
    let (direction_id, _) = seed_world(&mut db);
    buy(&mut db, 7, direction_id, 8, test_now());

    let result = purchase(&mut db, &clock(), &student(7), direction_id, 4);
    assert!(matches!(result, Err(EngineError::Conflict { .. })));
}

#[test]
fn test_purchase_allowed_after_expiry() {
    let mut db = test_db();
    let (direction_id, _) = seed_world(&mut db);
    buy(&mut db, 7, direction_id, 8, at(2026, 6, 1, 10, 0));

    // The June pass has lapsed; a fresh one is fine
    purchase(&mut db, &clock(), &student(7), direction_id, 8).unwrap();
}

#[test]
fn test_purchase_book_cancel_round_trip() {
    let mut db = test_db();
    let (direction_id, template_id) = seed_world(&mut db);
    let subscription_id = buy(&mut db, 7, direction_id, 4, test_now());

    let booking_id = book(
        &mut db,
        &clock(),
        &NullNotifier,
        &student(7),
        template_id,
        date(2026, 8, 31),
    )
    .unwrap();
    assert_eq!(
        db.get_subscription(subscription_id).unwrap().unwrap().credit_balance,
        3
    );

    assert!(cancel(&mut db, &clock(), &student(7), booking_id).unwrap());
    assert_eq!(
        db.get_subscription(subscription_id).unwrap().unwrap().credit_balance,
        4
    );
}

#[test]
fn test_expired_cancel_forfeits_credit() {
    let mut db = test_db();
    let (direction_id, template_id) = seed_world(&mut db);
    let subscription_id = buy(&mut db, 7, direction_id, 4, at(2026, 8, 1, 10, 0));
    let booking_id = book(
        &mut db,
        &clock_at(2026, 8, 1, 10, 0),
        &NullNotifier,
        &student(7),
        template_id,
        date(2026, 8, 3),
    )
    .unwrap();

    // Cancelled after the pass's 2026-09-01 end date
    let refunded = cancel(&mut db, &clock_at(2026, 9, 10, 12, 0), &admin(), booking_id).unwrap();

    assert!(!refunded);
    assert_eq!(
        db.get_subscription(subscription_id).unwrap().unwrap().credit_balance,
        3
    );
}

#[test]
fn test_listing_flips_expired_pass_and_notifies_once() {
    let mut db = test_db();
    let (direction_id, _) = seed_world(&mut db);
    buy(&mut db, 7, direction_id, 8, at(2026, 6, 1, 10, 0));

    for _ in 0..3 {
        let subscriptions = list_subscriptions(&mut db, &clock(), 7).unwrap();
        assert_eq!(subscriptions.len(), 1);
        assert_eq!(subscriptions[0].status, SubscriptionStatus::Inactive);
    }

    let notifications = list_notifications(&mut db, 7).unwrap();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].content.contains("EXPIRED"));
    assert!(notifications[0].content.contains("'Salsa'"));
}

#[test]
fn test_listing_leaves_healthy_pass_alone() {
    let mut db = test_db();
    let (direction_id, _) = seed_world(&mut db);
    buy(&mut db, 7, direction_id, 8, test_now());

    let subscriptions = list_subscriptions(&mut db, &clock(), 7).unwrap();
    assert_eq!(subscriptions[0].status, SubscriptionStatus::Active);
    assert!(list_notifications(&mut db, 7).unwrap().is_empty());
}

#[test]
fn test_mark_notification_read_unknown() {
    let mut db = test_db();
    let result = mark_notification_read(&mut db, 999);
    assert!(matches!(result, Err(EngineError::NotFound { .. })));
}

#[test]
fn test_mark_notification_read_round_trip() {
    let mut db = test_db();
    let (direction_id, _) = seed_world(&mut db);
    buy(&mut db, 7, direction_id, 8, at(2026, 6, 1, 10, 0));
    list_subscriptions(&mut db, &clock(), 7).unwrap();

    let notification_id = list_notifications(&mut db, 7).unwrap()[0]
        .notification_id
        .unwrap();
    mark_notification_read(&mut db, notification_id).unwrap();

    let notifications = list_notifications(&mut db, 7).unwrap();
    assert_eq!(
        notifications[0].status,
        studio_booking_domain::NotificationStatus::Read
    );
}
