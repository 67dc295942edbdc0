// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification emission and deduplication tests.
//!
//! Notices reach the notifications table through `sync_subscription`;
//! these tests drive subscriptions into warning states and assert the
//! dedup rules on the resulting rows.

use super::{at, date, seed_direction, seed_monday_template, seed_subscription, test_db, test_now};
use crate::{BookOutcome, Persistence};
use chrono::NaiveDateTime;
use studio_booking_domain::NotificationStatus;

/// Buys a four-lesson pass at `purchased_at` and books three Mondays so
/// exactly one credit remains.
fn seed_low_credit_pass(
    db: &mut Persistence,
    user_id: i64,
    direction_id: i64,
    purchased_at: NaiveDateTime,
) -> i64 {
    let template = seed_monday_template(db, 10, direction_id);
    let subscription_id = seed_subscription(db, user_id, direction_id, 4, purchased_at);
    for monday in [date(2026, 8, 3), date(2026, 8, 10), date(2026, 8, 17)] {
        let outcome = db.book(user_id, &template, monday, purchased_at).unwrap();
        assert!(matches!(outcome, BookOutcome::Booked { .. }));
    }
    subscription_id
}

fn sync(db: &mut Persistence, subscription_id: i64, name: &str, now: NaiveDateTime) {
    let subscription = db.get_subscription(subscription_id).unwrap().unwrap();
    db.sync_subscription(&subscription, name, now).unwrap();
}

fn contents_with(db: &mut Persistence, user_id: i64, keyword: &str) -> Vec<(String, NotificationStatus)> {
    db.list_notifications(user_id)
        .unwrap()
        .into_iter()
        .filter(|n| n.content.contains(keyword))
        .map(|n| (n.content, n.status))
        .collect()
}

#[test]
fn test_expired_notice_emitted_exactly_once() {
    let mut db = test_db();
    let direction_id = seed_direction(&mut db, "Salsa");
    let subscription_id = seed_subscription(&mut db, 7, direction_id, 8, at(2026, 6, 1, 10, 0));

    sync(&mut db, subscription_id, "Salsa", test_now());
    sync(&mut db, subscription_id, "Salsa", test_now());

    let expired = contents_with(&mut db, 7, "EXPIRED");
    assert_eq!(expired.len(), 1);
    assert!(
        expired[0]
            .0
            .starts_with(&format!("Subscription {subscription_id} on 'Salsa' EXPIRED"))
    );
}

#[test]
fn test_expired_notice_not_reemitted_after_read() {
    let mut db = test_db();
    let direction_id = seed_direction(&mut db, "Salsa");
    let subscription_id = seed_subscription(&mut db, 7, direction_id, 8, at(2026, 6, 1, 10, 0));

    sync(&mut db, subscription_id, "Salsa", test_now());
    let notification = db.list_notifications(7).unwrap().remove(0);
    assert!(
        db.mark_notification_read(notification.notification_id.unwrap())
            .unwrap()
    );

    sync(&mut db, subscription_id, "Salsa", test_now());

    assert_eq!(contents_with(&mut db, 7, "EXPIRED").len(), 1);
}

#[test]
fn test_low_credit_suppressed_while_unread_then_reemitted() {
    let mut db = test_db();
    let direction_id = seed_direction(&mut db, "Salsa");
    let subscription_id = seed_low_credit_pass(&mut db, 7, direction_id, at(2026, 8, 1, 10, 0));

    // Well before the end date, so only LOW_CREDIT applies
    sync(&mut db, subscription_id, "Salsa", at(2026, 8, 20, 12, 0));
    sync(&mut db, subscription_id, "Salsa", at(2026, 8, 21, 12, 0));
    assert_eq!(contents_with(&mut db, 7, "LOW_CREDIT").len(), 1);

    let notification = db.list_notifications(7).unwrap().remove(0);
    db.mark_notification_read(notification.notification_id.unwrap())
        .unwrap();

    sync(&mut db, subscription_id, "Salsa", at(2026, 8, 22, 12, 0));
    assert_eq!(contents_with(&mut db, 7, "LOW_CREDIT").len(), 2);
}

#[test]
fn test_expiring_soon_emitted_inside_window_only() {
    let mut db = test_db();
    let direction_id = seed_direction(&mut db, "Salsa");
    // Expires 2026-09-27
    let subscription_id = seed_subscription(&mut db, 7, direction_id, 8, test_now());

    // Ten days out: nothing
    sync(&mut db, subscription_id, "Salsa", at(2026, 9, 17, 12, 0));
    assert!(contents_with(&mut db, 7, "EXPIRING_SOON").is_empty());

    // Three days out: warning appears
    sync(&mut db, subscription_id, "Salsa", at(2026, 9, 24, 12, 0));
    let warnings = contents_with(&mut db, 7, "EXPIRING_SOON");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].0.ends_with("valid until 2026-09-27."));
}

#[test]
fn test_expired_supersedes_outstanding_warnings() {
    let mut db = test_db();
    let direction_id = seed_direction(&mut db, "Salsa");
    // Expires 2026-09-01; one credit left
    let subscription_id = seed_low_credit_pass(&mut db, 7, direction_id, at(2026, 8, 1, 10, 0));

    // Two days before the end date both warnings land unread
    sync(&mut db, subscription_id, "Salsa", at(2026, 8, 30, 12, 0));
    assert_eq!(contents_with(&mut db, 7, "LOW_CREDIT").len(), 1);
    assert_eq!(contents_with(&mut db, 7, "EXPIRING_SOON").len(), 1);

    sync(&mut db, subscription_id, "Salsa", at(2026, 9, 5, 12, 0));

    let all = db.list_notifications(7).unwrap();
    assert_eq!(all.len(), 3);
    for notification in &all {
        if notification.content.contains("EXPIRED:") {
            assert_eq!(notification.status, NotificationStatus::New);
        } else {
            assert_eq!(notification.status, NotificationStatus::Read);
        }
    }
}

#[test]
fn test_list_notifications_newest_first() {
    let mut db = test_db();
    let direction_id = seed_direction(&mut db, "Salsa");
    // One credit left two days before the end date: both warnings in one
    // sync, LOW_CREDIT inserted before EXPIRING_SOON
    let subscription_id = seed_low_credit_pass(&mut db, 7, direction_id, at(2026, 8, 1, 10, 0));
    sync(&mut db, subscription_id, "Salsa", at(2026, 8, 30, 12, 0));

    let notifications = db.list_notifications(7).unwrap();
    assert_eq!(notifications.len(), 2);
    assert!(notifications[0].content.contains("EXPIRING_SOON"));
    assert!(notifications[1].content.contains("LOW_CREDIT"));
}

#[test]
fn test_mark_notification_read_missing_row() {
    let mut db = test_db();
    assert!(!db.mark_notification_read(999).unwrap());
}

#[test]
fn test_notifications_scoped_to_user() {
    let mut db = test_db();
    let direction_id = seed_direction(&mut db, "Salsa");
    let subscription_id = seed_subscription(&mut db, 7, direction_id, 8, at(2026, 6, 1, 10, 0));

    sync(&mut db, subscription_id, "Salsa", test_now());

    assert_eq!(db.list_notifications(7).unwrap().len(), 1);
    assert!(db.list_notifications(8).unwrap().is_empty());
}
