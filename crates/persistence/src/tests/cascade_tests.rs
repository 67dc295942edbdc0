// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Template cascade deletion tests.

use super::{at, date, seed_direction, seed_monday_template, seed_subscription, test_db, test_now};
use crate::BookOutcome;
use crate::error::PersistenceError;
use studio_booking_domain::{BookingStatus, NotificationStatus};

const CASCADE_NOTICE: &str =
    "An administrator cancelled a scheduled class you were booked for.";

#[test]
fn test_cascade_cancels_open_bookings_and_refunds() {
    let mut db = test_db();
    let direction_id = seed_direction(&mut db, "Salsa");
    let template = seed_monday_template(&mut db, 10, direction_id);
    let template_id = template.template_id.unwrap();

    let sub_a = seed_subscription(&mut db, 7, direction_id, 8, test_now());
    let sub_b = seed_subscription(&mut db, 8, direction_id, 4, at(2026, 8, 20, 12, 0));

    // User 7: one open future booking. User 8: one open on a past date
    // (booked before the sweep ever ran) and one open future booking.
    let monday_past = date(2026, 8, 24);
    let monday_next = date(2026, 8, 31);
    let monday_later = date(2026, 9, 7);
    assert!(matches!(
        db.book(7, &template, monday_next, test_now()).unwrap(),
        BookOutcome::Booked { .. }
    ));
    assert!(matches!(
        db.book(8, &template, monday_past, at(2026, 8, 20, 12, 0)).unwrap(),
        BookOutcome::Booked { .. }
    ));
    assert!(matches!(
        db.book(8, &template, monday_later, test_now()).unwrap(),
        BookOutcome::Booked { .. }
    ));

    let cancelled = db
        .delete_template_cascade(template_id, CASCADE_NOTICE, test_now())
        .unwrap();

    assert_eq!(cancelled.len(), 3);
    assert!(cancelled.iter().all(|c| c.refunded));
    assert_eq!(db.get_template(template_id).unwrap(), None);
    assert_eq!(
        db.get_subscription(sub_a).unwrap().unwrap().credit_balance,
        8
    );
    assert_eq!(
        db.get_subscription(sub_b).unwrap().unwrap().credit_balance,
        4
    );

    for booking in db.list_bookings_for_user(8).unwrap() {
        assert_eq!(booking.status, BookingStatus::Cancelled);
    }
}

#[test]
fn test_cascade_notifies_each_affected_booking() {
    let mut db = test_db();
    let direction_id = seed_direction(&mut db, "Salsa");
    let template = seed_monday_template(&mut db, 10, direction_id);

    seed_subscription(&mut db, 7, direction_id, 8, test_now());
    seed_subscription(&mut db, 8, direction_id, 4, test_now());
    db.book(7, &template, date(2026, 8, 31), test_now()).unwrap();
    db.book(8, &template, date(2026, 8, 31), test_now()).unwrap();
    db.book(8, &template, date(2026, 9, 7), test_now()).unwrap();

    db.delete_template_cascade(template.template_id.unwrap(), CASCADE_NOTICE, test_now())
        .unwrap();

    let for_7 = db.list_notifications(7).unwrap();
    assert_eq!(for_7.len(), 1);
    assert_eq!(for_7[0].content, CASCADE_NOTICE);
    assert_eq!(for_7[0].status, NotificationStatus::New);

    // One notification per cancelled booking, not per user
    assert_eq!(db.list_notifications(8).unwrap().len(), 2);
}

#[test]
fn test_cascade_leaves_terminal_records_untouched() {
    let mut db = test_db();
    let direction_id = seed_direction(&mut db, "Salsa");
    let template = seed_monday_template(&mut db, 10, direction_id);
    let sub = seed_subscription(&mut db, 7, direction_id, 8, test_now());

    let booking_id = match db.book(7, &template, date(2026, 8, 31), test_now()).unwrap() {
        BookOutcome::Booked { booking_id, .. } => booking_id,
        other => panic!("unexpected outcome {other:?}"),
    };
    db.complete_booking(booking_id, test_now()).unwrap();

    let cancelled = db
        .delete_template_cascade(template.template_id.unwrap(), CASCADE_NOTICE, test_now())
        .unwrap();

    assert!(cancelled.is_empty());
    assert!(db.list_notifications(7).unwrap().is_empty());
    // Completed record survives the template deletion unchanged
    let booking = db.get_booking(booking_id).unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Completed);
    // No refund for the completed lesson
    assert_eq!(db.get_subscription(sub).unwrap().unwrap().credit_balance, 7);
}

#[test]
fn test_cascade_forfeits_credit_of_expired_pass() {
    let mut db = test_db();
    let direction_id = seed_direction(&mut db, "Salsa");
    let template = seed_monday_template(&mut db, 10, direction_id);
    // Expires 2026-09-01
    let sub = seed_subscription(&mut db, 7, direction_id, 4, at(2026, 8, 1, 10, 0));
    db.book(7, &template, date(2026, 8, 3), at(2026, 8, 1, 10, 0))
        .unwrap();

    let cancelled = db
        .delete_template_cascade(
            template.template_id.unwrap(),
            CASCADE_NOTICE,
            at(2026, 9, 10, 12, 0),
        )
        .unwrap();

    assert_eq!(cancelled.len(), 1);
    assert!(!cancelled[0].refunded);
    assert_eq!(db.get_subscription(sub).unwrap().unwrap().credit_balance, 3);
    // The cancellation notice is still delivered
    assert_eq!(db.list_notifications(7).unwrap().len(), 1);
}

#[test]
fn test_cascade_missing_template_not_found() {
    let mut db = test_db();
    let result = db.delete_template_cascade(999, CASCADE_NOTICE, test_now());
    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_cascade_scoped_to_one_template() {
    let mut db = test_db();
    let direction_id = seed_direction(&mut db, "Salsa");
    let doomed = seed_monday_template(&mut db, 10, direction_id);
    let survivor = super::seed_template(&mut db, 11, direction_id, 3, super::time(19, 0));

    seed_subscription(&mut db, 7, direction_id, 8, test_now());
    db.book(7, &doomed, date(2026, 8, 31), test_now()).unwrap();
    db.book(7, &survivor, date(2026, 9, 2), test_now()).unwrap();

    db.delete_template_cascade(doomed.template_id.unwrap(), CASCADE_NOTICE, test_now())
        .unwrap();

    assert!(db.get_template(survivor.template_id.unwrap()).unwrap().is_some());
    let bookings = db.list_bookings_for_user(7).unwrap();
    let open: Vec<_> = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::New)
        .collect();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].template_id, survivor.template_id.unwrap());
}
