// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod cascade_tests;
mod initialization_tests;
mod notification_tests;

use crate::{Persistence, PurchaseOutcome};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use studio_booking_domain::{IsoWeekday, LessonCount, SlotTemplate, expiry_for_purchase};

/// Thursday, 2026-08-27 12:00. Most tests pin the clock here.
pub fn test_now() -> NaiveDateTime {
    at(2026, 8, 27, 12, 0)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDateTime::new(date(y, m, d), time(h, min))
}

pub fn test_db() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn seed_direction(db: &mut Persistence, name: &str) -> i64 {
    db.create_direction(name).unwrap()
}

/// Creates a Monday 18:00 template and returns it with its generated ID.
pub fn seed_monday_template(
    db: &mut Persistence,
    instructor_id: i64,
    direction_id: i64,
) -> SlotTemplate {
    seed_template(db, instructor_id, direction_id, 1, time(18, 0))
}

pub fn seed_template(
    db: &mut Persistence,
    instructor_id: i64,
    direction_id: i64,
    weekday: u8,
    time_of_day: NaiveTime,
) -> SlotTemplate {
    let template = SlotTemplate::new(
        instructor_id,
        direction_id,
        IsoWeekday::new(weekday).unwrap(),
        time_of_day,
    );
    let template_id = db.create_template(&template).unwrap();
    db.get_template(template_id).unwrap().unwrap()
}

/// Purchases a pass at `purchased_at` and returns the subscription ID.
pub fn seed_subscription(
    db: &mut Persistence,
    user_id: i64,
    direction_id: i64,
    lessons: i64,
    purchased_at: NaiveDateTime,
) -> i64 {
    let lesson_count = LessonCount::new(lessons).unwrap();
    let expires_at = expiry_for_purchase(purchased_at).unwrap();
    match db
        .purchase_subscription(user_id, direction_id, lesson_count, expires_at, purchased_at)
        .unwrap()
    {
        PurchaseOutcome::Created(id) => id,
        PurchaseOutcome::DuplicateActive => panic!("unexpected duplicate active subscription"),
    }
}
