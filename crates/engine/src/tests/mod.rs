// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used)]

mod ledger_tests;
mod template_tests;

use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use studio_booking_domain::{FixedClock, Occurrence};
use studio_booking_persistence::Persistence;

use crate::notifier::Notifier;
use crate::{Actor, Role};

/// Thursday, 2026-08-27 12:00. Most tests pin the clock here.
pub fn test_now() -> NaiveDateTime {
    at(2026, 8, 27, 12, 0)
}

pub fn clock() -> FixedClock {
    FixedClock::new(test_now())
}

pub fn clock_at(y: i32, m: u32, d: u32, h: u32, min: u32) -> FixedClock {
    FixedClock::new(at(y, m, d, h, min))
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

pub const fn admin() -> Actor {
    Actor::new(1, Role::Admin)
}

pub const fn instructor(id: i64) -> Actor {
    Actor::new(id, Role::Instructor)
}

pub const fn student(id: i64) -> Actor {
    Actor::new(id, Role::Student)
}

/// Records every confirmation instead of delivering it.
#[derive(Default)]
pub struct RecordingNotifier {
    pub confirmations: Mutex<Vec<(i64, Occurrence)>>,
}

impl Notifier for RecordingNotifier {
    fn booking_confirmed(&self, user_id: i64, occurrence: &Occurrence) {
        self.confirmations
            .lock()
            .unwrap()
            .push((user_id, occurrence.clone()));
    }
}

/// Creates the "Salsa" direction and a Monday 18:00 template taught by
/// instructor 10. Returns `(direction_id, template_id)`.
pub fn seed_world(db: &mut Persistence) -> (i64, i64) {
    let direction_id = crate::create_direction(db, &admin(), "Salsa").unwrap();
    let template_id =
        crate::create_template(db, &admin(), 10, direction_id, 1, time(18, 0)).unwrap();
    (direction_id, template_id)
}

/// Buys `lessons` for the user on the direction at the given instant.
pub fn buy(
    db: &mut Persistence,
    user_id: i64,
    direction_id: i64,
    lessons: i64,
    purchased_at: NaiveDateTime,
) -> i64 {
    crate::purchase(
        db,
        &FixedClock::new(purchased_at),
        &student(user_id),
        direction_id,
        lessons,
    )
    .unwrap()
}
