// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod clock;
mod error;
mod ledger;
mod notice;
mod schedule;
mod status;
mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::DomainError;
pub use ledger::{RefundDecision, Subscription, expiry_for_purchase, is_expired};
pub use notice::{
    EXPIRING_SOON_WINDOW_DAYS, Notice, NoticeKind, content_prefix, derive_notices,
};
pub use schedule::{
    aggregate_display_status, expand_week, is_past, monday_of_week, occurrence_date, week_dates,
};
pub use status::{BookingStatus, NotificationStatus, SubscriptionStatus};

// Re-export public types
pub use types::{
    BookingRecord, Direction, IsoWeekday, LessonCount, Notification, Occurrence, SlotTemplate,
};
