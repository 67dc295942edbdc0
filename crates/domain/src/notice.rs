// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Derivation of subscription notices.
//!
//! Notices are derived from a subscription snapshot at read time; the
//! persistence layer decides which of them become rows, using the content
//! prefix for deduplication:
//!
//! - `EXPIRED` is emitted at most once ever per subscription and
//!   supersedes any outstanding `LOW_CREDIT` / `EXPIRING_SOON` notices.
//! - `LOW_CREDIT` and `EXPIRING_SOON` are suppressed while an unread
//!   notice with the same prefix and keyword exists.

use crate::ledger::Subscription;
use crate::status::SubscriptionStatus;
use chrono::NaiveDateTime;

/// How close to the end date a pass starts warning, in whole days.
pub const EXPIRING_SOON_WINDOW_DAYS: i64 = 3;

/// Kinds of subscription notice, in order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The pass has run out of credits or passed its end date.
    Expired,
    /// Exactly one credit remains.
    LowCredit,
    /// The end date is at most three days away.
    ExpiringSoon,
}

impl NoticeKind {
    /// Keyword embedded in the notice content, used for deduplication.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Expired => "EXPIRED",
            Self::LowCredit => "LOW_CREDIT",
            Self::ExpiringSoon => "EXPIRING_SOON",
        }
    }
}

/// A derived notice ready to be persisted for the subscription's owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub content: String,
}

/// Shared content prefix for every notice about one subscription.
///
/// Deduplication matches on this prefix (plus the kind's keyword), so it
/// must be stable across reads.
#[must_use]
pub fn content_prefix(subscription_id: i64, direction_name: &str) -> String {
    format!("Subscription {subscription_id} on '{direction_name}'")
}

/// Derives the notices a subscription snapshot warrants as of `as_of`.
///
/// An unsaved subscription yields nothing. An expired or drained pass
/// yields only `Expired`; otherwise `LowCredit` and `ExpiringSoon` can
/// both apply.
#[must_use]
pub fn derive_notices(
    subscription: &Subscription,
    direction_name: &str,
    as_of: NaiveDateTime,
) -> Vec<Notice> {
    let Some(subscription_id) = subscription.subscription_id else {
        return Vec::new();
    };
    let prefix = content_prefix(subscription_id, direction_name);

    if subscription.effective_status(as_of) == SubscriptionStatus::Inactive {
        return vec![Notice {
            kind: NoticeKind::Expired,
            content: format!(
                "{prefix} EXPIRED: the pass has run out of lessons or passed its end date."
            ),
        }];
    }

    let mut notices = Vec::new();
    if subscription.credit_balance == 1 {
        notices.push(Notice {
            kind: NoticeKind::LowCredit,
            content: format!("{prefix} LOW_CREDIT: only one lesson remains."),
        });
    }
    let days_left = subscription.days_until_expiry(as_of);
    if (0..=EXPIRING_SOON_WINDOW_DAYS).contains(&days_left) {
        notices.push(Notice {
            kind: NoticeKind::ExpiringSoon,
            content: format!(
                "{prefix} EXPIRING_SOON: valid until {}.",
                subscription.expires_at.date().format("%Y-%m-%d")
            ),
        });
    }
    notices
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ledger::expiry_for_purchase;
    use chrono::{NaiveDate, NaiveTime};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDateTime::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        )
    }

    fn saved_subscription(balance: i64, purchased: NaiveDateTime) -> Subscription {
        let mut sub = Subscription::new(
            7,
            3,
            balance,
            purchased,
            expiry_for_purchase(purchased).unwrap(),
        );
        sub.subscription_id = Some(42);
        sub
    }

    #[test]
    fn test_unsaved_subscription_yields_nothing() {
        let purchased = at(2026, 8, 1);
        let sub = Subscription::new(7, 3, 0, purchased, expiry_for_purchase(purchased).unwrap());
        assert!(derive_notices(&sub, "Salsa", at(2026, 8, 20)).is_empty());
    }

    #[test]
    fn test_drained_pass_yields_only_expired() {
        let sub = saved_subscription(0, at(2026, 8, 1));
        let notices = derive_notices(&sub, "Salsa", at(2026, 8, 20));
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Expired);
        assert!(notices[0].content.starts_with("Subscription 42 on 'Salsa' EXPIRED"));
    }

    #[test]
    fn test_past_end_date_yields_expired_even_with_balance() {
        let sub = saved_subscription(5, at(2026, 8, 1));
        let notices = derive_notices(&sub, "Salsa", at(2026, 9, 10));
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Expired);
    }

    #[test]
    fn test_low_credit_and_expiring_soon_can_coexist() {
        let sub = saved_subscription(1, at(2026, 8, 1));
        // Two days before the end date
        let notices = derive_notices(&sub, "Salsa", at(2026, 8, 30));
        let kinds: Vec<NoticeKind> = notices.iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NoticeKind::LowCredit, NoticeKind::ExpiringSoon]);
    }

    #[test]
    fn test_healthy_pass_yields_nothing() {
        let sub = saved_subscription(8, at(2026, 8, 1));
        assert!(derive_notices(&sub, "Salsa", at(2026, 8, 10)).is_empty());
    }

    #[test]
    fn test_prefix_is_stable() {
        assert_eq!(
            content_prefix(42, "Hip-Hop"),
            "Subscription 42 on 'Hip-Hop'"
        );
    }
}
