// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Status states and transition logic for bookings, subscriptions and
//! notifications.
//!
//! Booking records are never deleted; every lifecycle change is a status
//! transition. The admin reset (`completed`/`cancelled` back to `new`) is
//! permitted here and gated by role and past-lock rules at the operation
//! layer.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle states of a booking record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Booked and not yet held or cancelled.
    New,
    /// The class took place and the credit is consumed.
    Completed,
    /// Withdrawn before the class; the credit may have been refunded.
    Cancelled,
}

impl BookingStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBookingStatus` if the string is not a
    /// valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "new" => Ok(Self::New),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidBookingStatus(s.to_string())),
        }
    }

    /// Returns true if this status ends the normal lifecycle.
    ///
    /// Terminal states are only reachable again through the admin reset.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// `new → completed` and `new → cancelled` are the normal transitions.
    /// `completed → new` and `cancelled → new` are the admin reset; role and
    /// past-lock checks happen at the operation layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        let valid = match self {
            Self::New => matches!(new_status, Self::Completed | Self::Cancelled),
            Self::Completed | Self::Cancelled => matches!(new_status, Self::New),
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by booking lifecycle rules".to_string(),
            })
        }
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Cached validity projection of a subscription.
///
/// `active` means balance above zero and not past expiry; the flag is
/// recomputed from those facts on read and on mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
}

impl SubscriptionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(DomainError::InvalidSubscriptionStatus(s.to_string())),
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Read state of a notification row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    New,
    Read,
}

impl NotificationStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "new" => Ok(Self::New),
            "read" => Ok(Self::Read),
            _ => Err(DomainError::InvalidNotificationStatus(s.to_string())),
        }
    }
}

impl FromStr for NotificationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}
