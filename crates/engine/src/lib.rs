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
    clippy::all
)]

//! Operation surface for the studio booking system.
//!
//! This crate orchestrates domain rules and persistence transactions
//! into the operations an outer transport layer exposes: slot template
//! management, weekly schedule resolution, the booking lifecycle, the
//! lesson-credit ledger, and cascade deletion. It owns the error
//! taxonomy and the actor authorization checks; all storage work is
//! delegated to `studio-booking-persistence`.

mod booking;
mod cascade;
mod error;
mod ledger;
mod notifier;
mod schedule;
mod templates;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use booking::{auto_complete_past, book, cancel, mark_completed, reset_to_new};
pub use cascade::{TEMPLATE_CANCELLED_NOTICE, delete_template, set_occurrence_status};
pub use error::EngineError;
pub use ledger::{list_notifications, list_subscriptions, mark_notification_read, purchase};
pub use notifier::{Notifier, NullNotifier};
pub use schedule::{
    DayInfo, InstructorDayInfo, SlotView, resolve_week, resolve_week_for_instructor,
};
pub use templates::{
    create_direction, create_template, list_directions, list_templates_by_direction,
    list_templates_by_instructor,
};

/// Actor roles for authorization.
///
/// Roles determine what actions an actor may perform on bookings,
/// templates, and occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Students book classes for themselves, cancel their own bookings,
    /// and buy passes.
    Student,
    /// Instructors additionally mark lessons completed and change the
    /// status of whole occurrences.
    Instructor,
    /// Admins hold structural and corrective authority: template
    /// creation and deletion, and resetting terminal bookings.
    Admin,
}

impl Role {
    /// The lowercase name used in log lines.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Instructor => "instructor",
            Self::Admin => "admin",
        }
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// The user ID this actor acts as.
    pub id: i64,
    /// The role assigned to this actor.
    pub role: Role,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub const fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }
}

/// Authorization checks for role-gated operations.
///
/// Ownership checks (a student cancelling their own booking) live with
/// the operations themselves; this service covers the pure role gates.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the actor may create or delete slot templates and
    /// directions. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_templates(actor: &Actor) -> Result<(), EngineError> {
        Self::require_admin(actor, "manage_templates")
    }

    /// Checks that the actor may reset a terminal booking back to open.
    /// Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_reset_booking(actor: &Actor) -> Result<(), EngineError> {
        Self::require_admin(actor, "reset_booking")
    }

    /// Checks that the actor may mark lessons completed. Instructor or
    /// Admin.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has the Student role.
    pub fn authorize_mark_completed(actor: &Actor) -> Result<(), EngineError> {
        Self::require_staff(actor, "mark_completed")
    }

    /// Checks that the actor may change a whole occurrence's status.
    /// Instructor or Admin.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has the Student role.
    pub fn authorize_set_occurrence_status(actor: &Actor) -> Result<(), EngineError> {
        Self::require_staff(actor, "set_occurrence_status")
    }

    fn require_admin(actor: &Actor, action: &str) -> Result<(), EngineError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Student | Role::Instructor => Err(EngineError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("Admin"),
            }),
        }
    }

    fn require_staff(actor: &Actor, action: &str) -> Result<(), EngineError> {
        match actor.role {
            Role::Instructor | Role::Admin => Ok(()),
            Role::Student => Err(EngineError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("Instructor"),
            }),
        }
    }
}
