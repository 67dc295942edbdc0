// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Injectable wall-clock time source.
//!
//! All time-dependent rules (past detection, expiry, the auto-complete
//! sweep) take the current instant from a `Clock` so they can be exercised
//! deterministically in tests.

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Source of the current wall-clock instant.
pub trait Clock: Send + Sync {
    /// Returns the current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Returns the current local calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Production clock backed by the system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Test clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: NaiveDateTime,
}

impl FixedClock {
    /// Creates a clock that always reports the given instant.
    #[must_use]
    pub const fn new(instant: NaiveDateTime) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.instant
    }
}
