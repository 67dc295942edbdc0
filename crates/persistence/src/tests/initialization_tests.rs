// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Connection establishment, migrations and foreign key enforcement are
//! exercised implicitly by every test that calls
//! `Persistence::new_in_memory()`; these cover the explicit surface.

use super::seed_direction;
use crate::Persistence;

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, crate::error::PersistenceError> =
        Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_key_enforcement_is_active() {
    let mut db = Persistence::new_in_memory().unwrap();
    assert!(db.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = Persistence::new_in_memory().unwrap();
    let mut db2 = Persistence::new_in_memory().unwrap();

    seed_direction(&mut db1, "Salsa");

    assert_eq!(db1.list_directions().unwrap().len(), 1);
    assert!(db2.list_directions().unwrap().is_empty());
}
