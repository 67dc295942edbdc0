// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Direction and template management tests.

use super::{admin, instructor, seed_world, student, test_db, time};
use crate::{
    EngineError, create_direction, create_template, list_directions, list_templates_by_direction,
    list_templates_by_instructor,
};

#[test]
fn test_create_direction_requires_admin() {
    let mut db = test_db();
    let result = create_direction(&mut db, &student(7), "Salsa");
    assert!(matches!(result, Err(EngineError::Unauthorized { .. })));
    let result = create_direction(&mut db, &instructor(10), "Salsa");
    assert!(matches!(result, Err(EngineError::Unauthorized { .. })));
}

#[test]
fn test_duplicate_direction_name_conflicts() {
    let mut db = test_db();
    create_direction(&mut db, &admin(), "Salsa").unwrap();
    let result = create_direction(&mut db, &admin(), "Salsa");
    assert!(matches!(result, Err(EngineError::Conflict { .. })));
    assert_eq!(list_directions(&mut db).unwrap().len(), 1);
}

#[test]
fn test_create_template_rejects_bad_weekday() {
    let mut db = test_db();
    let direction_id = create_direction(&mut db, &admin(), "Salsa").unwrap();
    let result = create_template(&mut db, &admin(), 10, direction_id, 8, time(18, 0));
    assert!(matches!(
        result,
        Err(EngineError::Validation { ref field, .. }) if field == "weekday"
    ));
}

#[test]
fn test_create_template_unknown_direction() {
    let mut db = test_db();
    let result = create_template(&mut db, &admin(), 10, 999, 1, time(18, 0));
    assert!(matches!(result, Err(EngineError::NotFound { .. })));
}

#[test]
fn test_instructor_slot_clash_conflicts_across_directions() {
    let mut db = test_db();
    let (_, _) = seed_world(&mut db);
    let hip_hop = create_direction(&mut db, &admin(), "Hip-Hop").unwrap();

    // Instructor 10 already teaches Monday 18:00 Salsa
    let result = create_template(&mut db, &admin(), 10, hip_hop, 1, time(18, 0));
    assert!(matches!(result, Err(EngineError::Conflict { .. })));

    // A different instructor may take the slot
    create_template(&mut db, &admin(), 11, hip_hop, 1, time(18, 0)).unwrap();
}

#[test]
fn test_template_listings_filter() {
    let mut db = test_db();
    let (salsa, salsa_template) = seed_world(&mut db);
    let hip_hop = create_direction(&mut db, &admin(), "Hip-Hop").unwrap();
    let hip_hop_template =
        create_template(&mut db, &admin(), 11, hip_hop, 3, time(19, 0)).unwrap();

    let by_instructor = list_templates_by_instructor(&mut db, 10).unwrap();
    assert_eq!(by_instructor.len(), 1);
    assert_eq!(by_instructor[0].template_id, Some(salsa_template));

    let by_direction = list_templates_by_direction(&mut db, hip_hop).unwrap();
    assert_eq!(by_direction.len(), 1);
    assert_eq!(by_direction[0].template_id, Some(hip_hop_template));

    assert!(list_templates_by_direction(&mut db, salsa).unwrap().len() == 1);
}
