// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vigil_core::ObjectClass;

#[test]
fn clones_share_objects() {
    let directory = TableDirectory::new();
    let other = directory.clone();

    directory.insert(SourceObject::new(55, "router-1", ObjectClass::Node).with_zone(4));

    let found = other.find_object(55).unwrap();
    assert_eq!(found.name, "router-1");
    assert_eq!(found.zone(), 4);
    assert!(other.find_object(56).is_none());
}

#[test]
fn insert_replaces_and_remove_forgets() {
    let directory = TableDirectory::from_objects([SourceObject::new(1, "old", ObjectClass::Node)]);
    directory.insert(SourceObject::new(1, "new", ObjectClass::Node));
    assert_eq!(directory.len(), 1);
    assert_eq!(directory.find_object(1).unwrap().name, "new");

    assert!(directory.remove(1).is_some());
    assert!(directory.is_empty());
}
