// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory object table

use super::ObjectDirectory;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use vigil_core::SourceObject;

/// Directory backed by a shared in-memory table
///
/// Clones share the table, so objects registered through one handle are
/// visible through every other.
#[derive(Clone, Debug, Default)]
pub struct TableDirectory {
    objects: Arc<RwLock<HashMap<u32, SourceObject>>>,
}

impl TableDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory preloaded with `objects`
    pub fn from_objects(objects: impl IntoIterator<Item = SourceObject>) -> Self {
        let directory = Self::new();
        for object in objects {
            directory.insert(object);
        }
        directory
    }

    /// Add or replace an object
    pub fn insert(&self, object: SourceObject) {
        self.objects
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(object.id, object);
    }

    pub fn remove(&self, id: u32) -> Option<SourceObject> {
        self.objects
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectDirectory for TableDirectory {
    fn find_object(&self, id: u32) -> Option<SourceObject> {
        self.objects
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
