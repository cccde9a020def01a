// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory store
//!
//! Holds everything behind one mutex, so every call is trivially atomic.
//! Failure injection makes every subsequent call report the store as
//! unavailable, which is how persistence failures are exercised in tests.

use crate::store::{EventStore, StoreError};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use vigil_core::{Event, EventGroup, EventTemplate};

#[derive(Debug, Default)]
struct Tables {
    templates: BTreeMap<u32, EventTemplate>,
    groups: BTreeMap<u32, EventGroup>,
    log: Vec<Event>,
    id_high_water: u64,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    failing: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with definitions
    pub fn with_definitions(
        templates: impl IntoIterator<Item = EventTemplate>,
        groups: impl IntoIterator<Item = EventGroup>,
    ) -> Self {
        let store = Self::new();
        {
            let mut tables = store.lock();
            tables.templates.extend(templates.into_iter().map(|t| (t.code, t)));
            tables.groups.extend(groups.into_iter().map(|g| (g.code, g)));
        }
        store
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Events appended to the log so far
    pub fn logged_events(&self) -> Vec<Event> {
        self.lock().log.clone()
    }

    pub fn template(&self, code: u32) -> Option<EventTemplate> {
        self.lock().templates.get(&code).cloned()
    }

    pub fn group(&self, code: u32) -> Option<EventGroup> {
        self.lock().groups.get(&code).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

impl EventStore for MemoryStore {
    fn load_all_templates(&self) -> Result<Vec<EventTemplate>, StoreError> {
        self.check()?;
        Ok(self.lock().templates.values().cloned().collect())
    }

    fn load_all_groups(&self) -> Result<Vec<EventGroup>, StoreError> {
        self.check()?;
        Ok(self.lock().groups.values().cloned().collect())
    }

    fn save_template(&self, template: &EventTemplate) -> Result<(), StoreError> {
        self.check()?;
        self.lock().templates.insert(template.code, template.clone());
        Ok(())
    }

    fn save_group(&self, group: &EventGroup) -> Result<(), StoreError> {
        self.check()?;
        self.lock().groups.insert(group.code, group.clone());
        Ok(())
    }

    fn delete_event_definition(&self, code: u32) -> Result<(), StoreError> {
        self.check()?;
        let mut tables = self.lock();
        tables.templates.remove(&code);
        tables.groups.remove(&code);
        Ok(())
    }

    fn append_event_log_record(&self, event: &Event) -> Result<(), StoreError> {
        self.check()?;
        self.lock().log.push(event.clone());
        Ok(())
    }

    fn max_event_id(&self) -> Result<u64, StoreError> {
        self.check()?;
        Ok(self.lock().log.iter().map(Event::id).max().unwrap_or(0))
    }

    fn event_id_high_water(&self) -> Result<u64, StoreError> {
        self.check()?;
        Ok(self.lock().id_high_water)
    }

    fn save_event_id_high_water(&self, id: u64) -> Result<(), StoreError> {
        self.check()?;
        self.lock().id_high_water = id;
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
