// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event definition registry
//!
//! The whole table sits behind one reader/writer lock. Lookups take the read
//! lock and hand out `Arc` handles, which stay valid after the lock is
//! released even if the entry is later replaced or removed.
//!
//! Mutations are serialized by a separate mutex. Validation and storage I/O
//! happen while holding only that mutex; the write lock is taken just long
//! enough to apply the change, and only after storage accepted it.

use crate::error::RegistryError;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard};
use vigil_adapters::{DefinitionNotification, Notifier};
use vigil_core::{
    is_group_code, is_valid_name, new_guid, DefinitionRequest, EventObject, FIRST_GROUP_CODE,
    FIRST_USER_EVENT_CODE, GROUP_FLAG,
};
use vigil_storage::EventStore;

/// Name reported for codes with no definition
pub const UNKNOWN_EVENT_NAME: &str = "UNKNOWN_EVENT";

type Table = BTreeMap<u32, Arc<EventObject>>;

/// Serialized before/after state of one mutation, for audit trails
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionChange {
    pub code: u32,
    /// `None` when the definition was created
    pub old: Option<serde_json::Value>,
    /// `Null` when the definition was deleted
    pub new: serde_json::Value,
}

pub struct EventRegistry<S, N> {
    table: RwLock<Table>,
    mutation: Mutex<()>,
    store: S,
    notifier: N,
}

impl<S, N> EventRegistry<S, N>
where
    S: EventStore,
    N: Notifier,
{
    /// Create an empty registry; call [`reload`](Self::reload) to populate it
    pub fn new(store: S, notifier: N) -> Self {
        Self {
            table: RwLock::new(Table::new()),
            mutation: Mutex::new(()),
            store,
            notifier,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Table> {
        self.table.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn find_by_code(&self, code: u32) -> Option<Arc<EventObject>> {
        self.read().get(&code).cloned()
    }

    /// First definition with exactly this name (case-sensitive)
    pub fn find_by_name(&self, name: &str) -> Option<Arc<EventObject>> {
        self.read().values().find(|o| o.name() == name).cloned()
    }

    /// Template (never a group) with this code
    pub fn find_template_by_code(&self, code: u32) -> Option<Arc<EventObject>> {
        self.find_by_code(code).filter(|o| !o.is_group())
    }

    /// Template (never a group) with this name
    pub fn find_template_by_name(&self, name: &str) -> Option<Arc<EventObject>> {
        self.read()
            .values()
            .find(|o| !o.is_group() && o.name() == name)
            .cloned()
    }

    pub fn event_code_from_name(&self, name: &str, default: u32) -> u32 {
        self.find_by_name(name).map(|o| o.code()).unwrap_or(default)
    }

    pub fn event_name_from_code(&self, code: u32) -> String {
        self.find_by_code(code)
            .map(|o| o.name().to_string())
            .unwrap_or_else(|| UNKNOWN_EVENT_NAME.to_string())
    }

    /// Snapshot of every definition, ordered by code
    pub fn definitions(&self) -> Vec<Arc<EventObject>> {
        self.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `code` is a member of `group`, directly or through nested groups
    pub fn is_member(&self, group: u32, code: u32) -> bool {
        let table = self.read();
        match table.get(&group).and_then(|o| o.as_group()) {
            Some(g) => g.members.iter().any(|&m| m == code || reaches(&table, m, code)),
            None => false,
        }
    }

    /// Replace the whole table with the contents of storage
    ///
    /// The new table is built off to the side and swapped in one step. On
    /// failure the current table is left untouched.
    pub fn reload(&self) -> Result<usize, RegistryError> {
        let _serial = self.mutation.lock().unwrap_or_else(|e| e.into_inner());

        let templates = self.store.load_all_templates()?;
        let groups = self.store.load_all_groups()?;

        let mut table = Table::new();
        for template in templates {
            if is_group_code(template.code) {
                tracing::warn!(code = template.code, "skipping template with group-range code");
                continue;
            }
            table.insert(template.code, Arc::new(template.into()));
        }
        for group in groups {
            if !is_group_code(group.code) {
                tracing::warn!(code = group.code, "skipping group with template-range code");
                continue;
            }
            table.insert(group.code, Arc::new(group.into()));
        }

        let count = table.len();
        *self.table.write().unwrap_or_else(|e| e.into_inner()) = table;
        tracing::info!(definitions = count, "event definitions loaded");
        Ok(count)
    }

    /// Create or modify a definition
    ///
    /// `request.code == 0` allocates a fresh code from the range matching
    /// `request.is_group` and a fresh GUID. Otherwise the definition must
    /// already exist and be of the same kind; its GUID is kept.
    pub fn upsert(&self, request: &DefinitionRequest) -> Result<DefinitionChange, RegistryError> {
        if !is_valid_name(&request.name) {
            return Err(RegistryError::InvalidName(request.name.clone()));
        }

        let _serial = self.mutation.lock().unwrap_or_else(|e| e.into_inner());

        let (object, old) = {
            let table = self.read();

            let (code, guid, old) = if request.code == 0 {
                (allocate_code(&table, request.is_group)?, new_guid(), None)
            } else {
                let existing = table
                    .get(&request.code)
                    .ok_or(RegistryError::InvalidCode(request.code))?;
                if existing.is_group() != request.is_group {
                    return Err(RegistryError::KindMismatch(request.code));
                }
                (request.code, existing.guid(), Some(existing.to_json()))
            };

            if table
                .values()
                .any(|o| o.code() != code && o.name() == request.name)
            {
                return Err(RegistryError::DuplicateName(request.name.clone()));
            }

            let mut object = request.build(code, guid);
            if let EventObject::Group(group) = &mut object {
                group.members = dedup_members(&group.members);
                check_acyclic(&table, code, &group.members)?;
            }
            (object, old)
        };

        match &object {
            EventObject::Template(t) => self.store.save_template(t)?,
            EventObject::Group(g) => self.store.save_group(g)?,
        }

        let code = object.code();
        let new = object.to_json();
        self.table
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(code, Arc::new(object));

        tracing::info!(code, name = %request.name, created = old.is_none(), "definition saved");
        self.notifier
            .definition_changed(DefinitionNotification::modified(code, new.clone()));

        Ok(DefinitionChange { code, old, new })
    }

    /// Remove a definition
    ///
    /// Deleting a group removes only its own record and membership list;
    /// other groups that list it as a member are left as they are.
    pub fn delete(&self, code: u32) -> Result<DefinitionChange, RegistryError> {
        let _serial = self.mutation.lock().unwrap_or_else(|e| e.into_inner());

        let old = self
            .find_by_code(code)
            .ok_or(RegistryError::InvalidCode(code))?
            .to_json();

        self.store.delete_event_definition(code)?;
        self.table
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&code);

        tracing::info!(code, "definition deleted");
        self.notifier
            .definition_changed(DefinitionNotification::deleted(code));

        Ok(DefinitionChange {
            code,
            old: Some(old),
            new: serde_json::Value::Null,
        })
    }
}

/// Next free code in the template or group range
fn allocate_code(table: &Table, group: bool) -> Result<u32, RegistryError> {
    let (floor, ceiling) = if group {
        (FIRST_GROUP_CODE, u32::MAX)
    } else {
        (FIRST_USER_EVENT_CODE, GROUP_FLAG - 1)
    };
    match table.range(floor..=ceiling).next_back() {
        None => Ok(floor),
        Some((&max, _)) if max < ceiling => Ok(max + 1),
        Some(_) => Err(RegistryError::InvalidCode(0)),
    }
}

/// Drop repeated member codes, keeping the first occurrence
fn dedup_members(members: &[u32]) -> Vec<u32> {
    let mut seen = HashSet::with_capacity(members.len());
    members.iter().copied().filter(|m| seen.insert(*m)).collect()
}

/// Reject a membership list for `group` that would let it contain itself
fn check_acyclic(table: &Table, group: u32, members: &[u32]) -> Result<(), RegistryError> {
    for &member in members {
        if member == group || (is_group_code(member) && reaches(table, member, group)) {
            return Err(RegistryError::CyclicMembership { group, member });
        }
    }
    Ok(())
}

/// Whether `target` is reachable from `start` through group membership
fn reaches(table: &Table, start: u32, target: u32) -> bool {
    let mut visited = HashSet::new();
    let mut stack = vec![start];
    while let Some(code) = stack.pop() {
        if !visited.insert(code) {
            continue;
        }
        let Some(group) = table.get(&code).and_then(|o| o.as_group()) else {
            continue;
        };
        for &member in &group.members {
            if member == target {
                return true;
            }
            if is_group_code(member) {
                stack.push(member);
            }
        }
    }
    false
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
