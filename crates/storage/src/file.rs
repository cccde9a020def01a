// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file-based store
//!
//! Layout under the base directory:
//!
//! ```text
//! templates/<code>.json   one template per file
//! groups/<code>.json      one group per file, members included
//! events.log              append-only event log
//! event_id.json           highest reserved event id
//! ```
//!
//! Definition files are written to a temporary sibling and renamed into
//! place, so a group's membership list is always replaced as a whole.

use crate::event_log::EventLog;
use crate::store::{EventStore, StoreError};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use vigil_core::{Event, EventGroup, EventTemplate};

const TEMPLATES: &str = "templates";
const GROUPS: &str = "groups";
const EVENT_LOG: &str = "events.log";
const EVENT_ID: &str = "event_id.json";

#[derive(Clone)]
pub struct FileStore {
    base_path: PathBuf,
    log: Arc<Mutex<EventLog>>,
}

impl FileStore {
    /// Open a store at the given path, creating it if needed
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_path = base_path.into();
        fs::create_dir_all(base_path.join(TEMPLATES))?;
        fs::create_dir_all(base_path.join(GROUPS))?;
        let log = EventLog::open(&base_path.join(EVENT_LOG))?;
        tracing::debug!(path = %base_path.display(), "opened file store");
        Ok(Self {
            base_path,
            log: Arc::new(Mutex::new(log)),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn event_log_path(&self) -> PathBuf {
        self.base_path.join(EVENT_LOG)
    }

    fn path_for(&self, kind: &str, code: u32) -> PathBuf {
        self.base_path.join(kind).join(format!("{}.json", code))
    }

    fn save<T: Serialize>(&self, kind: &str, code: u32, data: &T) -> Result<(), StoreError> {
        Self::write_atomic(&self.path_for(kind, code), data)
    }

    fn write_atomic<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn load_all<T: DeserializeOwned>(&self, kind: &str) -> Result<Vec<T>, StoreError> {
        let dir = self.base_path.join(kind);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                paths.push(path);
            }
        }
        paths.sort();

        paths
            .iter()
            .map(|path| {
                let json = fs::read_to_string(path)?;
                serde_json::from_str(&json).map_err(|e| StoreError::Corrupt {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    fn remove_if_exists(path: &Path) -> Result<(), StoreError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl EventStore for FileStore {
    fn load_all_templates(&self) -> Result<Vec<EventTemplate>, StoreError> {
        self.load_all(TEMPLATES)
    }

    fn load_all_groups(&self) -> Result<Vec<EventGroup>, StoreError> {
        self.load_all(GROUPS)
    }

    fn save_template(&self, template: &EventTemplate) -> Result<(), StoreError> {
        self.save(TEMPLATES, template.code, template)
    }

    fn save_group(&self, group: &EventGroup) -> Result<(), StoreError> {
        self.save(GROUPS, group.code, group)
    }

    fn delete_event_definition(&self, code: u32) -> Result<(), StoreError> {
        let kind = if vigil_core::is_group_code(code) {
            GROUPS
        } else {
            TEMPLATES
        };
        Self::remove_if_exists(&self.path_for(kind, code))
    }

    fn append_event_log_record(&self, event: &Event) -> Result<(), StoreError> {
        self.log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .append(event)?;
        Ok(())
    }

    fn max_event_id(&self) -> Result<u64, StoreError> {
        Ok(self
            .log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .max_event_id())
    }

    fn event_id_high_water(&self) -> Result<u64, StoreError> {
        let path = self.base_path.join(EVENT_ID);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&json).map_err(|e| StoreError::Corrupt {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn save_event_id_high_water(&self, id: u64) -> Result<(), StoreError> {
        Self::write_atomic(&self.base_path.join(EVENT_ID), &id)
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
