// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence contract consumed by the registry and the processor

use std::io;
use thiserror::Error;
use vigil_core::{Event, EventGroup, EventTemplate};

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt record in {path}: {reason}")]
    Corrupt { path: String, reason: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Narrow read/write contract over durable event storage
///
/// `save_group` replaces the group's whole membership list atomically.
pub trait EventStore: Clone + Send + Sync + 'static {
    fn load_all_templates(&self) -> Result<Vec<EventTemplate>, StoreError>;

    /// Every group with its ordered member codes
    fn load_all_groups(&self) -> Result<Vec<EventGroup>, StoreError>;

    fn save_template(&self, template: &EventTemplate) -> Result<(), StoreError>;

    fn save_group(&self, group: &EventGroup) -> Result<(), StoreError>;

    /// Remove a template, or a group together with its own membership rows
    fn delete_event_definition(&self, code: u32) -> Result<(), StoreError>;

    fn append_event_log_record(&self, event: &Event) -> Result<(), StoreError>;

    /// Highest event id ever logged, 0 when the log is empty
    fn max_event_id(&self) -> Result<u64, StoreError>;

    /// Highest event id covered by a reservation, 0 when none was made
    fn event_id_high_water(&self) -> Result<u64, StoreError>;

    /// Durably record that ids up to and including `id` may have been issued
    fn save_event_id_high_water(&self, id: u64) -> Result<(), StoreError>;
}
