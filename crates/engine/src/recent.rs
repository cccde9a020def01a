// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-source "last N events" bookkeeping

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use vigil_core::Event;

/// Bounded history of processed events, keyed by source object
///
/// Clones share the same history. A capacity of 0 disables recording.
#[derive(Clone, Debug)]
pub struct RecentEvents {
    per_source: usize,
    by_source: Arc<Mutex<HashMap<u32, VecDeque<Event>>>>,
}

impl RecentEvents {
    pub fn new(per_source: usize) -> Self {
        Self {
            per_source,
            by_source: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn record(&self, event: &Event) {
        if self.per_source == 0 {
            return;
        }
        let mut by_source = self.by_source.lock().unwrap_or_else(|e| e.into_inner());
        let ring = by_source.entry(event.source_id()).or_default();
        if ring.len() == self.per_source {
            ring.pop_front();
        }
        ring.push_back(event.clone());
    }

    /// Remembered events for a source, oldest first
    pub fn for_source(&self, source_id: u32) -> Vec<Event> {
        self.by_source
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&source_id)
            .map(|ring| ring.iter().cloned().collect())
            .unwrap_or_default()
    }
}
