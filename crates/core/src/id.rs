// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier generation: event ids and definition GUIDs

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Monotonic 64-bit event id generator shared by every producer
///
/// Clones share the same counter.
#[derive(Clone, Debug)]
pub struct EventIdGen {
    counter: Arc<AtomicU64>,
}

impl EventIdGen {
    /// Create a generator whose first id is `first`
    pub fn starting_at(first: u64) -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(first.max(1))),
        }
    }

    /// Create a generator that continues after the highest id already issued
    pub fn after(last_issued: u64) -> Self {
        Self::starting_at(last_issued.saturating_add(1))
    }

    /// Allocate the next id
    pub fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst)
    }

    /// The id the next call to `next` will return
    pub fn peek(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

impl Default for EventIdGen {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

/// Generate a fresh GUID for a new event definition
pub fn new_guid() -> Uuid {
    Uuid::new_v4()
}
