// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event id allocation backed by a persisted high-water mark
//!
//! Ids are handed out from an in-memory counter, but no id is issued
//! before a block covering it has been recorded through the store. After a
//! restart the counter resumes past both the recorded mark and the event
//! log, so ids given to events that were never logged are not reused.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use vigil_core::EventIdGen;
use vigil_storage::{EventStore, StoreError};

/// Number of ids covered by one persisted reservation
pub const ID_RESERVE_BLOCK: u64 = 1000;

struct Reservation<S> {
    ids: EventIdGen,
    store: S,
    /// Highest id covered by a successful reservation
    limit: AtomicU64,
    refill: Mutex<()>,
}

/// Shared event id source; clones draw from the same counter
pub struct EventIds<S> {
    inner: Arc<Reservation<S>>,
}

impl<S> Clone for EventIds<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: EventStore> EventIds<S> {
    /// Wrap a generator; nothing past its last issued id is reserved yet
    pub fn new(ids: EventIdGen, store: S) -> Self {
        let limit = ids.peek().saturating_sub(1);
        Self {
            inner: Arc::new(Reservation {
                ids,
                store,
                limit: AtomicU64::new(limit),
                refill: Mutex::new(()),
            }),
        }
    }

    /// Continue after every id a previous run could have issued
    ///
    /// The first block is reserved up front so an unwritable store fails
    /// startup instead of the first post.
    pub fn resume(store: S) -> Result<Self, StoreError> {
        let last = store.max_event_id()?.max(store.event_id_high_water()?);
        let ids = Self::new(EventIdGen::after(last), store);
        ids.reserve_through(ids.peek())?;
        Ok(ids)
    }

    /// Allocate the next id
    ///
    /// A failed reservation is logged and retried on the next allocation;
    /// the id is still issued.
    pub fn next(&self) -> u64 {
        let id = self.inner.ids.next();
        if id > self.inner.limit.load(Ordering::SeqCst) {
            if let Err(e) = self.reserve_through(id) {
                tracing::warn!(event_id = id, error = %e, "failed to reserve event ids");
            }
        }
        id
    }

    /// The id the next call to `next` will return
    pub fn peek(&self) -> u64 {
        self.inner.ids.peek()
    }

    /// Highest id covered by a recorded reservation
    pub fn reserved_through(&self) -> u64 {
        self.inner.limit.load(Ordering::SeqCst)
    }

    fn reserve_through(&self, id: u64) -> Result<(), StoreError> {
        let _serial = self.inner.refill.lock().unwrap_or_else(|e| e.into_inner());
        if id <= self.inner.limit.load(Ordering::SeqCst) {
            return Ok(());
        }
        let mark = id.saturating_add(ID_RESERVE_BLOCK - 1);
        self.inner.store.save_event_id_high_water(mark)?;
        self.inner.limit.store(mark, Ordering::SeqCst);
        tracing::debug!(through = mark, "reserved event ids");
        Ok(())
    }
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
