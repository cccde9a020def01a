// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake policy evaluator for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{PolicyError, PolicyEvaluator};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use vigil_core::Event;

/// Fake policy evaluator that records every event it is handed
#[derive(Clone, Default)]
pub struct FakePolicy {
    events: Arc<Mutex<Vec<Event>>>,
    failing: Arc<AtomicBool>,
}

impl FakePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events evaluated so far, in hand-off order
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make subsequent evaluations fail (the event is still recorded)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl PolicyEvaluator for FakePolicy {
    fn evaluate(&self, event: &Event) -> Result<(), PolicyError> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
        if self.failing.load(Ordering::SeqCst) {
            return Err(PolicyError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
