// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake notifier for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{DefinitionNotification, Notifier};
use std::sync::{Arc, Mutex};

/// Fake notifier that records every notification
#[derive(Clone, Default)]
pub struct FakeNotifier {
    calls: Arc<Mutex<Vec<DefinitionNotification>>>,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded notifications
    pub fn calls(&self) -> Vec<DefinitionNotification> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Notifier for FakeNotifier {
    fn definition_changed(&self, notification: DefinitionNotification) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
