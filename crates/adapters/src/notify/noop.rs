// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notifier with no subscribers.

use super::{DefinitionNotification, Notifier};

/// Notification adapter that drops every change.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpNotifier;

impl NoOpNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for NoOpNotifier {
    fn definition_changed(&self, _notification: DefinitionNotification) {}
}
