// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Definition change notification adapters

mod channel;
mod noop;

pub use channel::ChannelNotifier;
pub use noop::NoOpNotifier;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotifier;

use serde::{Deserialize, Serialize};

/// What happened to a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Created or modified
    Modified,
    Deleted,
}

/// Payload delivered to interested sessions when a definition changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionNotification {
    pub kind: ChangeKind,
    pub code: u32,
    /// Serialized definition; `null` for deletions
    pub definition: serde_json::Value,
}

impl DefinitionNotification {
    pub fn modified(code: u32, definition: serde_json::Value) -> Self {
        Self {
            kind: ChangeKind::Modified,
            code,
            definition,
        }
    }

    pub fn deleted(code: u32) -> Self {
        Self {
            kind: ChangeKind::Deleted,
            code,
            definition: serde_json::Value::Null,
        }
    }
}

/// Fan-out of definition changes to external sessions
///
/// Delivery is best effort and must not block the caller.
pub trait Notifier: Clone + Send + Sync + 'static {
    fn definition_changed(&self, notification: DefinitionNotification);
}
