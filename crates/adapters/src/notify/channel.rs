// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel-based notification fan-out

use super::{DefinitionNotification, Notifier};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

/// Broadcasts every change to all live subscribers
///
/// Subscribers whose receiver has been dropped are pruned on the next send.
#[derive(Clone, Default)]
pub struct ChannelNotifier {
    subscribers: Arc<RwLock<Vec<mpsc::UnboundedSender<DefinitionNotification>>>>,
}

impl ChannelNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<DefinitionNotification> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl Notifier for ChannelNotifier {
    fn definition_changed(&self, notification: DefinitionNotification) {
        let mut subscribers = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subscribers.retain(|tx| tx.send(notification.clone()).is_ok());
        tracing::debug!(
            code = notification.code,
            kind = ?notification.kind,
            subscribers = subscribers.len(),
            "definition change broadcast"
        );
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
