// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::directory::ObjectDirectory;
use crate::notify::{DefinitionNotification, Notifier};
use crate::policy::{PolicyError, PolicyEvaluator};
use vigil_core::{Event, SourceObject};

/// Wrapper that adds tracing to any PolicyEvaluator
#[derive(Clone)]
pub struct TracedPolicy<P> {
    inner: P,
}

impl<P> TracedPolicy<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: PolicyEvaluator> PolicyEvaluator for TracedPolicy<P> {
    fn evaluate(&self, event: &Event) -> Result<(), PolicyError> {
        let span = tracing::debug_span!(
            "policy.evaluate",
            event_id = event.id(),
            code = event.code()
        );
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.evaluate(event);
        let elapsed = start.elapsed();

        match &result {
            Ok(()) => tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "evaluated"),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "evaluation failed"
            ),
        }

        result
    }
}

/// Wrapper that adds tracing to any Notifier
#[derive(Clone)]
pub struct TracedNotifier<N> {
    inner: N,
}

impl<N> TracedNotifier<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }
}

impl<N: Notifier> Notifier for TracedNotifier<N> {
    fn definition_changed(&self, notification: DefinitionNotification) {
        let span = tracing::info_span!(
            "notify.definition_changed",
            code = notification.code,
            kind = ?notification.kind
        );
        let _guard = span.enter();

        tracing::info!("notifying sessions");
        self.inner.definition_changed(notification);
    }
}

/// Wrapper that adds tracing to any ObjectDirectory
#[derive(Clone)]
pub struct TracedDirectory<D> {
    inner: D,
}

impl<D> TracedDirectory<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }
}

impl<D: ObjectDirectory> ObjectDirectory for TracedDirectory<D> {
    fn find_object(&self, id: u32) -> Option<SourceObject> {
        let result = self.inner.find_object(id);
        tracing::trace!(id, found = result.is_some(), "object lookup");
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
