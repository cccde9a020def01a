// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-threaded event consumer
//!
//! Exactly one processor drains the primary queue, which is what makes
//! delivery order global FIFO. For each event it expands the message,
//! records it in the per-source history, hands it to policy evaluation and,
//! for templates flagged `LOG`, appends it to the event log. A log append
//! failure is reported but never holds back the next event.

use crate::recent::RecentEvents;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use vigil_adapters::{ObjectDirectory, PolicyEvaluator};
use vigil_core::{Dequeued, Event, EventFlags, EventQueue, SourceObject, NO_OBJECT};
use vigil_storage::EventStore;

/// Counters shared between the processor thread and observers
#[derive(Debug, Default)]
pub struct ProcessorStats {
    processed: AtomicU64,
    log_failures: AtomicU64,
    policy_failures: AtomicU64,
}

impl ProcessorStats {
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    pub fn log_failures(&self) -> u64 {
        self.log_failures.load(Ordering::Relaxed)
    }

    pub fn policy_failures(&self) -> u64 {
        self.policy_failures.load(Ordering::Relaxed)
    }
}

pub struct EventProcessor<S, P, D> {
    queue: Arc<EventQueue<Event>>,
    store: S,
    policy: P,
    directory: D,
    recent: RecentEvents,
    stats: Arc<ProcessorStats>,
    wait: Duration,
    management_node_id: u32,
}

impl<S, P, D> EventProcessor<S, P, D>
where
    S: EventStore,
    P: PolicyEvaluator,
    D: ObjectDirectory,
{
    pub fn new(
        queue: Arc<EventQueue<Event>>,
        store: S,
        policy: P,
        directory: D,
        recent: RecentEvents,
    ) -> Self {
        Self {
            queue,
            store,
            policy,
            directory,
            recent,
            stats: Arc::new(ProcessorStats::default()),
            wait: Duration::from_secs(1),
            management_node_id: NO_OBJECT,
        }
    }

    /// How long to block on an empty queue between checks
    pub fn with_wait(self, wait: Duration) -> Self {
        Self { wait, ..self }
    }

    /// Object to expand against when the event source is unknown
    pub fn with_management_node(self, management_node_id: u32) -> Self {
        Self {
            management_node_id,
            ..self
        }
    }

    pub fn stats(&self) -> Arc<ProcessorStats> {
        Arc::clone(&self.stats)
    }

    /// Run the consumer loop on a dedicated thread
    pub fn spawn(self) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("event-processor".to_string())
            .spawn(move || self.run())
    }

    /// Consume until the queue enters shutdown mode
    pub fn run(self) {
        tracing::info!("event processor started");
        loop {
            match self.queue.get_or_block(Some(self.wait)) {
                Dequeued::Item(event) => {
                    self.process(event);
                }
                Dequeued::Empty => continue,
                Dequeued::Shutdown => break,
            }
        }
        tracing::info!(processed = self.stats.processed(), "event processor stopped");
    }

    fn resolve_source(&self, source_id: u32) -> Option<SourceObject> {
        self.directory.find_object(source_id).or_else(|| {
            if self.management_node_id == NO_OBJECT {
                None
            } else {
                self.directory.find_object(self.management_node_id)
            }
        })
    }

    /// Handle one event and return it in its final, expanded form
    pub fn process(&self, mut event: Event) -> Event {
        let source = self.resolve_source(event.source_id());
        event.expand_message_text(source.as_ref());
        tracing::debug!(
            event_id = event.id(),
            code = event.code(),
            source_id = event.source_id(),
            message = event.message_text().unwrap_or_default(),
            "processing event"
        );

        self.recent.record(&event);

        if let Err(e) = self.policy.evaluate(&event) {
            self.stats.policy_failures.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(event_id = event.id(), error = %e, "policy evaluation failed");
        }

        if event.flags().contains(EventFlags::LOG) {
            if let Err(e) = self.store.append_event_log_record(&event) {
                self.stats.log_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(event_id = event.id(), error = %e, "failed to write event log record");
            }
        }

        self.stats.processed.fetch_add(1, Ordering::Relaxed);
        event
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
