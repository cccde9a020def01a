// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wiring for the whole event subsystem
//!
//! Startup order matters: definitions are loaded before anything can post,
//! and event ids resume past the persisted reservation and the event log so
//! they stay unique across restarts.

use crate::config::EngineConfig;
use crate::error::SubsystemError;
use crate::ids::EventIds;
use crate::poster::EventPoster;
use crate::processor::{EventProcessor, ProcessorStats};
use crate::recent::RecentEvents;
use crate::registry::EventRegistry;
use std::sync::Arc;
use std::thread::JoinHandle;
use vigil_adapters::{Notifier, ObjectDirectory, PolicyEvaluator};
use vigil_core::{Clock, Event, EventQueue};
use vigil_storage::EventStore;

/// External collaborators for the subsystem
pub struct SubsystemDeps<S, P, N, D> {
    pub store: S,
    pub policy: P,
    pub notifier: N,
    pub directory: D,
}

pub struct EventSubsystem<S, N, D, C> {
    registry: Arc<EventRegistry<S, N>>,
    poster: EventPoster<S, N, D, C>,
    recent: RecentEvents,
    stats: Arc<ProcessorStats>,
    processor: Option<JoinHandle<()>>,
}

impl<S, N, D, C> EventSubsystem<S, N, D, C>
where
    S: EventStore,
    N: Notifier,
    D: ObjectDirectory,
    C: Clock,
{
    /// Load definitions, start the processor thread and open for posting
    pub fn start<P: PolicyEvaluator>(
        config: &EngineConfig,
        deps: SubsystemDeps<S, P, N, D>,
        clock: C,
    ) -> Result<Self, SubsystemError> {
        let registry = Arc::new(EventRegistry::new(deps.store.clone(), deps.notifier));
        let loaded = registry.reload()?;

        let queue = Arc::new(EventQueue::with_capacity(
            config.queue_initial_capacity,
            config.queue_grow_increment,
        ));
        let ids = EventIds::resume(deps.store.clone())?;
        let next_event_id = ids.peek();

        let recent = RecentEvents::new(config.recent_events_per_source);
        let processor = EventProcessor::new(
            Arc::clone(&queue),
            deps.store,
            deps.policy,
            deps.directory.clone(),
            recent.clone(),
        )
        .with_wait(config.processor_wait)
        .with_management_node(config.management_node_id);
        let stats = processor.stats();
        let handle = processor.spawn()?;

        let poster = EventPoster::new(Arc::clone(&registry), queue, ids, deps.directory, clock);

        tracing::info!(
            definitions = loaded,
            next_event_id,
            "event subsystem started"
        );

        Ok(Self {
            registry,
            poster,
            recent,
            stats,
            processor: Some(handle),
        })
    }

    pub fn registry(&self) -> &Arc<EventRegistry<S, N>> {
        &self.registry
    }

    /// Posting handle; clones may be handed to any producer thread
    pub fn poster(&self) -> &EventPoster<S, N, D, C> {
        &self.poster
    }

    pub fn recent(&self) -> &RecentEvents {
        &self.recent
    }

    pub fn queue(&self) -> &Arc<EventQueue<Event>> {
        self.poster.queue()
    }

    pub fn processed(&self) -> u64 {
        self.stats.processed()
    }

    pub fn stats(&self) -> &Arc<ProcessorStats> {
        &self.stats
    }

    /// Stop the processor and drop whatever is still queued
    ///
    /// Returns the number of events discarded. Safe to call more than once.
    pub fn shutdown(&mut self) -> usize {
        let Some(handle) = self.processor.take() else {
            return 0;
        };
        let queue = self.poster.queue();
        queue.set_shutdown_mode();
        if handle.join().is_err() {
            tracing::error!("event processor thread panicked");
        }
        let dropped = queue.len();
        queue.clear();
        tracing::info!(
            processed = self.stats.processed(),
            dropped,
            "event subsystem stopped"
        );
        dropped
    }
}

impl<S, N, D, C> Drop for EventSubsystem<S, N, D, C> {
    fn drop(&mut self) {
        if let Some(handle) = self.processor.take() {
            self.poster.queue().set_shutdown_mode();
            let _ = handle.join();
        }
    }
}
