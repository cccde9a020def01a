// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event posting API
//!
//! Every entry point funnels into one operation: resolve the code to a
//! template under the registry read lock, build the event, and put it on a
//! queue. Posting never blocks and never returns an error; an unknown code
//! (or a group code) is logged and reported as `false` / `None`.

use crate::ids::EventIds;
use crate::registry::EventRegistry;
use std::sync::Arc;
use vigil_adapters::{Notifier, ObjectDirectory};
use vigil_core::{
    build_parameters, named_parameters, Clock, Dequeued, Event, EventArg, EventOrigin,
    EventParameter, EventQueue,
};
use vigil_storage::EventStore;

/// Everything a producer can say about one occurrence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostRequest {
    pub code: u32,
    pub source_id: u32,
    pub dci_id: u32,
    pub user_tag: Option<String>,
    pub parameters: Vec<EventParameter>,
}

impl PostRequest {
    pub fn new(code: u32, source_id: u32) -> Self {
        Self {
            code,
            source_id,
            ..Self::default()
        }
    }

    pub fn with_dci(self, dci_id: u32) -> Self {
        Self { dci_id, ..self }
    }

    pub fn with_tag(self, tag: impl Into<String>) -> Self {
        Self {
            user_tag: Some(tag.into()),
            ..self
        }
    }

    /// Parameters from a format string, unnamed
    pub fn with_format(self, format: &str, args: &[EventArg]) -> Self {
        self.with_named_format(format, &[], args)
    }

    /// Parameters from a format string with positional names
    pub fn with_named_format(self, format: &str, names: &[&str], args: &[EventArg]) -> Self {
        Self {
            parameters: build_parameters(format, names, args),
            ..self
        }
    }

    /// Parameters from ordered `(name, value)` pairs
    pub fn with_pairs<K, V>(self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            parameters: named_parameters(pairs),
            ..self
        }
    }
}

pub struct EventPoster<S, N, D, C> {
    registry: Arc<EventRegistry<S, N>>,
    queue: Arc<EventQueue<Event>>,
    ids: EventIds<S>,
    directory: D,
    clock: C,
}

impl<S, N, D, C> Clone for EventPoster<S, N, D, C>
where
    D: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            queue: Arc::clone(&self.queue),
            ids: self.ids.clone(),
            directory: self.directory.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<S, N, D, C> EventPoster<S, N, D, C> {
    /// The primary processing queue
    pub fn queue(&self) -> &Arc<EventQueue<Event>> {
        &self.queue
    }
}

impl<S, N, D, C> EventPoster<S, N, D, C>
where
    S: EventStore,
    N: Notifier,
    D: ObjectDirectory,
    C: Clock,
{
    pub fn new(
        registry: Arc<EventRegistry<S, N>>,
        queue: Arc<EventQueue<Event>>,
        ids: EventIds<S>,
        directory: D,
        clock: C,
    ) -> Self {
        Self {
            registry,
            queue,
            ids,
            directory,
            clock,
        }
    }

    /// Build an event for `request` without queueing it
    pub fn fire(&self, request: &PostRequest) -> Option<Event> {
        let Some(object) = self.registry.find_by_code(request.code) else {
            tracing::debug!(code = request.code, source_id = request.source_id, "event code not found");
            return None;
        };
        let Some(template) = object.as_template() else {
            tracing::debug!(code = request.code, "refusing to post a group code");
            return None;
        };

        let zone_uin = self
            .directory
            .find_object(request.source_id)
            .map(|o| o.zone())
            .unwrap_or(0);
        let origin = EventOrigin::new(request.source_id)
            .with_zone(zone_uin)
            .with_dci(request.dci_id)
            .with_tag(request.user_tag.clone());

        Some(Event::from_template(
            template,
            self.ids.next(),
            self.clock.now(),
            origin,
            request.parameters.clone(),
        ))
    }

    /// Post onto an arbitrary queue, returning the new event id
    pub fn post_to(&self, queue: &EventQueue<Event>, request: &PostRequest) -> Option<u64> {
        let event = self.fire(request)?;
        let id = event.id();
        tracing::trace!(event_id = id, code = request.code, "event posted");
        queue.put(event);
        Some(id)
    }

    /// Post onto the primary queue, returning the new event id
    pub fn post_request(&self, request: &PostRequest) -> Option<u64> {
        self.post_to(&self.queue, request)
    }

    pub fn post(&self, code: u32, source_id: u32, format: &str, args: &[EventArg]) -> bool {
        self.post_request(&PostRequest::new(code, source_id).with_format(format, args))
            .is_some()
    }

    pub fn post_with_dci(
        &self,
        code: u32,
        source_id: u32,
        dci_id: u32,
        format: &str,
        args: &[EventArg],
    ) -> bool {
        let request = PostRequest::new(code, source_id)
            .with_dci(dci_id)
            .with_format(format, args);
        self.post_request(&request).is_some()
    }

    pub fn post_with_tag(
        &self,
        code: u32,
        source_id: u32,
        user_tag: &str,
        format: &str,
        args: &[EventArg],
    ) -> bool {
        let request = PostRequest::new(code, source_id)
            .with_tag(user_tag)
            .with_format(format, args);
        self.post_request(&request).is_some()
    }

    pub fn post_with_names(
        &self,
        code: u32,
        source_id: u32,
        format: &str,
        names: &[&str],
        args: &[EventArg],
    ) -> bool {
        let request = PostRequest::new(code, source_id).with_named_format(format, names, args);
        self.post_request(&request).is_some()
    }

    pub fn post_named<K, V>(
        &self,
        code: u32,
        source_id: u32,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> bool
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.post_request(&PostRequest::new(code, source_id).with_pairs(pairs))
            .is_some()
    }

    /// Move everything from `side` onto the primary queue, preserving order
    pub fn resend(&self, side: &EventQueue<Event>) -> usize {
        let mut moved = 0;
        while let Dequeued::Item(event) = side.get() {
            self.queue.put(event);
            moved += 1;
        }
        if moved > 0 {
            tracing::debug!(count = moved, "resent events to processing queue");
        }
        moved
    }
}

#[cfg(test)]
#[path = "poster_tests.rs"]
mod tests;
