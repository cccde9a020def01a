// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Instant;
use vigil_adapters::{FakePolicy, TableDirectory};
use vigil_core::{
    Clock, EventOrigin, EventParameter, EventTemplate, ObjectClass, Severity, SystemClock,
};
use vigil_storage::MemoryStore;

struct Harness {
    queue: Arc<EventQueue<Event>>,
    store: MemoryStore,
    policy: FakePolicy,
    directory: TableDirectory,
    recent: RecentEvents,
}

impl Harness {
    fn new() -> Self {
        Self {
            queue: Arc::new(EventQueue::new()),
            store: MemoryStore::new(),
            policy: FakePolicy::new(),
            directory: TableDirectory::new(),
            recent: RecentEvents::new(4),
        }
    }

    fn processor(&self) -> EventProcessor<MemoryStore, FakePolicy, TableDirectory> {
        EventProcessor::new(
            Arc::clone(&self.queue),
            self.store.clone(),
            self.policy.clone(),
            self.directory.clone(),
            self.recent.clone(),
        )
        .with_wait(Duration::from_millis(10))
    }
}

fn event(id: u64, flags: EventFlags, source: u32) -> Event {
    let template = EventTemplate::new(1001, "LinkDown", Severity::Major)
        .with_message("%n: interface %2 is down")
        .with_flags(flags);
    Event::from_template(
        &template,
        id,
        SystemClock.now(),
        EventOrigin::new(source),
        vec![EventParameter::unnamed("eth0"), EventParameter::unnamed("55")],
    )
}

#[test]
fn process_expands_records_and_hands_off() {
    let h = Harness::new();
    h.directory
        .insert(SourceObject::new(55, "router-1", ObjectClass::Node));
    let processor = h.processor();

    let done = processor.process(event(1, EventFlags::empty(), 55));

    assert_eq!(done.message_text(), Some("router-1: interface 55 is down"));
    let handed = h.policy.events();
    assert_eq!(handed.len(), 1);
    assert_eq!(handed[0].message_text(), Some("router-1: interface 55 is down"));
    assert_eq!(h.recent.for_source(55).len(), 1);
    assert_eq!(processor.stats().processed(), 1);
}

#[test]
fn only_log_flagged_events_are_persisted() {
    let h = Harness::new();
    let processor = h.processor();

    processor.process(event(1, EventFlags::empty(), 1));
    processor.process(event(2, EventFlags::LOG, 1));

    let logged = h.store.logged_events();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].id(), 2);
    assert!(logged[0].message_text().is_some());
}

#[test]
fn log_failure_does_not_block_delivery() {
    let h = Harness::new();
    let processor = h.processor();
    h.store.set_failing(true);

    processor.process(event(1, EventFlags::LOG, 1));
    processor.process(event(2, EventFlags::LOG, 1));

    assert_eq!(h.policy.events().len(), 2);
    assert_eq!(processor.stats().log_failures(), 2);
    assert_eq!(processor.stats().processed(), 2);
}

#[test]
fn policy_failure_is_counted_and_logging_continues() {
    let h = Harness::new();
    let processor = h.processor();
    h.policy.set_failing(true);

    processor.process(event(1, EventFlags::LOG, 1));

    assert_eq!(processor.stats().policy_failures(), 1);
    assert_eq!(h.store.logged_events().len(), 1);
}

#[test]
fn unknown_source_falls_back_to_management_node() {
    let h = Harness::new();
    h.directory
        .insert(SourceObject::new(1, "server", ObjectClass::Node));
    let processor = h.processor().with_management_node(1);

    let done = processor.process(event(1, EventFlags::empty(), 999));
    assert_eq!(done.message_text(), Some("server: interface 55 is down"));
}

#[test]
fn no_source_and_no_management_node_expands_empty() {
    let h = Harness::new();
    let processor = h.processor();
    let done = processor.process(event(1, EventFlags::empty(), 999));
    assert_eq!(done.message_text(), Some(": interface 55 is down"));
}

#[test]
fn thread_drains_in_order_and_stops_on_shutdown() {
    let h = Harness::new();
    let processor = h.processor();
    let stats = processor.stats();
    let handle = processor.spawn().unwrap();

    for id in 1..=20 {
        h.queue.put(event(id, EventFlags::empty(), 1));
    }

    let deadline = Instant::now() + Duration::from_secs(5);
    while stats.processed() < 20 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    h.queue.set_shutdown_mode();
    handle.join().unwrap();

    let ids: Vec<_> = h.policy.events().iter().map(Event::id).collect();
    assert_eq!(ids, (1..=20).collect::<Vec<_>>());
}
