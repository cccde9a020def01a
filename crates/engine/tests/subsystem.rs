// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scenarios through the assembled subsystem
//!
//! These tests wire a real registry, queue, poster and processor thread
//! against in-memory or on-disk stores and observe results through the
//! policy fake and the event log.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use vigil_adapters::{FakeNotifier, FakePolicy, TableDirectory};
use vigil_core::{
    DefinitionRequest, EventFlags, EventGroup, EventTemplate, FakeClock, ObjectClass, Severity,
    SourceObject,
};
use vigil_engine::{EngineConfig, EventSubsystem, SubsystemDeps};
use vigil_storage::{EventStore, FileStore, MemoryStore};

type MemSubsystem = EventSubsystem<MemoryStore, FakeNotifier, TableDirectory, FakeClock>;

fn config() -> EngineConfig {
    EngineConfig {
        processor_wait: Duration::from_millis(10),
        ..EngineConfig::default()
    }
}

fn start(store: MemoryStore, policy: FakePolicy, directory: TableDirectory) -> MemSubsystem {
    let deps = SubsystemDeps {
        store,
        policy,
        notifier: FakeNotifier::new(),
        directory,
    };
    EventSubsystem::start(&config(), deps, FakeClock::new()).unwrap()
}

fn wait_for(mut done: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done() {
        assert!(Instant::now() < deadline, "timed out waiting for processor");
        thread::sleep(Duration::from_millis(5));
    }
}

fn link_down() -> EventTemplate {
    EventTemplate::new(1001, "LinkDown", Severity::Major)
        .with_message("Interface %2 is down")
        .with_flags(EventFlags::LOG)
}

#[test]
fn posted_event_is_expanded_and_delivered() {
    let store = MemoryStore::with_definitions([link_down()], Vec::<EventGroup>::new());
    let policy = FakePolicy::new();
    let directory = TableDirectory::new();
    directory.insert(SourceObject::new(7, "core-sw", ObjectClass::Node).with_zone(3));
    let mut subsystem = start(store.clone(), policy.clone(), directory);

    assert!(subsystem
        .poster()
        .post(1001, 7, "si", &["eth0".into(), 55u32.into()]));
    wait_for(|| subsystem.processed() == 1);

    let events = policy.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].message_text(), Some("Interface 55 is down"));
    assert_eq!(events[0].zone_uin(), 3);
    assert_eq!(store.logged_events().len(), 1);
    assert_eq!(subsystem.recent().for_source(7).len(), 1);

    assert_eq!(subsystem.shutdown(), 0);
}

#[test]
fn unknown_code_posts_nothing() {
    let policy = FakePolicy::new();
    let mut subsystem = start(MemoryStore::new(), policy.clone(), TableDirectory::new());

    assert!(!subsystem.poster().post(9999, 1, "", &[]));
    assert!(subsystem.queue().is_empty());
    subsystem.shutdown();
    assert!(policy.events().is_empty());
}

#[test]
fn group_delete_does_not_cascade() {
    let store = MemoryStore::with_definitions(
        [link_down()],
        [
            EventGroup::new(0x8000_0005, "Inner", vec![1001]),
            EventGroup::new(0x8000_0006, "Outer", vec![0x8000_0005]),
        ],
    );
    let mut subsystem = start(store.clone(), FakePolicy::new(), TableDirectory::new());
    let registry = subsystem.registry();

    registry.delete(0x8000_0005).unwrap();

    assert!(registry.find_by_code(0x8000_0005).is_none());
    assert!(store.group(0x8000_0005).is_none());
    let outer = registry.find_by_code(0x8000_0006).unwrap();
    assert_eq!(outer.as_group().unwrap().members, vec![0x8000_0005]);
    assert!(!registry.is_member(0x8000_0006, 1001));

    subsystem.shutdown();
}

#[test]
fn reload_swaps_table_atomically_under_concurrent_lookups() {
    let store = MemoryStore::with_definitions([link_down()], Vec::<EventGroup>::new());
    let mut subsystem = start(store.clone(), FakePolicy::new(), TableDirectory::new());
    let registry = Arc::clone(subsystem.registry());
    let stop = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut seen = 0;
                while !stop.load(Ordering::Relaxed) {
                    let name = registry.event_name_from_code(1001);
                    assert!(name == "LinkDown" || name == "LinkDownV2", "saw {name}");
                    seen += 1;
                }
                seen
            })
        })
        .collect();

    for round in 0..50 {
        let name = if round % 2 == 0 { "LinkDownV2" } else { "LinkDown" };
        store
            .save_template(&EventTemplate::new(1001, name, Severity::Major))
            .unwrap();
        registry.reload().unwrap();
    }
    stop.store(true, Ordering::Relaxed);
    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }

    subsystem.shutdown();
}

#[test]
fn failed_reload_keeps_current_table() {
    let store = MemoryStore::with_definitions([link_down()], Vec::<EventGroup>::new());
    let mut subsystem = start(store.clone(), FakePolicy::new(), TableDirectory::new());

    store.set_failing(true);
    assert!(subsystem.registry().reload().is_err());
    assert_eq!(subsystem.registry().event_name_from_code(1001), "LinkDown");

    store.set_failing(false);
    subsystem.shutdown();
}

#[test]
fn management_created_template_is_immediately_postable() {
    let policy = FakePolicy::new();
    let mut subsystem = start(MemoryStore::new(), policy.clone(), TableDirectory::new());

    let change = subsystem
        .registry()
        .upsert(&DefinitionRequest::template(
            "DiskFull",
            Severity::Critical,
            "Disk %<mount> is full",
        ))
        .unwrap();
    assert_eq!(change.code, 100_000);

    assert!(subsystem
        .poster()
        .post_named(change.code, 1, [("mount", "/var")]));
    wait_for(|| subsystem.processed() == 1);
    assert_eq!(policy.events()[0].message_text(), Some("Disk /var is full"));

    subsystem.shutdown();
}

#[test]
fn event_ids_resume_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    store.save_template(&link_down()).unwrap();

    let deps = || SubsystemDeps {
        store: FileStore::open(dir.path()).unwrap(),
        policy: FakePolicy::new(),
        notifier: FakeNotifier::new(),
        directory: TableDirectory::new(),
    };

    let mut first = EventSubsystem::start(&config(), deps(), FakeClock::new()).unwrap();
    let a = first
        .poster()
        .post_request(&vigil_engine::PostRequest::new(1001, 1))
        .unwrap();
    let b = first
        .poster()
        .post_request(&vigil_engine::PostRequest::new(1001, 1))
        .unwrap();
    wait_for(|| first.processed() == 2);
    first.shutdown();
    drop(first);

    let mut second = EventSubsystem::start(&config(), deps(), FakeClock::new()).unwrap();
    let c = second
        .poster()
        .post_request(&vigil_engine::PostRequest::new(1001, 1))
        .unwrap();
    assert!(a < b && b < c);
    second.shutdown();
}

#[test]
fn unlogged_event_ids_are_not_reused_after_restart() {
    let store = MemoryStore::with_definitions(
        [EventTemplate::new(2000, "PollDone", Severity::Normal)],
        Vec::<EventGroup>::new(),
    );

    let mut first = start(store.clone(), FakePolicy::new(), TableDirectory::new());
    let a = first
        .poster()
        .post_request(&vigil_engine::PostRequest::new(2000, 1))
        .unwrap();
    first.shutdown();
    drop(first);
    assert!(store.logged_events().is_empty());

    let mut second = start(store.clone(), FakePolicy::new(), TableDirectory::new());
    let b = second
        .poster()
        .post_request(&vigil_engine::PostRequest::new(2000, 1))
        .unwrap();
    assert!(b > a, "event id {a} reused as {b} after restart");
    assert!(store.event_id_high_water().unwrap() >= b);
    second.shutdown();
}

#[test]
fn unlogged_event_ids_are_not_reused_after_file_store_restart() {
    let dir = tempfile::tempdir().unwrap();
    FileStore::open(dir.path())
        .unwrap()
        .save_template(&EventTemplate::new(2000, "PollDone", Severity::Normal))
        .unwrap();
    let deps = || SubsystemDeps {
        store: FileStore::open(dir.path()).unwrap(),
        policy: FakePolicy::new(),
        notifier: FakeNotifier::new(),
        directory: TableDirectory::new(),
    };

    let mut first = EventSubsystem::start(&config(), deps(), FakeClock::new()).unwrap();
    let a = first
        .poster()
        .post_request(&vigil_engine::PostRequest::new(2000, 1))
        .unwrap();
    first.shutdown();
    drop(first);

    let mut second = EventSubsystem::start(&config(), deps(), FakeClock::new()).unwrap();
    let b = second
        .poster()
        .post_request(&vigil_engine::PostRequest::new(2000, 1))
        .unwrap();
    assert!(b > a);
    second.shutdown();
}

#[test]
fn shutdown_discards_pending_and_is_idempotent() {
    let store = MemoryStore::with_definitions([link_down()], Vec::<EventGroup>::new());
    let mut subsystem = start(store, FakePolicy::new(), TableDirectory::new());

    subsystem.shutdown();
    assert!(subsystem.queue().is_shutdown());
    assert!(subsystem.poster().post(1001, 1, "", &[]));
    assert_eq!(subsystem.shutdown(), 0);
}
