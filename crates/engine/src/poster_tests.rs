// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vigil_adapters::{FakeNotifier, TableDirectory};
use vigil_core::{
    EventGroup, EventIdGen, EventTemplate, FakeClock, ObjectClass, Severity, SourceObject,
};
use vigil_storage::MemoryStore;

type TestPoster = EventPoster<MemoryStore, FakeNotifier, TableDirectory, FakeClock>;

fn setup() -> (TestPoster, TableDirectory) {
    let store = MemoryStore::with_definitions(
        [EventTemplate::new(1001, "LinkDown", Severity::Major).with_message("Interface %2 is down")],
        [EventGroup::new(0x8000_0001, "Links", vec![1001])],
    );
    let registry = Arc::new(EventRegistry::new(store.clone(), FakeNotifier::new()));
    registry.reload().unwrap();

    let directory = TableDirectory::new();
    let poster = EventPoster::new(
        registry,
        Arc::new(EventQueue::new()),
        EventIds::new(EventIdGen::starting_at(100), store),
        directory.clone(),
        FakeClock::new(),
    );
    (poster, directory)
}

fn next(poster: &TestPoster) -> Event {
    poster.queue().get().into_item().unwrap()
}

#[test]
fn post_builds_and_queues_event() {
    let (poster, _) = setup();
    assert!(poster.post(1001, 55, "si", &["eth0".into(), 55u32.into()]));

    let event = next(&poster);
    assert_eq!(event.id(), 100);
    assert_eq!(event.code(), 1001);
    assert_eq!(event.severity(), Severity::Major);
    assert_eq!(event.source_id(), 55);
    assert_eq!(event.parameter(1), Some("eth0"));
    assert_eq!(event.parameter(2), Some("55"));
}

#[test]
fn unknown_code_fails_and_queues_nothing() {
    let (poster, _) = setup();
    assert!(!poster.post(9999, 55, "", &[]));
    assert!(poster.queue().is_empty());
}

#[test]
fn group_code_is_not_postable() {
    let (poster, _) = setup();
    assert!(!poster.post(0x8000_0001, 55, "", &[]));
    assert!(poster.queue().is_empty());
}

#[test]
fn zone_comes_from_source_object() {
    let (poster, directory) = setup();
    directory.insert(SourceObject::new(55, "router-1", ObjectClass::Node).with_zone(9));
    directory.insert(SourceObject::new(56, "template", ObjectClass::Other).with_zone(9));

    assert!(poster.post(1001, 55, "", &[]));
    assert!(poster.post(1001, 56, "", &[]));
    assert!(poster.post(1001, 57, "", &[]));

    assert_eq!(next(&poster).zone_uin(), 9);
    assert_eq!(next(&poster).zone_uin(), 0);
    assert_eq!(next(&poster).zone_uin(), 0);
}

#[test]
fn variants_fill_optional_fields() {
    let (poster, _) = setup();
    assert!(poster.post_with_dci(1001, 1, 77, "d", &[5i32.into()]));
    assert!(poster.post_with_tag(1001, 1, "core", "", &[]));
    assert!(poster.post_with_names(1001, 1, "s", &["ifName"], &["eth0".into()]));
    assert!(poster.post_named(1001, 1, [("speed", "1G")]));

    assert_eq!(next(&poster).dci_id(), 77);
    assert_eq!(next(&poster).user_tag(), Some("core"));
    assert_eq!(next(&poster).named_parameter("ifName"), Some("eth0"));
    assert_eq!(next(&poster).named_parameter("speed"), Some("1G"));
}

#[test]
fn post_request_returns_id() {
    let (poster, _) = setup();
    let first = poster.post_request(&PostRequest::new(1001, 1)).unwrap();
    let second = poster.post_request(&PostRequest::new(1001, 1)).unwrap();
    assert_eq!(second, first + 1);
    assert!(poster.post_request(&PostRequest::new(4242, 1)).is_none());
}

#[test]
fn post_to_uses_the_side_queue() {
    let (poster, _) = setup();
    let side = EventQueue::new();
    assert!(poster.post_to(&side, &PostRequest::new(1001, 1)).is_some());
    assert_eq!(side.len(), 1);
    assert!(poster.queue().is_empty());
}

#[test]
fn resend_preserves_order() {
    let (poster, _) = setup();
    let side = EventQueue::new();
    let ids: Vec<_> = (0..3)
        .map(|_| poster.post_to(&side, &PostRequest::new(1001, 1)).unwrap())
        .collect();
    assert!(poster.post(1001, 1, "", &[]));

    assert_eq!(poster.resend(&side), 3);
    assert!(side.is_empty());

    let drained: Vec<_> = std::iter::from_fn(|| poster.queue().get().into_item())
        .map(|e| e.id())
        .collect();
    assert_eq!(&drained[1..], &ids[..]);
}

#[test]
fn template_edits_do_not_touch_queued_events() {
    let (poster, _) = setup();
    assert!(poster.post(1001, 1, "", &[]));
    poster
        .registry
        .upsert(
            &vigil_core::DefinitionRequest::template("LinkDownRenamed", Severity::Minor, "")
                .with_code(1001),
        )
        .unwrap();

    let event = next(&poster);
    assert_eq!(event.name(), "LinkDown");
    assert_eq!(event.severity(), Severity::Major);
}
