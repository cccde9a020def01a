// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vigil_core::{Clock, EventOrigin, EventTemplate, Severity, SystemClock};

fn event(id: u64) -> Event {
    let template = EventTemplate::new(1001, "LinkDown", Severity::Major);
    Event::from_template(&template, id, SystemClock.now(), EventOrigin::new(55), vec![])
}

#[test]
fn fake_policy_records_events_in_order() {
    let policy = FakePolicy::new();
    policy.evaluate(&event(1)).unwrap();
    policy.evaluate(&event(2)).unwrap();

    let ids: Vec<_> = policy.events().iter().map(Event::id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn fake_policy_injected_failure_still_records() {
    let policy = FakePolicy::new();
    policy.set_failing(true);
    assert!(policy.evaluate(&event(1)).is_err());
    assert_eq!(policy.events().len(), 1);
}
