// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::notify::ChangeKind;

#[tokio::test]
async fn every_subscriber_receives_changes() {
    let notifier = ChannelNotifier::new();
    let mut first = notifier.subscribe();
    let mut second = notifier.subscribe();

    notifier.definition_changed(DefinitionNotification::modified(
        1001,
        serde_json::json!({"code": 1001}),
    ));

    let a = first.recv().await.unwrap();
    let b = second.recv().await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a.kind, ChangeKind::Modified);
    assert_eq!(a.definition["code"], 1001);
}

#[tokio::test]
async fn dropped_subscribers_are_pruned() {
    let notifier = ChannelNotifier::new();
    let dropped = notifier.subscribe();
    let mut kept = notifier.subscribe();
    drop(dropped);

    notifier.definition_changed(DefinitionNotification::deleted(7));

    assert_eq!(notifier.subscriber_count(), 1);
    let received = kept.recv().await.unwrap();
    assert_eq!(received.kind, ChangeKind::Deleted);
    assert!(received.definition.is_null());
}

#[test]
fn send_without_subscribers_is_harmless() {
    let notifier = ChannelNotifier::new();
    notifier.definition_changed(DefinitionNotification::deleted(1));
    assert_eq!(notifier.subscriber_count(), 0);
}
