// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::lifecycle::{startup, Config};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use vigil_core::{DefinitionRequest, Severity};

async fn daemon() -> (TempDir, DaemonState) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::from_toml(
        r#"
        [engine]
        processor_wait = "10ms"

        [[objects]]
        id = 55
        name = "core-sw"
        class = "node"
        "#,
        dir.path(),
        None,
    )
    .unwrap();
    let state = startup(&config).await.unwrap();
    (dir, state)
}

fn create_link_down(daemon: &mut DaemonState) -> u32 {
    match handle_request(
        daemon,
        Request::Upsert {
            definition: DefinitionRequest::template(
                "LinkDown",
                Severity::Major,
                "%n: interface %<ifName> is down",
            ),
        },
    ) {
        Response::Changed { code, old: None, .. } => code,
        other => panic!("unexpected response: {:?}", other),
    }
}

#[tokio::test]
async fn ping_and_hello() {
    let (_dir, mut daemon) = daemon().await;
    assert_eq!(handle_request(&mut daemon, Request::Ping), Response::Pong);
    assert_eq!(
        handle_request(
            &mut daemon,
            Request::Hello {
                version: "0.0.0".to_string()
            }
        ),
        Response::Hello {
            version: PROTOCOL_VERSION.to_string()
        }
    );
    daemon.shutdown().await.unwrap();
}

#[tokio::test]
async fn post_event_is_processed_and_listed_as_recent() {
    let (_dir, mut daemon) = daemon().await;
    let code = create_link_down(&mut daemon);

    let response = handle_request(
        &mut daemon,
        Request::PostEvent {
            code,
            source: 55,
            dci: 0,
            tag: None,
            parameters: vec![("ifName".to_string(), "eth0".to_string())],
        },
    );
    assert!(matches!(response, Response::Posted { .. }));

    let deadline = Instant::now() + Duration::from_secs(5);
    while daemon.subsystem.processed() < 1 {
        assert!(Instant::now() < deadline, "event was never processed");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    match handle_request(&mut daemon, Request::RecentEvents { source: 55 }) {
        Response::Events { events } => {
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].message_text(), Some("core-sw: interface eth0 is down"));
        }
        other => panic!("unexpected response: {:?}", other),
    }
    daemon.shutdown().await.unwrap();
}

#[tokio::test]
async fn post_unknown_code_is_an_error() {
    let (_dir, mut daemon) = daemon().await;
    let response = handle_request(
        &mut daemon,
        Request::PostEvent {
            code: 9999,
            source: 1,
            dci: 0,
            tag: None,
            parameters: vec![],
        },
    );
    assert!(matches!(response, Response::Error { .. }));
    assert!(daemon.subsystem.queue().is_empty());
    daemon.shutdown().await.unwrap();
}

#[tokio::test]
async fn definition_management_roundtrip() {
    let (_dir, mut daemon) = daemon().await;
    let code = create_link_down(&mut daemon);

    match handle_request(&mut daemon, Request::ListDefinitions) {
        Response::Definitions { definitions } => {
            assert_eq!(definitions.len(), 1);
            assert_eq!(definitions[0].code(), code);
        }
        other => panic!("unexpected response: {:?}", other),
    }

    let duplicate = handle_request(
        &mut daemon,
        Request::Upsert {
            definition: DefinitionRequest::group("LinkDown", vec![code]),
        },
    );
    assert!(matches!(duplicate, Response::Error { .. }));

    assert_eq!(
        handle_request(&mut daemon, Request::Reload),
        Response::Reloaded { definitions: 1 }
    );

    match handle_request(&mut daemon, Request::Delete { code }) {
        Response::Changed { old: Some(_), new, .. } => assert!(new.is_null()),
        other => panic!("unexpected response: {:?}", other),
    }
    assert!(matches!(
        handle_request(&mut daemon, Request::Delete { code }),
        Response::Error { .. }
    ));
    daemon.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_request_sets_flag() {
    let (_dir, mut daemon) = daemon().await;
    assert_eq!(
        handle_request(&mut daemon, Request::Shutdown),
        Response::ShuttingDown
    );
    assert!(daemon.shutdown_requested);
    daemon.shutdown().await.unwrap();
}

#[tokio::test]
async fn status_over_the_socket() {
    let (_dir, mut daemon) = daemon().await;
    let socket_path = daemon.config.socket_path.clone();

    let client = tokio::spawn(async move {
        let stream = UnixStream::connect(&socket_path).await.unwrap();
        let (mut reader, mut writer) = stream.into_split();
        let data = protocol::encode(&Request::Status).unwrap();
        protocol::write_message(&mut writer, &data).await.unwrap();
        let bytes = protocol::read_message(&mut reader).await.unwrap();
        protocol::decode::<Response>(&bytes).unwrap()
    });

    let (stream, _) = daemon.listener.accept().await.unwrap();
    handle_connection(&mut daemon, stream).await.unwrap();

    match client.await.unwrap() {
        Response::Status {
            definitions,
            queued,
            ..
        } => {
            assert_eq!(definitions, 0);
            assert_eq!(queued, 0);
        }
        other => panic!("unexpected response: {:?}", other),
    }
    daemon.shutdown().await.unwrap();
}
