// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vigil_core::{ObjectClass, Severity};
use vigil_engine::PostRequest;

fn config_in(dir: &Path) -> Config {
    Config::from_toml("", dir, None).unwrap()
}

#[test]
fn empty_config_uses_state_dir_defaults() {
    let config = Config::from_toml("", Path::new("/state"), None).unwrap();
    assert_eq!(config.data_dir, PathBuf::from("/state/data"));
    assert_eq!(config.socket_path, PathBuf::from("/state/vigild.sock"));
    assert_eq!(config.lock_path, PathBuf::from("/state/vigild.pid"));
    assert_eq!(config.log_path, PathBuf::from("/state/vigild.log"));
    assert_eq!(config.engine, EngineConfig::default());
    assert!(config.objects.is_empty());
}

#[test]
fn socket_dir_override_applies_without_explicit_path() {
    let config = Config::from_toml("", Path::new("/state"), Some(Path::new("/tmp/v"))).unwrap();
    assert_eq!(config.socket_path, PathBuf::from("/tmp/v/vigild.sock"));

    let config = Config::from_toml(
        r#"socket_path = "/run/vigil.sock""#,
        Path::new("/state"),
        Some(Path::new("/tmp/v")),
    )
    .unwrap();
    assert_eq!(config.socket_path, PathBuf::from("/run/vigil.sock"));
}

#[test]
fn parses_engine_table_and_objects() {
    let config = Config::from_toml(
        r#"
        data_dir = "/srv/vigil"

        [engine]
        processor_wait = "100ms"
        management_node_id = 1

        [[objects]]
        id = 1
        name = "server"
        class = "node"

        [[objects]]
        id = 55
        name = "core-sw"
        class = "node"
        zone_uin = 4
        "#,
        Path::new("/state"),
        None,
    )
    .unwrap();

    assert_eq!(config.data_dir, PathBuf::from("/srv/vigil"));
    assert_eq!(config.engine.processor_wait, std::time::Duration::from_millis(100));
    assert_eq!(config.engine.management_node_id, 1);
    assert_eq!(config.objects.len(), 2);
    assert_eq!(config.objects[1].class, ObjectClass::Node);
    assert_eq!(config.objects[1].zone(), 4);
}

#[test]
fn malformed_config_is_an_error() {
    assert!(Config::from_toml("engine = 3", Path::new("/state"), None).is_err());
}

#[tokio::test]
async fn startup_creates_files_and_shutdown_removes_them() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let mut daemon = startup(&config).await.unwrap();
    assert!(config.socket_path.exists());
    assert!(config.lock_path.exists());
    assert!(config.version_path.exists());
    assert!(config.data_dir.is_dir());
    assert!(daemon.subsystem.registry().is_empty());

    daemon.shutdown().await.unwrap();
    assert!(!config.socket_path.exists());
    assert!(!config.lock_path.exists());
    assert!(!config.version_path.exists());
}

#[tokio::test]
async fn definitions_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let mut daemon = startup(&config).await.unwrap();
    let change = daemon
        .subsystem
        .registry()
        .upsert(&vigil_core::DefinitionRequest::template(
            "LinkDown",
            Severity::Major,
            "Interface %1 is down",
        ))
        .unwrap();
    daemon.shutdown().await.unwrap();
    drop(daemon);

    let mut daemon = startup(&config).await.unwrap();
    assert_eq!(
        daemon.subsystem.registry().event_name_from_code(change.code),
        "LinkDown"
    );
    assert!(daemon
        .subsystem
        .poster()
        .post_request(&PostRequest::new(change.code, 1))
        .is_some());
    daemon.shutdown().await.unwrap();
}

#[tokio::test]
async fn second_startup_leaves_running_daemon_files_alone() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let mut daemon = startup(&config).await.unwrap();
    let pid = std::fs::read_to_string(&config.lock_path).unwrap();

    let err = startup(&config).await.err().unwrap();
    assert!(matches!(err, LifecycleError::LockFailed(_)));
    assert_eq!(std::fs::read_to_string(&config.lock_path).unwrap(), pid);
    assert!(config.version_path.exists());
    assert!(config.socket_path.exists());

    daemon.shutdown().await.unwrap();
}

#[tokio::test]
async fn failure_after_locking_removes_own_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.data_dir = dir.path().join("not-a-dir");
    std::fs::write(&config.data_dir, "").unwrap();

    assert!(startup(&config).await.is_err());
    assert!(!config.lock_path.exists());
    assert!(!config.version_path.exists());
    assert!(!config.socket_path.exists());
}
