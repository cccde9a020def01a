// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use assert_cmd::Command;
use tempfile::TempDir;
use vigil_daemon::lifecycle::startup;
use vigil_daemon::protocol::{encode, Request};
use vigil_daemon::{server, Config};

/// An in-process daemon serving on a private socket
///
/// Runs on its own thread with a current-thread runtime and stops on drop.
pub struct TestDaemon {
    dir: TempDir,
    config_path: PathBuf,
    socket_path: PathBuf,
    handle: Option<JoinHandle<()>>,
}

impl TestDaemon {
    pub fn start() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let socket_path = dir.path().join("vigild.sock");
        let content = format!(
            "socket_path = '{}'\ndata_dir = '{}'\n\n\
             [engine]\nprocessor_wait = \"10ms\"\n\n\
             [[objects]]\nid = 55\nname = \"core-sw\"\nclass = \"node\"\n",
            socket_path.display(),
            dir.path().join("data").display(),
        );
        let config_path = dir.path().join("vigil.toml");
        std::fs::write(&config_path, &content).expect("Failed to write config");
        let config = Config::from_toml(&content, dir.path(), None).expect("valid config");

        let (ready_tx, ready_rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("runtime");
            runtime.block_on(async move {
                let mut daemon = startup(&config).await.expect("daemon startup");
                ready_tx.send(()).expect("ready signal");
                while !daemon.shutdown_requested {
                    let Ok((stream, _)) = daemon.listener.accept().await else {
                        break;
                    };
                    let _ = server::handle_connection(&mut daemon, stream).await;
                }
                daemon.shutdown().await.expect("daemon shutdown");
            });
        });
        ready_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("daemon did not start");

        Self {
            dir,
            config_path,
            socket_path,
            handle: Some(handle),
        }
    }

    pub fn state_dir(&self) -> &Path {
        self.dir.path()
    }

    /// `vigil --config <this daemon's config>` with an isolated state dir
    pub fn vigil(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("vigil").expect("vigil binary");
        cmd.env("XDG_STATE_HOME", self.dir.path())
            .env("VIGIL_DAEMON_BINARY", "/nonexistent/vigild")
            .arg("--config")
            .arg(&self.config_path);
        cmd
    }

    pub fn is_running(&self) -> bool {
        self.socket_path.exists()
    }
}

impl Drop for TestDaemon {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        if let Ok(mut stream) = std::os::unix::net::UnixStream::connect(&self.socket_path) {
            if let Ok(data) = encode(&Request::Shutdown) {
                let _ = stream.write_all(&(data.len() as u32).to_be_bytes());
                let _ = stream.write_all(&data);
            }
        }
        let _ = handle.join();
    }
}
