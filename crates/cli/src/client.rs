// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client for CLI commands

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::net::UnixStream;
use vigil_core::{DefinitionRequest, Event, EventObject};
use vigil_daemon::protocol::{self, ProtocolError};
use vigil_daemon::{Config, Request, Response, STARTUP_MARKER_PREFIX};

// Timeout configuration (env vars in milliseconds)
fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for IPC requests
pub fn timeout_ipc() -> Duration {
    parse_duration_ms("VIGIL_TIMEOUT_IPC_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for waiting for daemon to start
pub fn timeout_connect() -> Duration {
    parse_duration_ms("VIGIL_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(5))
}

/// Polling interval for retries
pub fn poll_interval() -> Duration {
    parse_duration_ms("VIGIL_POLL_INTERVAL_MS").unwrap_or(Duration::from_millis(50))
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Daemon not running")]
    DaemonNotRunning,

    #[error("Failed to start daemon: {0}")]
    DaemonStartFailed(String),

    #[error("Connection timeout waiting for daemon to start")]
    DaemonStartTimeout,

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Unexpected response from daemon")]
    UnexpectedResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Status figures reported by the daemon
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DaemonStatus {
    pub uptime_secs: u64,
    pub definitions: usize,
    pub queued: usize,
    pub processed: u64,
}

/// Before/after state of a definition change
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Change {
    pub code: u32,
    pub old: Option<serde_json::Value>,
    pub new: serde_json::Value,
}

/// Daemon client
pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// Connect to daemon, auto-starting if not running
    pub fn connect_or_start(
        config: &Config,
        config_path: Option<&Path>,
    ) -> Result<Self, ClientError> {
        match Self::connect(config) {
            Ok(client) => Ok(client),
            Err(ClientError::DaemonNotRunning) => {
                let child = start_daemon_background(config_path)?;
                Self::connect_with_retry(config, timeout_connect(), child)
            }
            Err(e) => Err(wrap_with_startup_error(e, config)),
        }
    }

    /// Connect to existing daemon (no auto-start)
    pub fn connect(config: &Config) -> Result<Self, ClientError> {
        if !config.socket_path.exists() {
            return Err(ClientError::DaemonNotRunning);
        }
        Ok(Self {
            socket_path: config.socket_path.clone(),
        })
    }

    fn connect_with_retry(
        config: &Config,
        timeout: Duration,
        mut child: std::process::Child,
    ) -> Result<Self, ClientError> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            // Check if daemon process exited early (startup failure)
            if let Ok(Some(status)) = child.try_wait() {
                return Err(match read_startup_error(config) {
                    Some(err) => ClientError::DaemonStartFailed(err),
                    None => ClientError::DaemonStartFailed(format!("exited with {}", status)),
                });
            }

            match Self::connect(config) {
                Ok(client) => return Ok(client),
                Err(ClientError::DaemonNotRunning) => std::thread::sleep(poll_interval()),
                Err(e) => return Err(wrap_with_startup_error(e, config)),
            }
        }

        Err(wrap_with_startup_error(
            ClientError::DaemonStartTimeout,
            config,
        ))
    }

    /// Send a request and receive a response
    pub async fn send(&self, request: Request) -> Result<Response, ClientError> {
        let timeout = timeout_ipc();
        let stream = UnixStream::connect(&self.socket_path).await?;
        let (mut reader, mut writer) = stream.into_split();

        let data = protocol::encode(&request)?;
        tokio::time::timeout(timeout, protocol::write_message(&mut writer, &data))
            .await
            .map_err(|_| ProtocolError::Timeout)??;

        let response_bytes = tokio::time::timeout(timeout, protocol::read_message(&mut reader))
            .await
            .map_err(|_| ProtocolError::Timeout)??;

        Ok(protocol::decode(&response_bytes)?)
    }

    /// Get daemon version via Hello handshake
    pub async fn hello(&self) -> Result<String, ClientError> {
        match self
            .send(Request::Hello {
                version: env!("CARGO_PKG_VERSION").to_string(),
            })
            .await?
        {
            Response::Hello { version } => Ok(version),
            other => Err(unexpected(other)),
        }
    }

    pub async fn status(&self) -> Result<DaemonStatus, ClientError> {
        match self.send(Request::Status).await? {
            Response::Status {
                uptime_secs,
                definitions,
                queued,
                processed,
            } => Ok(DaemonStatus {
                uptime_secs,
                definitions,
                queued,
                processed,
            }),
            other => Err(unexpected(other)),
        }
    }

    /// Post an event, returning the id the daemon assigned
    pub async fn post_event(
        &self,
        code: u32,
        source: u32,
        dci: u32,
        tag: Option<String>,
        parameters: Vec<(String, String)>,
    ) -> Result<u64, ClientError> {
        match self
            .send(Request::PostEvent {
                code,
                source,
                dci,
                tag,
                parameters,
            })
            .await?
        {
            Response::Posted { event_id } => Ok(event_id),
            other => Err(unexpected(other)),
        }
    }

    pub async fn upsert(&self, definition: DefinitionRequest) -> Result<Change, ClientError> {
        change(self.send(Request::Upsert { definition }).await?)
    }

    pub async fn delete(&self, code: u32) -> Result<Change, ClientError> {
        change(self.send(Request::Delete { code }).await?)
    }

    /// Reload definitions, returning how many are now loaded
    pub async fn reload(&self) -> Result<usize, ClientError> {
        match self.send(Request::Reload).await? {
            Response::Reloaded { definitions } => Ok(definitions),
            other => Err(unexpected(other)),
        }
    }

    pub async fn list_definitions(&self) -> Result<Vec<EventObject>, ClientError> {
        match self.send(Request::ListDefinitions).await? {
            Response::Definitions { definitions } => Ok(definitions),
            other => Err(unexpected(other)),
        }
    }

    pub async fn recent_events(&self, source: u32) -> Result<Vec<Event>, ClientError> {
        match self.send(Request::RecentEvents { source }).await? {
            Response::Events { events } => Ok(events),
            other => Err(unexpected(other)),
        }
    }

    /// Request daemon shutdown
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        match self.send(Request::Shutdown).await? {
            Response::Ok | Response::ShuttingDown => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

fn change(response: Response) -> Result<Change, ClientError> {
    match response {
        Response::Changed { code, old, new } => Ok(Change { code, old, new }),
        other => Err(unexpected(other)),
    }
}

fn unexpected(response: Response) -> ClientError {
    match response {
        Response::Error { message } => ClientError::Rejected(message),
        _ => ClientError::UnexpectedResponse,
    }
}

/// Start the daemon in the background, returning the child process handle
fn start_daemon_background(config_path: Option<&Path>) -> Result<std::process::Child, ClientError> {
    let binary = find_vigild_binary();
    tracing::debug!(binary = %binary.display(), "starting daemon in background");
    let mut command = Command::new(&binary);
    if let Some(path) = config_path {
        command.arg(path);
    }
    command
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| ClientError::DaemonStartFailed(e.to_string()))
}

/// Find the vigild binary
fn find_vigild_binary() -> PathBuf {
    // Explicit override (used by tests to ensure correct binary)
    if let Ok(path) = std::env::var("VIGIL_DAEMON_BINARY") {
        return PathBuf::from(path);
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("vigild");
            if sibling.exists() {
                return sibling;
            }
        }
    }

    PathBuf::from("vigild")
}

/// Read daemon log from the last startup marker, looking for errors.
pub fn read_startup_error(config: &Config) -> Option<String> {
    let content = std::fs::read_to_string(&config.log_path).ok()?;
    let start_pos = content.rfind(STARTUP_MARKER_PREFIX)?;
    startup_errors(&content[start_pos..])
}

/// Error messages in a log excerpt, with timestamp/level prefixes stripped
fn startup_errors(log: &str) -> Option<String> {
    let errors: Vec<&str> = log
        .lines()
        .filter(|line| line.contains(" ERROR ") || line.contains("Failed to start"))
        .collect();

    if errors.is_empty() {
        return None;
    }

    let messages: Vec<String> = errors
        .iter()
        .filter_map(|line| line.split_once(": ").map(|(_, msg)| msg.to_string()))
        .collect();

    if messages.is_empty() {
        Some(errors.join("\n"))
    } else {
        Some(messages.join("\n"))
    }
}

/// Wrap an error with startup log info if available.
fn wrap_with_startup_error(err: ClientError, config: &Config) -> ClientError {
    if matches!(err, ClientError::DaemonStartFailed(_)) {
        return err;
    }

    match read_startup_error(config) {
        Some(startup_error) => ClientError::DaemonStartFailed(startup_error),
        None => err,
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
