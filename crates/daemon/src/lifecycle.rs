// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: configuration, startup, shutdown.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};
use vigil_adapters::{
    ChannelNotifier, NoOpPolicy, TableDirectory, TracedDirectory, TracedNotifier, TracedPolicy,
};
use vigil_core::{SourceObject, SystemClock};
use vigil_engine::{EngineConfig, EventSubsystem, SubsystemDeps, SubsystemError};
use vigil_storage::{FileStore, StoreError};

/// Event subsystem with the daemon's concrete adapter types
pub type DaemonSubsystem = EventSubsystem<
    FileStore,
    TracedNotifier<ChannelNotifier>,
    TracedDirectory<TableDirectory>,
    SystemClock,
>;

/// Name of the configuration file looked up in the state directory
pub const CONFIG_FILE_NAME: &str = "vigil.toml";

/// On-disk shape of `vigil.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    engine: EngineConfig,
    data_dir: Option<PathBuf>,
    socket_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
    /// Topology objects known to the daemon at startup
    objects: Vec<SourceObject>,
}

/// Daemon configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Definition files and the event log
    pub data_dir: PathBuf,
    /// Path to Unix socket
    pub socket_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to version file
    pub version_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    pub engine: EngineConfig,
    pub objects: Vec<SourceObject>,
}

impl Config {
    /// Load configuration from `path`, or from `vigil.toml` in the state
    /// directory when no path is given. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, LifecycleError> {
        let state_dir = state_dir()?;
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| state_dir.join(CONFIG_FILE_NAME));

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(LifecycleError::ConfigRead(path, e)),
        };

        Self::from_toml(&content, &state_dir, socket_dir_override().as_deref())
            .map_err(|e| LifecycleError::ConfigParse(path, e))
    }

    /// Resolve a configuration from TOML text
    ///
    /// Relative defaults hang off `state_dir`. `socket_dir` overrides where
    /// the socket lives unless the file names an explicit socket path.
    pub fn from_toml(
        content: &str,
        state_dir: &Path,
        socket_dir: Option<&Path>,
    ) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(content)?;

        let data_dir = file.data_dir.unwrap_or_else(|| state_dir.join("data"));
        let socket_path = file.socket_path.unwrap_or_else(|| {
            socket_dir
                .map(Path::to_path_buf)
                .unwrap_or_else(|| state_dir.to_path_buf())
                .join("vigild.sock")
        });

        Ok(Self {
            socket_path,
            lock_path: state_dir.join("vigild.pid"),
            version_path: state_dir.join("vigild.version"),
            log_path: file.log_path.unwrap_or_else(|| state_dir.join("vigild.log")),
            data_dir,
            engine: file.engine,
            objects: file.objects,
        })
    }
}

/// Daemon state during operation
pub struct DaemonState {
    /// Configuration
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Unix socket listener
    pub listener: UnixListener,
    /// Registry, queue, processor thread and posting API
    pub subsystem: DaemonSubsystem,
    /// When daemon started
    pub start_time: Instant,
    /// Shutdown requested flag
    pub shutdown_requested: bool,
}

impl DaemonState {
    /// Shutdown the daemon gracefully
    pub async fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");

        // Stop the processor first so nothing else is written to the event log
        let dropped = self.subsystem.shutdown();
        if dropped > 0 {
            warn!(dropped, "discarded queued events at shutdown");
        }

        if self.config.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.socket_path) {
                warn!("Failed to remove socket file: {}", e);
            }
        }

        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        if self.config.version_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.version_path) {
                warn!("Failed to remove version file: {}", e);
            }
        }

        // Lock file is released automatically when self.lock_file is dropped

        info!("Daemon shutdown complete");
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to read config {0}: {1}")]
    ConfigRead(PathBuf, std::io::Error),

    #[error("Invalid config {0}: {1}")]
    ConfigParse(PathBuf, toml::de::Error),

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Event subsystem error: {0}")]
    Subsystem(#[from] SubsystemError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
pub async fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    // Failing here leaves every file alone: they belong to the lock holder
    let lock_file = acquire_lock(config)?;

    match startup_locked(config, &lock_file).await {
        Ok((listener, subsystem)) => Ok(DaemonState {
            config: config.clone(),
            lock_file,
            listener,
            subsystem,
            start_time: Instant::now(),
            shutdown_requested: false,
        }),
        Err(e) => {
            // Still holding the lock, so everything removed here is ours
            cleanup_on_failure(config);
            Err(e)
        }
    }
}

/// Take the exclusive daemon lock without disturbing a running daemon's pid
fn acquire_lock(config: &Config) -> Result<File, LifecycleError> {
    if let Some(parent) = config.lock_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;
    Ok(lock_file)
}

/// Startup steps that run while holding the lock
async fn startup_locked(
    config: &Config,
    lock_file: &File,
) -> Result<(UnixListener, DaemonSubsystem), LifecycleError> {
    // 1. Record our pid and version
    let mut pid_file = lock_file;
    pid_file.set_len(0)?;
    writeln!(pid_file, "{}", std::process::id())?;
    std::fs::write(&config.version_path, env!("CARGO_PKG_VERSION"))?;

    // 2. Create state directories
    if let Some(parent) = config.socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::create_dir_all(&config.data_dir)?;

    // 3. Open storage and start the event subsystem (loads definitions)
    let store = FileStore::open(&config.data_dir)?;
    let directory = TableDirectory::from_objects(config.objects.iter().cloned());
    let notifier = ChannelNotifier::new();
    spawn_notification_log(&notifier);

    let subsystem = EventSubsystem::start(
        &config.engine,
        SubsystemDeps {
            store,
            policy: TracedPolicy::new(NoOpPolicy::new()),
            notifier: TracedNotifier::new(notifier),
            directory: TracedDirectory::new(directory.clone()),
        },
        SystemClock,
    )?;

    info!(
        definitions = subsystem.registry().len(),
        objects = directory.len(),
        "Loaded event definitions"
    );

    // 4. Remove stale socket and bind (LAST - only after all validation passes)
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;

    info!("Daemon started with data in {}", config.data_dir.display());

    Ok((listener, subsystem))
}

/// Drain definition changes into the daemon log
///
/// The task ends once the notifier and all its clones are dropped.
fn spawn_notification_log(notifier: &ChannelNotifier) {
    let mut rx = notifier.subscribe();
    tokio::spawn(async move {
        while let Some(change) = rx.recv().await {
            info!(code = change.code, kind = ?change.kind, "definition changed");
        }
    });
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config) {
    if config.socket_path.exists() {
        let _ = std::fs::remove_file(&config.socket_path);
    }

    if config.version_path.exists() {
        let _ = std::fs::remove_file(&config.version_path);
    }

    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

/// State directory for vigil
///
/// `$XDG_STATE_HOME/vigil`, falling back to `~/.local/state/vigil`.
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("vigil"));
    }
    dirs::state_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/state")))
        .map(|dir| dir.join("vigil"))
        .ok_or(LifecycleError::NoStateDir)
}

/// Socket directory override, used by tests to keep paths short
fn socket_dir_override() -> Option<PathBuf> {
    std::env::var_os("VIGIL_SOCKET_DIR").map(PathBuf::from)
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
