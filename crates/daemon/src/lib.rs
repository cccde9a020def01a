// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vigild library: configuration, lifecycle and the client/daemon protocol
//!
//! The CLI links against this crate for the protocol types and to resolve
//! the same socket path the daemon binds.

pub mod lifecycle;
pub mod protocol;
pub mod server;

pub use lifecycle::{Config, LifecycleError, CONFIG_FILE_NAME};
pub use protocol::{ProtocolError, Request, Response};

/// Startup marker prefix written to the log before anything else.
/// The CLI uses this to find where the current startup attempt begins.
/// Full format: "--- vigild: starting (pid: 12345) ---"
pub const STARTUP_MARKER_PREFIX: &str = "--- vigild: starting (pid: ";
