// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable storage for event definitions and the event log

mod event_log;
mod file;
mod memory;
mod store;

pub use event_log::EventLog;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{EventStore, StoreError};
