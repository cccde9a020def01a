// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Topology lookup adapters
//!
//! The event subsystem never owns topology objects. It asks a directory for
//! a snapshot when it needs a zone at fire time or macro values at expansion.

mod noop;
mod table;

pub use noop::NoOpDirectory;
pub use table::TableDirectory;

use vigil_core::SourceObject;

/// Read access to the object topology
pub trait ObjectDirectory: Clone + Send + Sync + 'static {
    /// Snapshot of the object with this id, if it exists
    fn find_object(&self, id: u32) -> Option<SourceObject>;
}
