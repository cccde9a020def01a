// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine tuning knobs

use serde::{Deserialize, Serialize};
use std::time::Duration;
use vigil_core::queue::{DEFAULT_GROW_INCREMENT, DEFAULT_INITIAL_CAPACITY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub queue_initial_capacity: usize,
    pub queue_grow_increment: usize,
    /// Processed events remembered per source object
    pub recent_events_per_source: usize,
    /// How long the processor blocks on an empty queue before re-checking
    #[serde(with = "humantime_serde")]
    pub processor_wait: Duration,
    /// Object used for macro expansion when the event source is unknown (0 = none)
    pub management_node_id: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            queue_initial_capacity: DEFAULT_INITIAL_CAPACITY,
            queue_grow_increment: DEFAULT_GROW_INCREMENT,
            recent_events_per_source: 8,
            processor_wait: Duration::from_secs(1),
            management_node_id: 0,
        }
    }
}
