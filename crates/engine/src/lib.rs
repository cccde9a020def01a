// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Vigil event engine: definition registry, posting API and processor

mod config;
mod error;
mod ids;
mod poster;
mod processor;
mod recent;
mod registry;
mod subsystem;

pub use config::EngineConfig;
pub use error::{RegistryError, SubsystemError};
pub use ids::{EventIds, ID_RESERVE_BLOCK};
pub use poster::{EventPoster, PostRequest};
pub use processor::{EventProcessor, ProcessorStats};
pub use recent::RecentEvents;
pub use registry::{DefinitionChange, EventRegistry, UNKNOWN_EVENT_NAME};
pub use subsystem::{EventSubsystem, SubsystemDeps};
