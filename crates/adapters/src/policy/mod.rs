// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Downstream policy evaluation adapters

mod noop;

pub use noop::NoOpPolicy;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakePolicy;

use thiserror::Error;
use vigil_core::Event;

/// Errors from policy evaluation
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("policy rejected event {event_id}: {reason}")]
    Rejected { event_id: u64, reason: String },
    #[error("policy unavailable: {0}")]
    Unavailable(String),
}

/// Receives every processed event, after expansion, for correlation
pub trait PolicyEvaluator: Clone + Send + Sync + 'static {
    fn evaluate(&self, event: &Event) -> Result<(), PolicyError>;
}
