// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Policy evaluator that accepts everything.

use super::{PolicyError, PolicyEvaluator};
use vigil_core::Event;

/// Policy adapter that does nothing.
///
/// Used when no correlation engine is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpPolicy;

impl NoOpPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl PolicyEvaluator for NoOpPolicy {
    fn evaluate(&self, _event: &Event) -> Result<(), PolicyError> {
        Ok(())
    }
}
