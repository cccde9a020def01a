// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory that knows no objects.

use super::ObjectDirectory;
use vigil_core::SourceObject;

/// Directory adapter that resolves nothing.
///
/// Events fired against it carry zone 0 and expand source macros to empty text.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpDirectory;

impl NoOpDirectory {
    pub fn new() -> Self {
        Self
    }
}

impl ObjectDirectory for NoOpDirectory {
    fn find_object(&self, _id: u32) -> Option<SourceObject> {
        None
    }
}
