// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the collaborators around the event subsystem

pub mod directory;
pub mod notify;
pub mod policy;
pub mod traced;

pub use directory::{NoOpDirectory, ObjectDirectory, TableDirectory};
pub use notify::{ChangeKind, ChannelNotifier, DefinitionNotification, NoOpNotifier, Notifier};
pub use policy::{NoOpPolicy, PolicyError, PolicyEvaluator};
pub use traced::{TracedDirectory, TracedNotifier, TracedPolicy};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifier;
#[cfg(any(test, feature = "test-support"))]
pub use policy::FakePolicy;
