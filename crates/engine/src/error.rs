// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the event engine

use thiserror::Error;
use vigil_storage::StoreError;

/// Reasons a management mutation on the registry was refused
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid event code: {0}")]
    InvalidCode(u32),
    #[error("invalid name: {0:?}")]
    InvalidName(String),
    #[error("name already in use: {0}")]
    DuplicateName(String),
    #[error("code {0} does not match the kind of definition requested")]
    KindMismatch(u32),
    #[error("group {group} cannot contain {member}: membership would be cyclic")]
    CyclicMembership { group: u32, member: u32 },
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Errors that can occur while starting the subsystem
#[derive(Debug, Error)]
pub enum SubsystemError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("failed to spawn event processor: {0}")]
    Spawn(#[from] std::io::Error),
}
