// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

//! vigil-core: data model of the event processing subsystem
//!
//! This crate provides:
//! - Event definitions (templates and groups) and their code space
//! - Event instances with lazy `%`-macro message expansion
//! - The compact format-string parameter protocol
//! - The unbounded blocking queue events travel through

pub mod clock;
pub mod definition;
pub mod event;
pub mod expand;
pub mod id;
pub mod params;
pub mod queue;
pub mod source;

pub use clock::{Clock, FakeClock, SystemClock};
pub use definition::{
    is_group_code, is_valid_name, DefinitionRequest, EventFlags, EventGroup, EventObject,
    EventTemplate, InvalidSeverity, Severity, FIRST_GROUP_CODE, FIRST_USER_EVENT_CODE, GROUP_FLAG,
    MAX_NAME_LENGTH,
};
pub use event::{Event, EventOrigin, MAX_USER_TAG_LENGTH};
pub use expand::expand_text;
pub use id::{new_guid, EventIdGen};
pub use params::{build_parameters, named_parameters, EventArg, EventParameter};
pub use queue::{Dequeued, EventQueue};
pub use source::{ObjectClass, SourceObject, NO_OBJECT};
