// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event definitions: templates, groups, and the code space they share
//!
//! Codes are 32-bit. The high bit marks a group; every other code names a
//! template. Both kinds carry a name, a description and a GUID that survives
//! code reassignment between installations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;
use thiserror::Error;
use uuid::Uuid;

/// High bit of an event code: set for groups, clear for templates
pub const GROUP_FLAG: u32 = 0x8000_0000;

/// First code handed out to user-created templates
pub const FIRST_USER_EVENT_CODE: u32 = 100_000;

/// First code handed out to user-created groups
pub const FIRST_GROUP_CODE: u32 = GROUP_FLAG | 1;

/// Longest accepted definition name
pub const MAX_NAME_LENGTH: usize = 63;

/// Whether `code` lies in the group range
pub fn is_group_code(code: u32) -> bool {
    code & GROUP_FLAG != 0
}

/// Whether `name` is acceptable as a definition name
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name.chars().count() <= MAX_NAME_LENGTH
        && !name.chars().any(char::is_control)
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid severity value: {0}")]
pub struct InvalidSeverity(pub i32);

/// Event severity, ordered from least to most severe
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i32", into = "i32")]
pub enum Severity {
    #[default]
    Normal = 0,
    Warning = 1,
    Minor = 2,
    Major = 3,
    Critical = 4,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Normal,
        Severity::Warning,
        Severity::Minor,
        Severity::Major,
        Severity::Critical,
    ];

    /// Upper-case display name used in expanded messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Normal => "NORMAL",
            Severity::Warning => "WARNING",
            Severity::Minor => "MINOR",
            Severity::Major => "MAJOR",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Parse a severity from its name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(name))
    }
}

impl TryFrom<i32> for Severity {
    type Error = InvalidSeverity;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|s| *s as i32 == value)
            .ok_or(InvalidSeverity(value))
    }
}

impl From<Severity> for i32 {
    fn from(severity: Severity) -> Self {
        severity as i32
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Template behaviour flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventFlags(u32);

impl EventFlags {
    /// Write fired events to the persistent event log
    pub const LOG: EventFlags = EventFlags(0x0001);
    /// Use the message template verbatim instead of expanding macros
    pub const NO_EXPAND: EventFlags = EventFlags(0x0002);

    pub const fn empty() -> Self {
        EventFlags(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        EventFlags(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn contains(&self, other: EventFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for EventFlags {
    type Output = EventFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        EventFlags(self.0 | rhs.0)
    }
}

/// A registered definition of one kind of occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTemplate {
    pub code: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub guid: Uuid,
    pub severity: Severity,
    #[serde(default)]
    pub flags: EventFlags,
    #[serde(default)]
    pub message: String,
}

impl EventTemplate {
    pub fn new(code: u32, name: impl Into<String>, severity: Severity) -> Self {
        Self {
            code,
            name: name.into(),
            description: String::new(),
            guid: Uuid::new_v4(),
            severity,
            flags: EventFlags::empty(),
            message: String::new(),
        }
    }

    pub fn with_message(self, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..self
        }
    }

    pub fn with_flags(self, flags: EventFlags) -> Self {
        Self { flags, ..self }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self
        }
    }
}

/// A named collection of event codes (templates and nested groups)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventGroup {
    pub code: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub guid: Uuid,
    #[serde(default)]
    pub members: Vec<u32>,
}

impl EventGroup {
    pub fn new(code: u32, name: impl Into<String>, members: Vec<u32>) -> Self {
        Self {
            code,
            name: name.into(),
            description: String::new(),
            guid: Uuid::new_v4(),
            members,
        }
    }

    /// Direct membership only; nested groups are not followed
    pub fn contains(&self, code: u32) -> bool {
        self.members.contains(&code)
    }

    /// Member codes that are themselves groups
    pub fn nested_groups(&self) -> impl Iterator<Item = u32> + '_ {
        self.members.iter().copied().filter(|c| is_group_code(*c))
    }
}

/// Any object held by the definition registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventObject {
    Template(EventTemplate),
    Group(EventGroup),
}

impl EventObject {
    pub fn code(&self) -> u32 {
        match self {
            EventObject::Template(t) => t.code,
            EventObject::Group(g) => g.code,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EventObject::Template(t) => &t.name,
            EventObject::Group(g) => &g.name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            EventObject::Template(t) => &t.description,
            EventObject::Group(g) => &g.description,
        }
    }

    pub fn guid(&self) -> Uuid {
        match self {
            EventObject::Template(t) => t.guid,
            EventObject::Group(g) => g.guid,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, EventObject::Group(_))
    }

    pub fn as_template(&self) -> Option<&EventTemplate> {
        match self {
            EventObject::Template(t) => Some(t),
            EventObject::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&EventGroup> {
        match self {
            EventObject::Group(g) => Some(g),
            EventObject::Template(_) => None,
        }
    }

    /// Serialized form used for audit trails and change notifications
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl From<EventTemplate> for EventObject {
    fn from(t: EventTemplate) -> Self {
        EventObject::Template(t)
    }
}

impl From<EventGroup> for EventObject {
    fn from(g: EventGroup) -> Self {
        EventObject::Group(g)
    }
}

/// A management request to create or modify a definition
///
/// `code == 0` asks the registry to allocate a fresh code and GUID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefinitionRequest {
    pub code: u32,
    pub is_group: bool,
    pub name: String,
    pub description: String,
    pub severity: Severity,
    pub flags: EventFlags,
    pub message: String,
    pub members: Vec<u32>,
}

impl DefinitionRequest {
    /// Request for a new template
    pub fn template(name: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            severity,
            message: message.into(),
            ..Self::default()
        }
    }

    /// Request for a new group
    pub fn group(name: impl Into<String>, members: Vec<u32>) -> Self {
        Self {
            is_group: true,
            name: name.into(),
            members,
            ..Self::default()
        }
    }

    /// Target an existing definition instead of creating one
    pub fn with_code(self, code: u32) -> Self {
        Self { code, ..self }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self
        }
    }

    pub fn with_flags(self, flags: EventFlags) -> Self {
        Self { flags, ..self }
    }

    /// Build the object this request describes, keeping `guid`
    pub fn build(&self, code: u32, guid: Uuid) -> EventObject {
        if self.is_group {
            EventObject::Group(EventGroup {
                code,
                name: self.name.clone(),
                description: self.description.clone(),
                guid,
                members: self.members.clone(),
            })
        } else {
            EventObject::Template(EventTemplate {
                code,
                name: self.name.clone(),
                description: self.description.clone(),
                guid,
                severity: self.severity,
                flags: self.flags,
                message: self.message.clone(),
            })
        }
    }
}

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;
