// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event instances
//!
//! An [`Event`] is one occurrence of a template. Everything it needs from the
//! template is copied at construction, so later edits or deletion of the
//! template never change events already in flight.

use crate::definition::{EventFlags, EventTemplate, Severity};
use crate::expand::expand_text;
use crate::params::EventParameter;
use crate::source::SourceObject;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Longest user tag kept on an event
pub const MAX_USER_TAG_LENGTH: usize = 63;

/// Where an event came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventOrigin {
    pub source_id: u32,
    pub zone_uin: u32,
    pub dci_id: u32,
    pub user_tag: Option<String>,
}

impl EventOrigin {
    pub fn new(source_id: u32) -> Self {
        Self {
            source_id,
            ..Self::default()
        }
    }

    pub fn with_zone(self, zone_uin: u32) -> Self {
        Self { zone_uin, ..self }
    }

    pub fn with_dci(self, dci_id: u32) -> Self {
        Self { dci_id, ..self }
    }

    pub fn with_tag(self, tag: Option<String>) -> Self {
        Self {
            user_tag: tag,
            ..self
        }
    }
}

/// One fired event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    id: u64,
    #[serde(rename = "rootId", default)]
    root_id: u64,
    code: u32,
    name: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    timestamp: DateTime<Utc>,
    #[serde(rename = "source")]
    source_id: u32,
    #[serde(rename = "zone", default)]
    zone_uin: u32,
    #[serde(rename = "dci", default)]
    dci_id: u32,
    severity: Severity,
    #[serde(default)]
    flags: EventFlags,
    #[serde(rename = "tag", default, skip_serializing_if = "Option::is_none")]
    user_tag: Option<String>,
    #[serde(
        rename = "customMessage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    custom_message: Option<String>,
    #[serde(rename = "message", default, skip_serializing_if = "Option::is_none")]
    message_text: Option<String>,
    #[serde(rename = "template", default)]
    message_template: String,
    #[serde(default)]
    parameters: Vec<EventParameter>,
}

impl Event {
    /// Build an event from a template, copying its name, severity, flags and message template
    ///
    /// The timestamp is truncated to whole seconds, matching its stored form.
    pub fn from_template(
        template: &EventTemplate,
        id: u64,
        timestamp: DateTime<Utc>,
        origin: EventOrigin,
        parameters: Vec<EventParameter>,
    ) -> Self {
        Self {
            id,
            root_id: 0,
            code: template.code,
            name: template.name.clone(),
            timestamp: truncate_to_seconds(timestamp),
            source_id: origin.source_id,
            zone_uin: origin.zone_uin,
            dci_id: origin.dci_id,
            severity: template.severity,
            flags: template.flags,
            user_tag: origin.user_tag.map(truncate_tag),
            custom_message: None,
            message_text: None,
            message_template: template.message.clone(),
            parameters,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn root_id(&self) -> u64 {
        self.root_id
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn source_id(&self) -> u32 {
        self.source_id
    }

    pub fn zone_uin(&self) -> u32 {
        self.zone_uin
    }

    pub fn dci_id(&self) -> u32 {
        self.dci_id
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn flags(&self) -> EventFlags {
        self.flags
    }

    pub fn user_tag(&self) -> Option<&str> {
        self.user_tag.as_deref()
    }

    pub fn custom_message(&self) -> Option<&str> {
        self.custom_message.as_deref()
    }

    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    /// Expanded message, if expansion already ran
    pub fn message_text(&self) -> Option<&str> {
        self.message_text.as_deref()
    }

    pub fn parameters(&self) -> &[EventParameter] {
        &self.parameters
    }

    /// Parameter value by 1-based position
    pub fn parameter(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|i| self.parameters.get(i))
            .map(|p| p.value.as_str())
    }

    /// Parameter value by name, case-insensitively
    pub fn named_parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.value.as_str())
    }

    /// Correlate this event with a parent
    pub fn with_root_id(self, root_id: u64) -> Self {
        Self { root_id, ..self }
    }

    /// Override the expanded message text
    pub fn with_custom_message(self, message: impl Into<String>) -> Self {
        Self {
            custom_message: Some(message.into()),
            ..self
        }
    }

    /// Replace the value of a named parameter, or append it if absent
    pub fn set_named_parameter(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .parameters
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(name))
        {
            Some(existing) => existing.value = value,
            None => self.parameters.push(EventParameter::new(name, value)),
        }
    }

    /// Set the parameter at a 0-based index, padding with empty pairs
    pub fn set_parameter(&mut self, index: usize, name: impl Into<String>, value: impl Into<String>) {
        if self.parameters.len() <= index {
            self.parameters.resize_with(index + 1, EventParameter::default);
        }
        self.parameters[index] = EventParameter::new(name, value);
    }

    pub fn add_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.push(EventParameter::new(name, value));
    }

    /// Expand the message template once and return the result
    ///
    /// Templates flagged `NO_EXPAND` are used verbatim. Later calls return
    /// the memoized text regardless of `source`.
    pub fn expand_message_text(&mut self, source: Option<&SourceObject>) -> &str {
        if self.message_text.is_none() {
            let text = if self.flags.contains(EventFlags::NO_EXPAND) {
                self.message_template.clone()
            } else {
                expand_text(&self.message_template, self, source)
            };
            self.message_text = Some(text);
        }
        self.message_text.as_deref().unwrap_or_default()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

fn truncate_to_seconds(ts: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_opt(ts.timestamp(), 0).single().unwrap_or(ts)
}

fn truncate_tag(tag: String) -> String {
    match tag.char_indices().nth(MAX_USER_TAG_LENGTH) {
        Some((cut, _)) => tag[..cut].to_string(),
        None => tag,
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
