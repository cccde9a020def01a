// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `%`-macro expansion of event message templates
//!
//! | macro      | value |
//! |------------|-------|
//! | `%%`       | literal `%` |
//! | `%1`..`%99`| positional parameter (1-based, empty when out of range) |
//! | `%<name>`  | named parameter |
//! | `%{attr}`  | custom attribute of the source object |
//! | `%a`       | primary address of the source object |
//! | `%c`       | event code |
//! | `%i`       | source object id as `0x%08X` |
//! | `%I`       | source object id, decimal |
//! | `%n`       | source object name |
//! | `%N`       | event name |
//! | `%m`       | message text (empty while expanding) |
//! | `%M`       | custom message |
//! | `%s`       | severity number |
//! | `%S`       | severity name |
//! | `%t`       | timestamp, `dd-Mon-YYYY HH:MM:SS` UTC |
//! | `%T`       | timestamp, unix seconds |
//! | `%u`       | user tag |
//! | `%z`       | zone id |
//!
//! Any other `%` followed by a letter expands to nothing.

use crate::event::Event;
use crate::source::SourceObject;
use regex::{Captures, Regex};
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static MACRO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%(%|[0-9]{1,2}|<[^>]*>|\{[^}]*\}|[A-Za-z])").expect("constant regex pattern is valid")
});

const TIMESTAMP_FORMAT: &str = "%d-%b-%Y %H:%M:%S";

/// Expand every macro in `template` against an event and its source object
pub fn expand_text(template: &str, event: &Event, source: Option<&SourceObject>) -> String {
    MACRO_PATTERN
        .replace_all(template, |caps: &Captures| expand_macro(&caps[1], event, source))
        .into_owned()
}

fn expand_macro(token: &str, event: &Event, source: Option<&SourceObject>) -> String {
    if let Ok(position) = token.parse::<usize>() {
        return event.parameter(position).unwrap_or_default().to_string();
    }
    if let Some(name) = token.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return event.named_parameter(name).unwrap_or_default().to_string();
    }
    if let Some(attr) = token.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
        return source
            .and_then(|s| s.attributes.get(attr))
            .cloned()
            .unwrap_or_default();
    }

    match token {
        "%" => "%".to_string(),
        "a" => source
            .and_then(|s| s.primary_address)
            .map(|a| a.to_string())
            .unwrap_or_default(),
        "c" => event.code().to_string(),
        "i" => format!("0x{:08X}", event.source_id()),
        "I" => event.source_id().to_string(),
        "n" => source.map(|s| s.name.clone()).unwrap_or_default(),
        "N" => event.name().to_string(),
        "m" => event.message_text().unwrap_or_default().to_string(),
        "M" => event.custom_message().unwrap_or_default().to_string(),
        "s" => (event.severity() as i32).to_string(),
        "S" => event.severity().as_str().to_string(),
        "t" => event.timestamp().format(TIMESTAMP_FORMAT).to_string(),
        "T" => event.timestamp().timestamp().to_string(),
        "u" => event.user_tag().unwrap_or_default().to_string(),
        "z" => event.zone_uin().to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
#[path = "expand_tests.rs"]
mod tests;
