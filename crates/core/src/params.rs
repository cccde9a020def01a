// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event parameters and the compact format-string protocol
//!
//! Producers describe parameters with one letter per value and pass the
//! values as a positional list of [`EventArg`]:
//!
//! | letter | rendering |
//! |--------|-----------|
//! | `s`    | string |
//! | `m`    | narrow (8-bit) string, decoded lossily as UTF-8 |
//! | `u`    | wide (UTF-16) string |
//! | `d`    | signed 32-bit decimal |
//! | `D`    | signed 64-bit decimal |
//! | `i`    | object id, decimal |
//! | `x`    | hex integer, `0x%08X` |
//! | `t`    | timestamp as raw unix seconds |
//! | `a`    | IPv4 address |
//! | `A`    | network address (v4 or v6) |
//! | `h`    | MAC address |
//! | `G`    | UUID |
//!
//! Unknown letters never fail the event; they produce a `BAD FORMAT` value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use uuid::Uuid;

/// One named (possibly unnamed) event parameter
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventParameter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl EventParameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn unnamed(value: impl Into<String>) -> Self {
        Self::new(String::new(), value)
    }
}

/// A single positional argument for a format string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventArg {
    Str(String),
    Narrow(Vec<u8>),
    Wide(Vec<u16>),
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    Ipv4(Ipv4Addr),
    Addr(IpAddr),
    Mac([u8; 6]),
    Timestamp(i64),
    Uuid(Uuid),
}

impl EventArg {
    fn as_i64(&self) -> Option<i64> {
        match self {
            EventArg::Int32(v) => Some(i64::from(*v)),
            EventArg::Int64(v) | EventArg::Timestamp(v) => Some(*v),
            EventArg::UInt32(v) => Some(i64::from(*v)),
            EventArg::Ipv4(a) => Some(i64::from(u32::from(*a))),
            _ => None,
        }
    }

    /// Raw 32-bit view, as used by hex and diagnostic renderings
    fn as_u32(&self) -> u32 {
        self.as_i64().map(|v| v as u32).unwrap_or(0)
    }

    fn text(&self) -> String {
        match self {
            EventArg::Str(s) => s.clone(),
            EventArg::Narrow(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            EventArg::Wide(units) => String::from_utf16_lossy(units),
            EventArg::Int32(v) => v.to_string(),
            EventArg::Int64(v) | EventArg::Timestamp(v) => v.to_string(),
            EventArg::UInt32(v) => v.to_string(),
            EventArg::Ipv4(a) => a.to_string(),
            EventArg::Addr(a) => a.to_string(),
            EventArg::Mac(mac) => format_mac(mac),
            EventArg::Uuid(u) => u.hyphenated().to_string(),
        }
    }

    /// Render this argument according to a format letter
    pub fn render(&self, letter: char) -> String {
        match letter {
            's' | 'm' | 'u' => self.text(),
            'd' => match self.as_i64() {
                Some(v) => (v as i32).to_string(),
                None => self.text(),
            },
            'D' | 't' | 'i' => match self.as_i64() {
                Some(v) => v.to_string(),
                None => self.text(),
            },
            'x' => match self.as_i64() {
                Some(_) => format!("0x{:08X}", self.as_u32()),
                None => self.text(),
            },
            'a' => match self {
                EventArg::UInt32(v) => Ipv4Addr::from(*v).to_string(),
                _ => self.text(),
            },
            'A' | 'h' | 'G' => self.text(),
            other => format!("BAD FORMAT \"{}\" [value = 0x{:08X}]", other, self.as_u32()),
        }
    }
}

impl fmt::Display for EventArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Format a MAC address as colon-separated upper-case hex
pub fn format_mac(mac: &[u8; 6]) -> String {
    mac.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

impl From<&str> for EventArg {
    fn from(s: &str) -> Self {
        EventArg::Str(s.to_string())
    }
}

impl From<String> for EventArg {
    fn from(s: String) -> Self {
        EventArg::Str(s)
    }
}

impl From<i32> for EventArg {
    fn from(v: i32) -> Self {
        EventArg::Int32(v)
    }
}

impl From<i64> for EventArg {
    fn from(v: i64) -> Self {
        EventArg::Int64(v)
    }
}

impl From<u32> for EventArg {
    fn from(v: u32) -> Self {
        EventArg::UInt32(v)
    }
}

impl From<Ipv4Addr> for EventArg {
    fn from(a: Ipv4Addr) -> Self {
        EventArg::Ipv4(a)
    }
}

impl From<IpAddr> for EventArg {
    fn from(a: IpAddr) -> Self {
        EventArg::Addr(a)
    }
}

impl From<[u8; 6]> for EventArg {
    fn from(mac: [u8; 6]) -> Self {
        EventArg::Mac(mac)
    }
}

impl From<Uuid> for EventArg {
    fn from(u: Uuid) -> Self {
        EventArg::Uuid(u)
    }
}

/// Materialize the parameter list for a format string
///
/// Letters consume `args` positionally. A missing argument renders as an
/// empty string; surplus arguments are ignored. `names` supplies parameter
/// names by position, and parameters without a name get the empty string.
pub fn build_parameters(format: &str, names: &[&str], args: &[EventArg]) -> Vec<EventParameter> {
    format
        .chars()
        .enumerate()
        .map(|(i, letter)| {
            let value = match args.get(i) {
                Some(arg) => arg.render(letter),
                None => {
                    tracing::debug!(position = i, letter = %letter, "missing event argument");
                    String::new()
                }
            };
            let name = names.get(i).copied().unwrap_or_default();
            EventParameter::new(name, value)
        })
        .collect()
}

/// Convert ordered `(name, value)` pairs into parameters
pub fn named_parameters<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Vec<EventParameter>
where
    N: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(name, value)| EventParameter::new(name, value))
        .collect()
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
