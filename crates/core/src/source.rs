// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot of a topology object as seen by the event subsystem

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;

/// Object id meaning "no source object"
pub const NO_OBJECT: u32 = 0;

/// Topology object classes relevant to zone derivation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectClass {
    Node,
    Cluster,
    Interface,
    Subnet,
    #[default]
    Other,
}

impl ObjectClass {
    /// Whether objects of this class live inside a zone
    pub fn is_zoned(&self) -> bool {
        matches!(
            self,
            ObjectClass::Node | ObjectClass::Cluster | ObjectClass::Interface | ObjectClass::Subnet
        )
    }
}

/// The parts of a topology object that events read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceObject {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub class: ObjectClass,
    #[serde(default)]
    pub zone_uin: Option<u32>,
    #[serde(default)]
    pub primary_address: Option<IpAddr>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl SourceObject {
    pub fn new(id: u32, name: impl Into<String>, class: ObjectClass) -> Self {
        Self {
            id,
            name: name.into(),
            class,
            ..Self::default()
        }
    }

    pub fn with_zone(self, zone_uin: u32) -> Self {
        Self {
            zone_uin: Some(zone_uin),
            ..self
        }
    }

    pub fn with_address(self, address: IpAddr) -> Self {
        Self {
            primary_address: Some(address),
            ..self
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Zone an event from this object belongs to
    ///
    /// Only zoned classes carry a zone; everything else reports zone 0.
    pub fn zone(&self) -> u32 {
        if self.class.is_zoned() {
            self.zone_uin.unwrap_or(0)
        } else {
            0
        }
    }
}
