// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only event log

use crate::store::StoreError;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use vigil_core::Event;

/// Durable log of processed events, one JSON record per line
pub struct EventLog {
    file: File,
    sequence: u64,
    max_event_id: u64,
}

impl EventLog {
    /// Open or create a log at the given path
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;

        let records = Self::replay_records(path)?;
        let sequence = records.last().map(|r| r.seq).unwrap_or(0);
        let max_event_id = records.iter().map(|r| r.event.id()).max().unwrap_or(0);

        Ok(Self {
            file,
            sequence,
            max_event_id,
        })
    }

    /// Append an event and sync it to disk
    pub fn append(&mut self, event: &Event) -> Result<u64, StoreError> {
        let record = LogRecord {
            seq: self.sequence + 1,
            event: event.clone(),
        };
        let line = serde_json::to_string(&record)?;
        writeln!(self.file, "{}", line)?;
        self.file.sync_all()?;

        self.sequence = record.seq;
        self.max_event_id = self.max_event_id.max(event.id());
        Ok(self.sequence)
    }

    /// Sequence number of the last record
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn max_event_id(&self) -> u64 {
        self.max_event_id
    }

    /// Read every logged event in append order
    pub fn replay(path: &Path) -> Result<Vec<Event>, StoreError> {
        Ok(Self::replay_records(path)?
            .into_iter()
            .map(|r| r.event)
            .collect())
    }

    fn replay_records(path: &Path) -> Result<Vec<LogRecord>, StoreError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: LogRecord =
                serde_json::from_str(&line).map_err(|e| StoreError::Corrupt {
                    path: format!("{}:{}", path.display(), lineno + 1),
                    reason: e.to_string(),
                })?;
            records.push(record);
        }

        Ok(records)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LogRecord {
    seq: u64,
    event: Event,
}

#[cfg(test)]
#[path = "event_log_tests.rs"]
mod tests;
