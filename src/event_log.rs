// Copyright 2026 Hypermesh Foundation. All rights reserved.
// STASY Crowd Safety Demo Engine - Event Log

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::{LogEntry, LogKind};

// ---------------------------------------------------------------------------
// EventLog - bounded, insertion-ordered
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    next_seq: u64,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 1,
        }
    }

    /// Append an entry stamped with the simulated clock, evicting the oldest
    /// entries past capacity.
    pub fn push(&mut self, kind: LogKind, message: impl Into<String>, elapsed_ms: u64) {
        let entry = LogEntry {
            id: format!("log-{}", self.next_seq),
            timestamp: format_timestamp(elapsed_ms),
            message: message.into(),
            kind,
        };
        self.next_seq += 1;
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total entries ever pushed, evicted ones included.
    pub fn total_pushed(&self) -> u64 {
        self.next_seq - 1
    }
}

/// `HH:MM:SS` of simulated time since start.
pub fn format_timestamp(elapsed_ms: u64) -> String {
    let secs = elapsed_ms / 1000;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
