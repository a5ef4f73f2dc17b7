//! telemetry/counters.rs
//! Mutable counters collected while a manifest is decoded.
//!
//! Converted into an immutable `TelemetrySnapshot` when the caller asks.
use std::ops::AddAssign;
use serde::{Deserialize, Serialize};

use crate::manifest::{EntryKind, ManifestRecord};

/// Deterministic counters collected during index decoding
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeCounters {
    pub records: u64,
    pub directories: u64,
    pub regular_files: u64,
    pub symlinks: u64,
    pub other_entries: u64,
    pub properties: u64,
    /// Records carrying a data hash.
    pub hashed_records: u64,
    /// Sum of the `length` fields (declared file bytes, not index bytes).
    pub bytes_declared: u64,
    pub bytes_signature: u64,
    pub bytes_records: u64,
}

impl DecodeCounters {
    /// Record the signature as overhead.
    pub fn add_signature(&mut self, len: usize) {
        self.bytes_signature += len as u64;
    }

    /// Record one decoded record and the index bytes it occupied.
    pub fn add_record(&mut self, record: &ManifestRecord, wire_len: u64) {
        self.records += 1;
        match record.kind() {
            Some(EntryKind::Directory) => self.directories += 1,
            Some(EntryKind::Regular) => self.regular_files += 1,
            Some(EntryKind::Symlink) => self.symlinks += 1,
            _ => self.other_entries += 1,
        }
        self.properties += record.properties.len() as u64;
        if record.data_hash.is_some() {
            self.hashed_records += 1;
        }
        self.bytes_declared = self.bytes_declared.saturating_add(record.length);
        self.bytes_records += wire_len;
    }

    /// Total index bytes accounted for.
    pub fn bytes_total(&self) -> u64 {
        self.bytes_signature + self.bytes_records
    }

    pub fn merge(&mut self, other: &DecodeCounters) {
        self.records += other.records;
        self.directories += other.directories;
        self.regular_files += other.regular_files;
        self.symlinks += other.symlinks;
        self.other_entries += other.other_entries;
        self.properties += other.properties;
        self.hashed_records += other.hashed_records;
        self.bytes_declared = self.bytes_declared.saturating_add(other.bytes_declared);
        self.bytes_signature += other.bytes_signature;
        self.bytes_records += other.bytes_records;
    }
}

impl AddAssign for DecodeCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
