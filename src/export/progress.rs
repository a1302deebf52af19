//! Export counters and the run summary written to `manifest.json`.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RowFormat, TrackerPolicy};

/// Live counters, safe to read from another thread while an export runs.
#[derive(Debug, Default)]
pub struct ExportProgress {
    axioms_received: AtomicU64,
    axioms: AtomicU64,
    node_rows: AtomicU64,
    edge_rows: AtomicU64,
    duplicates_skipped: AtomicU64,
    bytes_written: AtomicU64,
    tracked: AtomicU64,
}

/// Point-in-time copy of [`ExportProgress`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Axioms taken from the input, including one that then failed.
    pub axioms_received: u64,
    /// Axioms whose rows were all written.
    pub axioms: u64,
    pub node_rows: u64,
    pub edge_rows: u64,
    pub duplicates_skipped: u64,
    pub bytes_written: u64,
    /// Keys held by the membership tracker.
    pub tracked: u64,
}

impl ProgressSnapshot {
    pub fn rows(&self) -> u64 {
        self.node_rows + self.edge_rows
    }
}

impl ExportProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn axiom_received(&self) {
        self.axioms_received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn axiom_done(&self) {
        self.axioms.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn node_row(&self, bytes: u64) {
        self.node_rows.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn edge_row(&self, bytes: u64) {
        self.edge_rows.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn duplicate(&self) {
        self.duplicates_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the tracker size. Tracker sizes never shrink, so a stale
    /// reading from a slower worker is ignored.
    pub(crate) fn tracked(&self, len: u64) {
        self.tracked.fetch_max(len, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            axioms_received: self.axioms_received.load(Ordering::Relaxed),
            axioms: self.axioms.load(Ordering::Relaxed),
            node_rows: self.node_rows.load(Ordering::Relaxed),
            edge_rows: self.edge_rows.load(Ordering::Relaxed),
            duplicates_skipped: self.duplicates_skipped.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            tracked: self.tracked.load(Ordering::Relaxed),
        }
    }
}

/// What a finished export produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub format: RowFormat,
    pub tracker: TrackerPolicy,
    /// Set when a bounded tracker evicted keys: the output may hold
    /// duplicate rows for reusable objects.
    pub tracker_evicted: bool,
    #[serde(flatten)]
    pub counts: ProgressSnapshot,
    pub files: Vec<String>,
}

impl ExportSummary {
    pub const MANIFEST: &'static str = "manifest.json";

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
