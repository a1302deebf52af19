//! # Bulk export
//!
//! Turns a stream of axioms into deduplicated node and edge rows for an
//! offline loader such as `neo4j-admin database import`, which has no
//! upsert of its own.
//!
//! ```text
//! Axiom ──translate──► Translation ──► rows ──► MembershipTracker ──► RowSink
//!                                            (reusable rows only)
//! ```
//!
//! A reusable node is keyed by its `NodeId`, a reusable edge by
//! `(from, to, label)`. Rows that touch an axiom-private node are unique
//! by construction and bypass the tracker.

mod pipeline;
mod progress;
mod sink;
mod staging;
mod tracker;

use serde::{Deserialize, Serialize};

pub use pipeline::{export_to_dir, BulkExporter};
pub use progress::{ExportProgress, ExportSummary, ProgressSnapshot};
pub use sink::{CsvRowSink, JsonLinesRowSink, RowSink};
pub use staging::StagedOutput;
pub use tracker::{BoundedTracker, ExactTracker, MembershipTracker, TrackKey, tracker_for};

/// How reusable rows are remembered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum TrackerPolicy {
    /// Every key is kept. Memory grows with the number of distinct
    /// reusable objects; never emits a duplicate row.
    #[default]
    Exact,
    /// At most `capacity` keys are kept, least recently used evicted first.
    /// Once eviction starts a duplicate row may be emitted.
    Bounded { capacity: usize },
}

/// Row file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowFormat {
    /// One file per node label and per edge label, `neo4j-admin` headers.
    #[default]
    Csv,
    /// A single `rows.jsonl`.
    JsonLines,
}
