//! Snapshot schema definitions for persisted call trees.
//!
//! This module defines the structure of the snapshot file written by the
//! collect step and read back by report-only runs.
//! Schema is versioned to allow future evolution.

use super::event::TraceEvent;
use serde::{Deserialize, Serialize};

/// Key of a top-level trace: the call site it started at
///
/// Derived ordering (line, then file) is the total order used for keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CallIdentity {
    pub line: u32,
    pub file: String,
}

impl CallIdentity {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            line,
            file: file.into(),
        }
    }
}

impl From<&TraceEvent> for CallIdentity {
    fn from(event: &TraceEvent) -> Self {
        Self::new(event.file.clone(), event.line)
    }
}

/// Top-level snapshot structure written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the snapshot was collected
    pub generated_at: String,

    /// Sum of the cumulative durations of all top-level traces
    pub total_duration: f64,

    /// Top-level traces in execution order
    pub traces: Vec<SnapshotEntry>,
}

/// One top-level trace with its identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub identity: CallIdentity,
    pub trace: StoredTrace,
}

/// Persisted form of a call tree node
///
/// Parent links are not stored; depth is implied by the nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTrace {
    pub file: String,
    pub line: u32,
    pub code: String,

    /// Time attributed to this call alone
    pub own_duration: f64,

    /// Own duration plus every descendant's own duration
    pub duration: f64,

    /// Nested calls in execution order
    #[serde(default)]
    pub subtraces: Vec<StoredTrace>,
}

impl StoredTrace {
    /// Identity of the call site of this node
    pub fn identity(&self) -> CallIdentity {
        CallIdentity::new(self.file.clone(), self.line)
    }

    /// Number of nodes in this subtree, this one included
    pub fn node_count(&self) -> usize {
        1 + self.subtraces.iter().map(StoredTrace::node_count).sum::<usize>()
    }

    /// Depth of this subtree (1 for a leaf)
    pub fn depth(&self) -> usize {
        1 + self
            .subtraces
            .iter()
            .map(StoredTrace::depth)
            .max()
            .unwrap_or(0)
    }
}
