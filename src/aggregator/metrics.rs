//! Calculate summary metrics and hot traces from collected call trees.
//!
//! Hot traces are the top-level calls that take the most time.
//! These are the primary targets when a configure step is slow.

use crate::parser::schema::{CallIdentity, SnapshotEntry};
use log::debug;

/// A top-level trace ranked by duration
#[derive(Debug, Clone, PartialEq)]
pub struct HotTrace {
    pub identity: CallIdentity,

    /// Rendered call that opened the trace
    pub code: String,

    /// Cumulative duration in seconds
    pub duration: f64,

    /// Percentage of the whole run
    pub percentage: f64,
}

/// Calculate the hottest top-level traces
///
/// **Public** - main entry point for metrics calculation
///
/// # Arguments
/// * `entries` - Top-level traces of a snapshot
/// * `total_duration` - Duration of the whole run
/// * `top_n` - Number of traces to return
///
/// # Returns
/// Vector of hot traces, sorted by duration (descending)
pub fn calculate_hot_traces(
    entries: &[SnapshotEntry],
    total_duration: f64,
    top_n: usize,
) -> Vec<HotTrace> {
    debug!("Calculating top {} hot traces from {} traces", top_n, entries.len());

    let mut ranked: Vec<&SnapshotEntry> = entries.iter().collect();
    ranked.sort_by(|a, b| b.trace.duration.total_cmp(&a.trace.duration));

    ranked
        .into_iter()
        .take(top_n)
        .map(|entry| create_hot_trace(entry, total_duration))
        .collect()
}

/// Create a HotTrace from a snapshot entry
pub fn create_hot_trace(entry: &SnapshotEntry, total_duration: f64) -> HotTrace {
    let percentage = if total_duration > 0.0 {
        entry.trace.duration / total_duration * 100.0
    } else {
        0.0
    };

    HotTrace {
        identity: entry.identity.clone(),
        code: entry.trace.code.clone(),
        duration: entry.trace.duration,
        percentage,
    }
}

/// Calculate duration distribution statistics
///
/// **Public** - provides summary statistics
pub fn calculate_duration_distribution(entries: &[SnapshotEntry]) -> DurationDistribution {
    if entries.is_empty() {
        return DurationDistribution::default();
    }

    let total: f64 = entries.iter().map(|e| e.trace.duration).sum();
    let count = entries.len();

    let mut durations: Vec<f64> = entries.iter().map(|e| e.trace.duration).collect();
    durations.sort_by(f64::total_cmp);

    DurationDistribution {
        total_duration: total,
        trace_count: count,
        call_count: entries.iter().map(|e| e.trace.node_count()).sum(),
        max_depth: entries.iter().map(|e| e.trace.depth()).max().unwrap_or(0),
        mean_duration: total / count as f64,
        median_duration: durations[count / 2],
    }
}

/// Duration distribution statistics
///
/// **Public** - returned from calculate_duration_distribution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DurationDistribution {
    /// Seconds across all top-level traces
    pub total_duration: f64,

    /// Number of top-level traces
    pub trace_count: usize,

    /// Number of calls at any depth
    pub call_count: usize,

    /// Deepest nesting seen
    pub max_depth: usize,

    pub mean_duration: f64,
    pub median_duration: f64,
}

impl DurationDistribution {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "Total: {:.6}s | Traces: {} | Calls: {} | Max depth: {} | Mean: {:.6}s | Median: {:.6}s",
            self.total_duration,
            self.trace_count,
            self.call_count,
            self.max_depth,
            self.mean_duration,
            self.median_duration
        )
    }
}
