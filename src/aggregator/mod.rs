//! Aggregation of trace events into call trees and metrics.
//!
//! This module transforms the parsed event stream into:
//! - A call tree with per-call cumulative durations
//! - Nesting decisions (declared or reconstructed)
//! - Duration distribution and hot trace statistics

pub mod call_tree;
pub mod metrics;
pub mod nesting;
pub mod tree_builder;

// Re-export main types and functions
pub use call_tree::{CallTree, NodeId, TraceNode};
pub use metrics::{calculate_duration_distribution, calculate_hot_traces, DurationDistribution, HotTrace};
pub use nesting::NestingMode;
pub use tree_builder::{build_call_tree, TreeBuilder};
