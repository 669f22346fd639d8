//! Text reports of collected call trees.
//!
//! This module handles:
//! - Walking the forest with depth and threshold cut-offs
//! - Optional duration ordering and single-hottest-trace mode
//! - Formatting each line, optionally with a fixed-width location column

pub mod renderer;
pub mod trace_info;

// Re-export main types and functions
pub use renderer::{render_lines, render_report, ReportConfig};
pub use trace_info::format_trace_info;
