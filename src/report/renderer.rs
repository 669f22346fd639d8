//! Render a collected forest as an indented text report.
//!
//! One line per visited call:
//! `<indent>[<depth>]<file>(<line>):  <code> (<seconds>sec)(<percent>%)`

use super::trace_info::format_trace_info;
use crate::parser::schema::{SnapshotEntry, StoredTrace};
use crate::utils::config::INDENT_STEP;

/// Rendering options
///
/// **Public** - built by the stat command from CLI arguments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportConfig {
    /// Minimum share of the whole run (0.01 = 1%) for a call to be shown
    pub threshold: f64,

    /// Deepest level shown, 0 for unlimited
    pub max_depth: usize,

    /// Order sibling calls by duration, longest first
    pub sort_traces: bool,

    /// Only report the most expensive top-level trace
    pub only_hottest: bool,

    /// Fixed width of the depth/file/line column
    pub trace_info_width: Option<usize>,
}

struct RenderContext<'a> {
    config: &'a ReportConfig,
    total_duration: f64,
    lines: Vec<String>,
}

/// Render the report as individual lines
///
/// **Public** - main entry point for reporting
///
/// # Arguments
/// * `entries` - Top-level traces in execution order
/// * `config` - Threshold, depth, ordering and layout options
pub fn render_lines(entries: &[SnapshotEntry], config: &ReportConfig) -> Vec<String> {
    let mut ctx = RenderContext {
        config,
        total_duration: entries.iter().map(|e| e.trace.duration).sum(),
        lines: Vec::new(),
    };

    let top_level: Vec<&StoredTrace> = if config.only_hottest {
        hottest(entries).into_iter().collect()
    } else {
        entries.iter().map(|e| &e.trace).collect()
    };

    render_level(&mut ctx, top_level, 1);
    ctx.lines
}

/// Render the report as one string, one line per call
pub fn render_report(entries: &[SnapshotEntry], config: &ReportConfig) -> String {
    let mut report = String::new();
    for line in render_lines(entries, config) {
        report.push_str(&line);
        report.push('\n');
    }
    report
}

/// The longest top-level trace, the earliest one on ties
fn hottest(entries: &[SnapshotEntry]) -> Option<&StoredTrace> {
    entries
        .iter()
        .map(|e| &e.trace)
        .reduce(|best, t| if t.duration > best.duration { t } else { best })
}

fn render_level(ctx: &mut RenderContext<'_>, mut traces: Vec<&StoredTrace>, depth: usize) {
    if ctx.config.max_depth != 0 && depth > ctx.config.max_depth {
        return;
    }

    if ctx.config.sort_traces {
        traces.sort_by(|a, b| b.duration.total_cmp(&a.duration));
    }

    for trace in traces {
        let share = if ctx.total_duration > 0.0 {
            trace.duration / ctx.total_duration
        } else {
            0.0
        };

        if share < ctx.config.threshold {
            // Sorted siblings after this one are shorter still
            if ctx.config.sort_traces {
                break;
            }
            continue;
        }

        ctx.lines.push(format!(
            "{}{} ({:.6}sec)({:.2}%)",
            " ".repeat((depth - 1) * INDENT_STEP),
            format_trace_info(trace, depth, ctx.config.trace_info_width),
            trace.duration,
            share * 100.0
        ));

        render_level(ctx, trace.subtraces.iter().collect(), depth + 1);
    }
}
