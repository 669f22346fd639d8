use crate::aggregator::NestingMode;
use crate::parser::TraceFormat;
use crate::report::ReportConfig;
use crate::utils::config::DEFAULT_SHELF_FILE;
use std::path::PathBuf;

/// Arguments for the stat command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct StatArgs {
    /// Snapshot file to collect into or report from
    pub shelf_file: PathBuf,

    /// Skip collection and report from the existing snapshot
    pub report_only: bool,

    /// Minimum share of the whole run for a call to be reported
    pub threshold: f64,

    /// Deepest level reported, 0 for unlimited
    pub depth: usize,

    /// Rebuild nesting from source locations instead of CMake frames
    pub ignore_nesting: bool,

    /// Fixed width of the nesting/file/line column
    pub trace_info_width: Option<usize>,

    /// Order sibling calls by duration
    pub sort_traces: bool,

    /// Report only the most expensive top-level trace
    pub one: bool,

    /// Grammar of the trace log
    pub format: TraceFormat,
}

impl Default for StatArgs {
    fn default() -> Self {
        Self {
            shelf_file: PathBuf::from(DEFAULT_SHELF_FILE),
            report_only: false,
            threshold: 0.0,
            depth: 0,
            ignore_nesting: false,
            trace_info_width: None,
            sort_traces: false,
            one: false,
            format: TraceFormat::JsonV1,
        }
    }
}

impl StatArgs {
    pub fn nesting_mode(&self) -> NestingMode {
        if self.ignore_nesting {
            NestingMode::Heuristic
        } else {
            NestingMode::Declared
        }
    }

    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            threshold: self.threshold,
            max_depth: self.depth,
            sort_traces: self.sort_traces,
            only_hottest: self.one,
            trace_info_width: self.trace_info_width,
        }
    }
}
