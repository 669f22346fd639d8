//! Structured trace events and line normalization.
//!
//! Every input line goes through [`normalize_line`], which dispatches to the
//! grammar selected for the run and applies the nesting correction for
//! commands CMake reports at the wrong frame.

use super::{human, json_v1};
use crate::utils::config::NESTING_BUG_COMMANDS;
use crate::utils::error::ParseError;

/// Trace line grammar used by a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TraceFormat {
    /// One JSON record per line (`cmake --trace-format=json-v1`)
    #[default]
    #[value(name = "json-v1")]
    JsonV1,
    /// `(<time>) (<nesting>) <file>(<line>):  <code>` per line
    Human,
}

/// One parsed trace line
///
/// **Public** - produced by the parser, consumed by the tree builder
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEvent {
    /// Seconds, expected to be non-decreasing across the stream
    pub timestamp: f64,

    /// Frame depth reported by CMake (1 = top level), after correction.
    /// `None` when nesting is reconstructed heuristically.
    pub declared_nesting: Option<u32>,

    /// Script the traced line belongs to
    pub file: String,

    /// Line number within `file`
    pub line: u32,

    /// Rendered call, e.g. `set("A" "1")`
    pub code: String,
}

impl TraceEvent {
    /// Create an event without a declared nesting level
    pub fn new(timestamp: f64, file: impl Into<String>, line: u32, code: impl Into<String>) -> Self {
        Self {
            timestamp,
            declared_nesting: None,
            file: file.into(),
            line,
            code: code.into(),
        }
    }

    /// Attach a declared nesting level
    pub fn with_nesting(mut self, nesting: u32) -> Self {
        self.declared_nesting = Some(nesting);
        self
    }
}

/// Parse one raw trace line into an event
///
/// **Public** - main entry point of the normalizer
///
/// # Arguments
/// * `line` - Raw line without its trailing newline
/// * `format` - Grammar selected for the run
/// * `read_nesting` - Whether the declared nesting is read and validated
///
/// # Errors
/// Any `ParseError` means the line is not part of the event stream.
pub fn normalize_line(
    line: &str,
    format: TraceFormat,
    read_nesting: bool,
) -> Result<TraceEvent, ParseError> {
    match format {
        TraceFormat::JsonV1 => json_v1::parse_record(line, read_nesting),
        TraceFormat::Human => human::parse_line(line, read_nesting),
    }
}

/// Validate a raw frame value and compensate CMake's `else`/`elseif` defect
///
/// **Public** - shared by both grammars
pub fn correct_nesting(command: &str, raw_nesting: i64) -> Result<u32, ParseError> {
    let bumped = NESTING_BUG_COMMANDS
        .iter()
        .any(|bugged| command.eq_ignore_ascii_case(bugged));

    let nesting = if bumped { raw_nesting + 1 } else { raw_nesting };

    if nesting < 1 {
        return Err(ParseError::InvalidNesting(nesting));
    }

    u32::try_from(nesting).map_err(|_| ParseError::InvalidNesting(nesting))
}

/// Render a command and its arguments the way reports display it
pub fn render_call(command: &str, args: &[String]) -> String {
    if args.is_empty() {
        format!("{}()", command)
    } else {
        format!("{}(\"{}\")", command, args.join("\" \""))
    }
}
