//! Configuration and constants for the CLI.

/// Default location of the persisted snapshot
pub const DEFAULT_SHELF_FILE: &str = "cmake.traces";

/// Current snapshot schema version
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// Spaces of report indentation per nesting level
pub const INDENT_STEP: usize = 2;

/// Duration given to the last event of a stream, which has no successor.
/// 1 microsecond, small enough to never dominate a report.
pub const CLOSING_EPSILON: f64 = 1e-6;

// CMake 3.17 reports `else` and `elseif` one frame shallower than the
// enclosing `if`, so their declared nesting is bumped by one.
pub const NESTING_BUG_COMMANDS: &[&str] = &["else", "elseif"];

/// Narrowest file column that still fits `x...y` when eliding paths
pub const MIN_ELIDED_FILE_WIDTH: usize = 5;

/// Prefix for rejected trace lines echoed to the diagnostic stream
pub const IGNORED_PREFIX: &str = "Ignored: ";

/// Number of hottest traces shown in debug output
pub const HOT_TRACE_LOG_COUNT: usize = 3;
