//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that reject a single trace line
///
/// None of these abort a run: the line is reported and skipped.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for field '{field}': {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("Line does not match the trace grammar")]
    Unmatched,

    #[error("Nesting level {0} is below the top level")]
    InvalidNesting(i64),

    #[error("Trace format header (version {major}.{minor})")]
    VersionHeader { major: u64, minor: u64 },
}

/// Errors that make a collected trace unusable
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Frames nesting increased by more than 1 (from {from} to {to}) at {file}({line})")]
    NestingJump {
        from: u32,
        to: u32,
        file: String,
        line: u32,
    },

    #[error("Nested call at {file}({line}) has no enclosing call")]
    MissingParent { file: String, line: u32 },

    #[error("Trace line {file}({line}) carries no nesting level")]
    MissingNesting { file: String, line: u32 },
}

/// Errors that can occur while reading or writing the snapshot file
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize snapshot: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to move snapshot into place: {0}")]
    PersistFailed(#[from] tempfile::PersistError),

    #[error("Invalid snapshot path: {0}")]
    InvalidPath(String),

    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(String),
}
