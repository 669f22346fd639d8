//! Trace parsing and schema definitions.
//!
//! This module handles:
//! - Parsing raw trace lines from CMake (json-v1 and flat text)
//! - Correcting known nesting defects of the producer
//! - Streaming events out of a log while reporting rejected lines
//! - Defining the persisted snapshot schema

pub mod event;
pub mod human;
pub mod json_v1;
pub mod reader;
pub mod schema;

// Re-export main types
pub use event::{normalize_line, TraceEvent, TraceFormat};
pub use reader::TraceReader;
pub use schema::{CallIdentity, Snapshot, SnapshotEntry, StoredTrace};
