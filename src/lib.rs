//! CMake Trace Stat
//!
//! Call-tree profiling reports from CMake execution traces.
//!
//! The crate turns a `cmake --trace` log into a forest of calls with
//! cumulative durations, stores it as a snapshot, and renders it as an
//! indented report. It provides the core implementation for the
//! `cmake-trace-stat` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! cmake --trace-format=json-v1 --trace-redirect=trace.json -S . -B build
//! cmake-trace-stat trace.json --threshold 0.01 --sort-traces
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod report;
pub mod utils;
