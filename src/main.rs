//! CMake Trace Stat CLI
//!
//! Turns a CMake trace log into a call-tree timing report.
//!
//! Each report line reads
//! `[nesting]file_path(line_number):  cmake_code (seconds)(percentage)`.
//! Trace lines that are not recognized are echoed to stderr prefixed with
//! `Ignored: `; the report itself goes to stdout.

use anyhow::{Context, Result};
use clap::Parser;
use cmake_trace_stat::commands::{execute_stat, validate_args, StatArgs};
use cmake_trace_stat::parser::TraceFormat;
use cmake_trace_stat::utils::config::DEFAULT_SHELF_FILE;
use env_logger::Env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

/// CMake Trace Stat - call-tree profiling for CMake scripts
#[derive(Parser, Debug)]
#[command(name = "cmake-trace-stat")]
#[command(version, about, long_about = None)]
struct Cli {
    /// CMake trace log, stdin when omitted or `-`
    trace: Option<PathBuf>,

    /// Snapshot file to collect stats into (or report from)
    #[arg(short = 'f', long, default_value = DEFAULT_SHELF_FILE)]
    shelf_file: PathBuf,

    /// Do not collect stats, report from the existing snapshot
    #[arg(short, long)]
    report_only: bool,

    /// Do not report traces below this share of the whole run (0.01 = 1%)
    #[arg(short, long, default_value_t = 0.0)]
    threshold: f64,

    /// Do not report traces deeper than this (0 = unlimited)
    #[arg(short, long, default_value_t = 0)]
    depth: usize,

    /// Ignore CMake frame numbers and rebuild nesting from file names
    #[arg(long)]
    ignore_nesting: bool,

    /// Fixed width of the nesting/file/line part of each report line
    #[arg(short = 'w', long)]
    trace_info_width: Option<usize>,

    /// Sort nested calls by duration
    #[arg(short, long)]
    sort_traces: bool,

    /// Report only the most expensive top-level trace
    #[arg(short = '1', long)]
    one: bool,

    /// Trace line format
    #[arg(short = 'F', long, value_enum, default_value_t = TraceFormat::JsonV1)]
    format: TraceFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let args = StatArgs {
        shelf_file: cli.shelf_file,
        report_only: cli.report_only,
        threshold: cli.threshold,
        depth: cli.depth,
        ignore_nesting: cli.ignore_nesting,
        trace_info_width: cli.trace_info_width,
        sort_traces: cli.sort_traces,
        one: cli.one,
        format: cli.format,
    };

    // Validate args first
    validate_args(&args)?;

    let input = open_trace(cli.trace.as_ref(), args.report_only)?;
    let report = execute_stat(&args, input, io::stderr().lock())?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(report.as_bytes())?;
    stdout.flush()?;

    Ok(())
}

/// Open the trace log
///
/// **Private** - report-only runs never touch the input
fn open_trace(path: Option<&PathBuf>, report_only: bool) -> Result<Box<dyn BufRead>> {
    if report_only {
        return Ok(Box::new(io::empty()));
    }

    match path {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open trace log {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}
