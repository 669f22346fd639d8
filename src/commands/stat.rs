//! Stat command implementation.
//!
//! The stat command:
//! 1. Opens the snapshot (fresh for collection, existing for report-only)
//! 2. Reads and normalizes the trace log
//! 3. Builds the call tree
//! 4. Persists the snapshot, or removes it if anything failed
//! 5. Calculates summary metrics
//! 6. Renders the report

use super::models::StatArgs;
use crate::aggregator::{calculate_duration_distribution, calculate_hot_traces, CallTree, NestingMode, TreeBuilder};
use crate::output::SnapshotStore;
use crate::parser::{TraceFormat, TraceReader};
use crate::report::render_report;
use crate::utils::config::{HOT_TRACE_LOG_COUNT, MIN_ELIDED_FILE_WIDTH};
use anyhow::{Context, Result};
use log::{debug, info};
use std::io::{BufRead, Write};
use std::time::Instant;

/// Execute the stat command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Stat command arguments
/// * `input` - Trace log (unused in report-only mode)
/// * `diagnostics` - Sink for rejected trace lines
///
/// # Returns
/// The rendered report
///
/// # Errors
/// * Corrupt nesting in the trace log
/// * I/O failures reading the log or writing the snapshot
///
/// In collection mode no snapshot survives a failure.
pub fn execute_stat<R: BufRead, W: Write>(args: &StatArgs, input: R, diagnostics: W) -> Result<String> {
    let start_time = Instant::now();

    let store = if args.report_only {
        info!("Step 1/3: Loading snapshot from {}", args.shelf_file.display());
        SnapshotStore::open(&args.shelf_file)
            .with_context(|| format!("Failed to load snapshot {}", args.shelf_file.display()))?
    } else {
        info!("Step 1/3: Collecting trace into {}", args.shelf_file.display());
        let store = SnapshotStore::create(&args.shelf_file)
            .with_context(|| format!("Failed to reset snapshot {}", args.shelf_file.display()))?;
        collect_into(store, input, diagnostics, args.format, args.nesting_mode())?
    };

    // Step 2: Summary metrics
    info!("Step 2/3: Calculating metrics...");
    let distribution = calculate_duration_distribution(store.entries());
    info!("Duration distribution: {}", distribution.summary());

    let hot_traces = calculate_hot_traces(store.entries(), store.total_duration(), HOT_TRACE_LOG_COUNT);
    for (i, hot) in hot_traces.iter().enumerate() {
        debug!(
            "  {}. {:.6}s ({:.1}%): {}({}): {}",
            i + 1,
            hot.duration,
            hot.percentage,
            hot.identity.file,
            hot.identity.line,
            hot.code
        );
    }

    // Step 3: Report
    info!("Step 3/3: Rendering report...");
    let report = render_report(store.entries(), &args.report_config());

    info!("Stat completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(report)
}

/// Collect a trace log into a fresh store and persist it
///
/// **Private** - on any failure the store's file is removed
fn collect_into<R: BufRead, W: Write>(
    mut store: SnapshotStore,
    input: R,
    diagnostics: W,
    format: TraceFormat,
    mode: NestingMode,
) -> Result<SnapshotStore> {
    let collected = collect_call_tree(input, diagnostics, format, mode).and_then(|tree| {
        store.put_forest(&tree);
        store.persist().context("Failed to write snapshot")
    });

    match collected {
        Ok(()) => Ok(store),
        Err(err) => {
            store
                .discard()
                .context("Failed to remove incomplete snapshot")?;
            Err(err)
        }
    }
}

/// Read a whole trace log into a call tree
///
/// **Public** - usable without a snapshot file
pub fn collect_call_tree<R: BufRead, W: Write>(
    input: R,
    diagnostics: W,
    format: TraceFormat,
    mode: NestingMode,
) -> Result<CallTree> {
    let mut reader = TraceReader::new(input, diagnostics, format, mode.reads_declared());
    let mut builder = TreeBuilder::new(mode);
    let mut events = 0usize;

    for event in reader.by_ref() {
        let event = event.context("Failed to read trace log")?;
        builder.push(event).context("Trace log is corrupted")?;
        events += 1;
    }

    debug!("Read {} events, ignored {} lines", events, reader.ignored_lines());

    builder.finish().context("Trace log is corrupted")
}

/// Validate stat arguments
///
/// **Public** - can be called before execute_stat for early validation
pub fn validate_args(args: &StatArgs) -> Result<()> {
    if args.shelf_file.as_os_str().is_empty() {
        anyhow::bail!("Shelf file path cannot be empty");
    }

    if !args.threshold.is_finite() || args.threshold < 0.0 {
        anyhow::bail!("Threshold must be a non-negative number");
    }

    if let Some(width) = args.trace_info_width {
        if width < MIN_ELIDED_FILE_WIDTH {
            anyhow::bail!("Trace info width must be at least {}", MIN_ELIDED_FILE_WIDTH);
        }
    }

    Ok(())
}
