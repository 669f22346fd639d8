//! Snapshot store for collected call trees.
//!
//! A single JSON file holds every top-level trace of a run. Collection
//! starts by removing any previous file and writes the new one through a
//! temporary file, so a reader never sees a half-written snapshot.

use super::validate_path;
use crate::aggregator::CallTree;
use crate::parser::schema::{CallIdentity, Snapshot, SnapshotEntry, StoredTrace};
use crate::utils::config::SNAPSHOT_VERSION;
use crate::utils::error::StoreError;
use chrono::Utc;
use log::{debug, info};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File-backed mapping from call identity to collected trace
///
/// **Public** - used by the stat command in both run modes
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    snapshot: Snapshot,
}

impl SnapshotStore {
    /// Start a fresh collection at `path`, discarding any previous snapshot
    ///
    /// # Errors
    /// * `StoreError::InvalidPath` - Path is empty or a directory
    /// * `StoreError::Io` - Previous snapshot cannot be removed
    pub fn create(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        validate_path(path)?;

        if path.exists() {
            debug!("Removing previous snapshot: {}", path.display());
            fs::remove_file(path)?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            snapshot: empty_snapshot(),
        })
    }

    /// Open the snapshot at `path` for reporting; a missing file is empty
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        validate_path(path)?;

        let snapshot = if path.exists() {
            read_snapshot(path)?
        } else {
            info!("No snapshot at {}, nothing to report", path.display());
            empty_snapshot()
        };

        Ok(Self {
            path: path.to_path_buf(),
            snapshot,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Store a trace under `identity`, replacing an existing entry in place
    pub fn put(&mut self, identity: CallIdentity, trace: StoredTrace) {
        match self
            .snapshot
            .traces
            .iter_mut()
            .find(|entry| entry.identity == identity)
        {
            Some(entry) => entry.trace = trace,
            None => self.snapshot.traces.push(SnapshotEntry { identity, trace }),
        }
        self.refresh_total();
    }

    /// Store every top-level trace of a run, in execution order
    ///
    /// Top-level calls sharing a call site (a loop at file scope) stay
    /// separate entries so the forest reloads exactly as collected.
    pub fn put_forest(&mut self, tree: &CallTree) {
        self.snapshot.traces.extend(tree.to_entries());
        self.refresh_total();
    }

    /// Trace stored under `identity`
    pub fn get(&self, identity: &CallIdentity) -> Option<&StoredTrace> {
        self.snapshot
            .traces
            .iter()
            .find(|entry| &entry.identity == identity)
            .map(|entry| &entry.trace)
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.snapshot.traces
    }

    pub fn total_duration(&self) -> f64 {
        self.snapshot.total_duration
    }

    /// Write the snapshot to its file
    ///
    /// # Errors
    /// On failure the target file is left absent or untouched, never
    /// partially written.
    pub fn persist(&mut self) -> Result<(), StoreError> {
        self.snapshot.generated_at = Utc::now().to_rfc3339();
        write_snapshot(&self.snapshot, &self.path)
    }

    /// Drop the snapshot and remove its file if one exists
    pub fn discard(self) -> Result<(), StoreError> {
        if self.path.exists() {
            info!("Removing snapshot: {}", self.path.display());
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn refresh_total(&mut self) {
        self.snapshot.total_duration = self
            .snapshot
            .traces
            .iter()
            .map(|entry| entry.trace.duration)
            .sum();
    }
}

fn empty_snapshot() -> Snapshot {
    Snapshot {
        version: SNAPSHOT_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        total_duration: 0.0,
        traces: Vec::new(),
    }
}

/// Write a snapshot to a JSON file via write-then-rename
///
/// **Public** - low level writer used by `SnapshotStore::persist`
///
/// # Errors
/// * `StoreError::InvalidPath` - Path cannot be created or is invalid
/// * `StoreError::Io` - I/O error during write
/// * `StoreError::SerializationFailed` - JSON serialization error
/// * `StoreError::PersistFailed` - Rename over the target failed
pub fn write_snapshot(snapshot: &Snapshot, output_path: impl AsRef<Path>) -> Result<(), StoreError> {
    let output_path = output_path.as_ref();
    validate_path(output_path)?;

    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            if !parent.exists() {
                debug!("Creating parent directories: {}", parent.display());
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::InvalidPath(format!("Cannot create directory {}: {}", parent.display(), e))
                })?;
            }
            parent
        }
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        serde_json::to_writer(&mut writer, snapshot)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(output_path)?;

    info!(
        "Snapshot written to {} ({} traces)",
        output_path.display(),
        snapshot.traces.len()
    );

    Ok(())
}

/// Read a snapshot from a JSON file
///
/// **Public** - low level reader used by `SnapshotStore::open`
///
/// # Errors
/// * `StoreError::Io` - File read error
/// * `StoreError::SerializationFailed` - JSON parse error
/// * `StoreError::UnsupportedVersion` - Written by an incompatible schema
pub fn read_snapshot(input_path: impl AsRef<Path>) -> Result<Snapshot, StoreError> {
    let input_path = input_path.as_ref();

    debug!("Reading snapshot from: {}", input_path.display());

    let file = File::open(input_path)?;
    let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;

    if major_version(&snapshot.version) != major_version(SNAPSHOT_VERSION) {
        return Err(StoreError::UnsupportedVersion(snapshot.version));
    }

    debug!(
        "Snapshot loaded: version {}, {} traces, generated at {}",
        snapshot.version,
        snapshot.traces.len(),
        snapshot.generated_at
    );

    Ok(snapshot)
}

fn major_version(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}
