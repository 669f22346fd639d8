//! Persistence of collected call trees.
//!
//! This module handles writing snapshots to disk and reading them back
//! for report-only runs.

pub mod snapshot;

// Re-export main functions
pub use snapshot::{read_snapshot, write_snapshot, SnapshotStore};

use crate::utils::error::StoreError;
use std::path::Path;

/// Common path validation for snapshot files
pub fn validate_path(path: &Path) -> Result<(), StoreError> {
    if path.as_os_str().is_empty() {
        return Err(StoreError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(StoreError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
