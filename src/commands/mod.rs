//! CLI command implementations.
//!
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod stat;

// Re-export main command functions
pub use models::StatArgs;
pub use stat::{collect_call_tree, execute_stat, validate_args};
