//! Build a call tree from an ordered event stream.
//!
//! A call's duration is only known once the next event starts, so the
//! builder always holds one pending event and attaches it when its
//! successor arrives. [`TreeBuilder::finish`] flushes the last one with a
//! tiny closing duration.

use super::call_tree::{CallTree, NodeId};
use super::nesting::{resolve_parent, NestingMode};
use crate::parser::event::TraceEvent;
use crate::utils::config::CLOSING_EPSILON;
use crate::utils::error::BuildError;
use log::{debug, trace, warn};

#[derive(Debug)]
enum BuilderState {
    AwaitingFirstEvent,
    Building { pending: TraceEvent },
}

/// Incremental call tree builder, one per run
///
/// **Public** - fed event by event by the collect step
#[derive(Debug)]
pub struct TreeBuilder {
    mode: NestingMode,
    tree: CallTree,
    state: BuilderState,
    last: Option<NodeId>,
    clamped: usize,
}

impl TreeBuilder {
    pub fn new(mode: NestingMode) -> Self {
        Self {
            mode,
            tree: CallTree::new(),
            state: BuilderState::AwaitingFirstEvent,
            last: None,
            clamped: 0,
        }
    }

    /// Feed the next event of the stream
    ///
    /// # Errors
    /// Fails on corrupt nesting of the pending event; the run must be
    /// abandoned.
    pub fn push(&mut self, event: TraceEvent) -> Result<(), BuildError> {
        let next_start = event.timestamp;
        let previous = std::mem::replace(&mut self.state, BuilderState::Building { pending: event });

        if let BuilderState::Building { pending } = previous {
            let mut own_duration = next_start - pending.timestamp;
            if own_duration < 0.0 {
                self.clamped += 1;
                own_duration = 0.0;
            }
            self.insert(pending, own_duration)?;
        }

        Ok(())
    }

    /// Close the stream and return the forest
    pub fn finish(mut self) -> Result<CallTree, BuildError> {
        let state = std::mem::replace(&mut self.state, BuilderState::AwaitingFirstEvent);
        if let BuilderState::Building { pending } = state {
            self.insert(pending, CLOSING_EPSILON)?;
        }

        if self.clamped > 0 {
            warn!("Clamped {} negative durations to zero", self.clamped);
        }
        debug!(
            "Built call tree: {} calls, {} top-level traces",
            self.tree.len(),
            self.tree.roots().len()
        );

        Ok(self.tree)
    }

    /// Number of non-monotonic timestamps seen so far
    pub fn clamped_durations(&self) -> usize {
        self.clamped
    }

    fn insert(&mut self, event: TraceEvent, own_duration: f64) -> Result<(), BuildError> {
        let parent = resolve_parent(self.mode, &self.tree, self.last, &event)?;

        if parent.is_none() {
            trace!("Top-level trace at {}({})", event.file, event.line);
        }

        self.last = Some(self.tree.attach(parent, event, own_duration));
        Ok(())
    }
}

/// Build a call tree from a complete event sequence
///
/// **Public** - convenience wrapper around [`TreeBuilder`]
pub fn build_call_tree(
    events: impl IntoIterator<Item = TraceEvent>,
    mode: NestingMode,
) -> Result<CallTree, BuildError> {
    let mut builder = TreeBuilder::new(mode);
    for event in events {
        builder.push(event)?;
    }
    builder.finish()
}
