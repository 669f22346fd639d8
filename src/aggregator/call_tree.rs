//! Arena-backed call tree built from a trace.
//!
//! Nodes live in one vector and refer to each other by [`NodeId`]. A
//! child's `parent` is only a lookup handle used to walk upwards; the
//! parent's `children` list is what orders the tree.

use crate::parser::event::TraceEvent;
use crate::parser::schema::{CallIdentity, SnapshotEntry, StoredTrace};

/// Handle of a node inside a [`CallTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One traced call
#[derive(Debug, Clone)]
pub struct TraceNode {
    /// The event this call was created from
    pub info: TraceEvent,

    /// Time until the next event started
    pub own_duration: f64,

    /// `own_duration` plus the own durations of all descendants
    pub duration: f64,

    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// The forest of top-level calls produced by one run
///
/// **Public** - output of the tree builder
#[derive(Debug, Clone, Default)]
pub struct CallTree {
    nodes: Vec<TraceNode>,
    roots: Vec<NodeId>,
}

impl CallTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> &TraceNode {
        &self.nodes[id.0]
    }

    /// Top-level calls in execution order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a call under `parent` (or at the top level) and add its
    /// duration to every ancestor
    ///
    /// **Public** - the only way nodes enter the tree
    pub fn attach(&mut self, parent: Option<NodeId>, info: TraceEvent, own_duration: f64) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TraceNode {
            info,
            own_duration,
            duration: own_duration,
            parent,
            children: Vec::new(),
        });

        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }

        let mut cursor = parent;
        while let Some(ancestor) = cursor {
            let node = &mut self.nodes[ancestor.0];
            node.duration += own_duration;
            cursor = node.parent;
        }

        id
    }

    /// `id` followed by its ancestors up to its top-level call
    pub fn ancestry(&self, id: Option<NodeId>) -> Ancestry<'_> {
        Ancestry { tree: self, cursor: id }
    }

    /// Depth of a node, 1 for top-level calls
    pub fn depth(&self, id: NodeId) -> u32 {
        self.ancestry(Some(id)).count() as u32
    }

    /// Sum of the cumulative durations of all top-level calls
    pub fn total_duration(&self) -> f64 {
        self.roots.iter().map(|id| self.node(*id).duration).sum()
    }

    /// Identity of each top-level call
    pub fn identity(&self, id: NodeId) -> CallIdentity {
        CallIdentity::from(&self.node(id).info)
    }

    /// Detach a subtree into its persisted form
    pub fn to_stored(&self, id: NodeId) -> StoredTrace {
        let node = self.node(id);
        StoredTrace {
            file: node.info.file.clone(),
            line: node.info.line,
            code: node.info.code.clone(),
            own_duration: node.own_duration,
            duration: node.duration,
            subtraces: node.children.iter().map(|c| self.to_stored(*c)).collect(),
        }
    }

    /// All top-level calls in their persisted form
    pub fn to_entries(&self) -> Vec<SnapshotEntry> {
        self.roots
            .iter()
            .map(|id| SnapshotEntry {
                identity: self.identity(*id),
                trace: self.to_stored(*id),
            })
            .collect()
    }
}

/// Iterator produced by [`CallTree::ancestry`]
pub struct Ancestry<'a> {
    tree: &'a CallTree,
    cursor: Option<NodeId>,
}

impl<'a> Iterator for Ancestry<'a> {
    type Item = (NodeId, &'a TraceNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let node = self.tree.node(id);
        self.cursor = node.parent;
        Some((id, node))
    }
}
