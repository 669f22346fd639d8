//! Nesting resolution: where does the next call attach?
//!
//! Two strategies, chosen once per run:
//! - `Declared` trusts the frame depth CMake reports for every line.
//! - `Heuristic` rebuilds the call/return structure from source
//!   locations alone, for traces without usable frame information.
//!
//! Both are plain functions of the current tree and the incoming event.

use super::call_tree::{CallTree, NodeId};
use crate::parser::event::TraceEvent;
use crate::utils::error::BuildError;

/// How a run decides the nesting of each call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NestingMode {
    #[default]
    Declared,
    Heuristic,
}

impl NestingMode {
    /// Whether events must carry a declared nesting level
    pub fn reads_declared(self) -> bool {
        self == NestingMode::Declared
    }
}

/// Parent for an event given the most recently attached node
///
/// **Public** - called by the tree builder once per event
pub fn resolve_parent(
    mode: NestingMode,
    tree: &CallTree,
    last: Option<NodeId>,
    event: &TraceEvent,
) -> Result<Option<NodeId>, BuildError> {
    match mode {
        NestingMode::Declared => {
            let level = event.declared_nesting.ok_or_else(|| BuildError::MissingNesting {
                file: event.file.clone(),
                line: event.line,
            })?;
            declared_parent(tree, last, level, event)
        }
        NestingMode::Heuristic => Ok(inferred_parent(tree, last, event)),
    }
}

/// Parent for an event at a declared nesting level
///
/// The depth of every node equals its declared level, so the parent of a
/// level `n` call is the ancestor of `last` at depth `n - 1`. Nesting may
/// drop by any amount but grow by at most one.
pub fn declared_parent(
    tree: &CallTree,
    last: Option<NodeId>,
    level: u32,
    event: &TraceEvent,
) -> Result<Option<NodeId>, BuildError> {
    let current = last.map_or(0, |id| tree.depth(id));

    if level > current + 1 {
        return Err(if current == 0 {
            BuildError::MissingParent {
                file: event.file.clone(),
                line: event.line,
            }
        } else {
            BuildError::NestingJump {
                from: current,
                to: level,
                file: event.file.clone(),
                line: event.line,
            }
        });
    }

    Ok(tree
        .ancestry(last)
        .nth((current + 1 - level) as usize)
        .map(|(id, _)| id))
}

/// One open call as seen by the heuristic
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub file: &'a str,
    pub line: u32,
}

/// Parent for an event when no nesting is reported
pub fn inferred_parent(tree: &CallTree, last: Option<NodeId>, event: &TraceEvent) -> Option<NodeId> {
    let chain = tree.ancestry(last).map(|(id, node)| Frame {
        id,
        parent: node.parent,
        file: &node.info.file,
        line: node.info.line,
    });
    choose_parent(chain, &event.file, event.line)
}

/// Pick where a call at `file:line` attaches, given the open chain
/// (innermost frame first)
///
/// A frame in the same file is assumed to be a sibling: the call attaches
/// next to the closest one by line number, the shallowest winning ties.
/// Without any same-file frame the call is nested in the innermost frame.
/// An empty chain means a top-level call.
pub fn choose_parent<'a>(
    chain: impl IntoIterator<Item = Frame<'a>>,
    file: &str,
    line: u32,
) -> Option<NodeId> {
    let mut closest: Option<(u32, Option<NodeId>)> = None;
    let mut innermost: Option<NodeId> = None;

    for frame in chain {
        if frame.file == file {
            let distance = frame.line.abs_diff(line);
            if closest.map_or(true, |(best, _)| distance <= best) {
                closest = Some((distance, frame.parent));
            }
        } else if innermost.is_none() {
            innermost = Some(frame.id);
        }
    }

    match closest {
        Some((_, parent)) => parent,
        None => innermost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(file: &str, line: u32) -> TraceEvent {
        TraceEvent::new(0.0, file, line, "f()")
    }

    #[test]
    fn test_declared_same_level_is_sibling() {
        let mut tree = CallTree::new();
        let a = tree.attach(None, event("x", 1), 0.0);
        let b = tree.attach(Some(a), event("x", 2), 0.0);

        let parent = declared_parent(&tree, Some(b), 2, &event("x", 3)).unwrap();
        assert_eq!(parent, Some(a));
    }

    #[test]
    fn test_declared_deeper_level_nests_in_last() {
        let mut tree = CallTree::new();
        let a = tree.attach(None, event("x", 1), 0.0);

        let parent = declared_parent(&tree, Some(a), 2, &event("x", 2)).unwrap();
        assert_eq!(parent, Some(a));
    }

    #[test]
    fn test_declared_drop_to_top_level() {
        let mut tree = CallTree::new();
        let a = tree.attach(None, event("x", 1), 0.0);
        let b = tree.attach(Some(a), event("y", 1), 0.0);
        let c = tree.attach(Some(b), event("z", 1), 0.0);

        assert_eq!(declared_parent(&tree, Some(c), 1, &event("x", 2)).unwrap(), None);
        assert_eq!(declared_parent(&tree, Some(c), 2, &event("y", 2)).unwrap(), Some(a));
    }

    #[test]
    fn test_declared_jump_is_rejected() {
        let mut tree = CallTree::new();
        let a = tree.attach(None, event("x", 1), 0.0);

        let err = declared_parent(&tree, Some(a), 3, &event("x", 2)).unwrap_err();
        assert!(matches!(err, BuildError::NestingJump { from: 1, to: 3, .. }));
    }

    #[test]
    fn test_declared_first_event_must_be_top_level() {
        let tree = CallTree::new();
        let err = declared_parent(&tree, None, 2, &event("x", 1)).unwrap_err();
        assert!(matches!(err, BuildError::MissingParent { .. }));
    }

    #[test]
    fn test_resolve_requires_declared_nesting() {
        let tree = CallTree::new();
        let err = resolve_parent(NestingMode::Declared, &tree, None, &event("x", 1)).unwrap_err();
        assert!(matches!(err, BuildError::MissingNesting { .. }));
    }

    #[test]
    fn test_choose_parent_empty_chain_is_top_level() {
        assert_eq!(choose_parent(Vec::new(), "x", 1), None);
    }

    #[test]
    fn test_choose_parent_other_file_nests_in_innermost() {
        let mut tree = CallTree::new();
        let a = tree.attach(None, event("CMakeLists.txt", 10), 0.0);
        let b = tree.attach(Some(a), event("Utils.cmake", 3), 0.0);

        assert_eq!(inferred_parent(&tree, Some(b), &event("Other.cmake", 1)), Some(b));
    }

    #[test]
    fn test_choose_parent_returns_to_caller_file() {
        let mut tree = CallTree::new();
        let a = tree.attach(None, event("CMakeLists.txt", 10), 0.0);
        let b = tree.attach(Some(a), event("Utils.cmake", 3), 0.0);

        // Back in CMakeLists.txt: sibling of the top-level call
        assert_eq!(inferred_parent(&tree, Some(b), &event("CMakeLists.txt", 11)), None);
        // Still in Utils.cmake: sibling of b
        assert_eq!(inferred_parent(&tree, Some(b), &event("Utils.cmake", 4)), Some(a));
    }

    #[test]
    fn test_choose_parent_prefers_closest_line() {
        let mut tree = CallTree::new();
        let a = tree.attach(None, event("x", 100), 0.0);
        let b = tree.attach(Some(a), event("y", 1), 0.0);
        let c = tree.attach(Some(b), event("x", 20), 0.0);

        // Line 22 is closer to c (20) than to a (100)
        assert_eq!(inferred_parent(&tree, Some(c), &event("x", 22)), Some(b));
        // Line 98 is closer to a
        assert_eq!(inferred_parent(&tree, Some(c), &event("x", 98)), None);
    }

    #[test]
    fn test_choose_parent_tie_prefers_shallowest() {
        let mut tree = CallTree::new();
        let a = tree.attach(None, event("x", 10), 0.0);
        let b = tree.attach(Some(a), event("y", 1), 0.0);
        let c = tree.attach(Some(b), event("x", 30), 0.0);

        assert_eq!(inferred_parent(&tree, Some(c), &event("x", 20)), None);
    }
}
