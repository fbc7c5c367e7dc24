use std::ops::{Index, IndexMut};

use thiserror::Error;
use tracing::debug;

use crate::node::{Node, NodeId};
use crate::op::{Operation, PassOp};

/// Error raised by the walk entry points.
///
/// Everything here is a configuration mistake, not a runtime condition:
/// nothing is retryable, and every variant is raised before the walk
/// touches any visitation mark.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalkError {
    /// The walk's starting position does not address a node slot.
    #[error("start index {index} out of range for graph of {len} nodes")]
    StartOutOfRange { index: usize, len: usize },
}

/// One in-progress descent position: a node and how far its child list has
/// been scanned.
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: NodeId,
    cursor: usize,
}

/// A named, insertion-ordered arena of nodes plus the installed operation
/// and the walk entry points.
///
/// The graph owns every node; child edges are handles into the same arena,
/// so shared targets and cycles carry no ownership questions. An operation
/// is always installed (a new graph holds the pass-through), and a walk
/// holds `&mut self` for its duration, so re-entrant walks and mid-walk
/// mutation are compile errors rather than contract footnotes.
pub struct Graph<V, E> {
    name: String,
    nodes: Vec<Node<V, E>>,
    start: usize,
    op: Box<dyn Operation<V, E>>,
}

impl<V, E> Graph<V, E> {
    /// Construct an empty named graph: pass-through operation installed,
    /// start position 0.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            start: 0,
            op: Box::new(PassOp),
        }
    }

    /// Pre-allocate for a known node count.
    pub fn with_capacity(name: impl Into<String>, nodes: usize) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::with_capacity(nodes),
            start: 0,
            op: Box::new(PassOp),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a node, returning its handle. Handles stay valid for the
    /// graph's lifetime; there is no removal.
    pub fn add_node(&mut self, node: Node<V, E>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<V, E>> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<V, E>> {
        self.nodes.get_mut(id.0)
    }

    /// Nodes in insertion order, paired with their handles.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node<V, E>)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total child references across all nodes.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.children().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Where `walk()` begins its first descent. Defaults to 0.
    pub fn start_index(&self) -> usize {
        self.start
    }

    /// Set the first descent's starting position. Not validated here; an
    /// out-of-range value fails at `walk()` time.
    pub fn set_start_index(&mut self, index: usize) {
        self.start = index;
    }

    /// Install `op`, returning the previously installed operation so the
    /// caller can restore it later. Takes effect for walks started after
    /// the call.
    pub fn set_operation(&mut self, op: Box<dyn Operation<V, E>>) -> Box<dyn Operation<V, E>> {
        std::mem::replace(&mut self.op, op)
    }

    /// Reset every node's visitation mark.
    ///
    /// `walk()` already ends with this; the explicit form is for callers
    /// that drive `walk_from` directly and want a clean slate between
    /// descents.
    pub fn clear_marks(&mut self) {
        for node in &mut self.nodes {
            node.unmark();
        }
    }

    /// Walk the whole graph depth-first, invoking the installed operation
    /// once per node and once per traversed edge.
    ///
    /// One descent starts at the start position, unconditionally; then
    /// every still-unvisited node, in insertion order, gets its own
    /// descent, so disconnected components are covered and each node is
    /// visited exactly once. All marks are cleared before returning, so a
    /// second `walk()` repeats the first exactly.
    ///
    /// An empty graph is a no-op. A start position outside the node range
    /// is an error, raised before anything is marked.
    pub fn walk(&mut self) -> Result<(), WalkError> {
        if self.nodes.is_empty() {
            return Ok(());
        }
        if self.start >= self.nodes.len() {
            return Err(WalkError::StartOutOfRange {
                index: self.start,
                len: self.nodes.len(),
            });
        }

        debug!(
            graph = %self.name,
            nodes = self.nodes.len(),
            start = self.start,
            "walk started"
        );

        self.descend(NodeId(self.start));
        for i in 0..self.nodes.len() {
            if !self.nodes[i].is_visited() {
                self.descend(NodeId(i));
            }
        }
        self.clear_marks();

        debug!(graph = %self.name, "walk complete");
        Ok(())
    }

    /// One depth-first descent from `start`, leaving visitation marks in
    /// place. Only the whole-graph walk clears them.
    ///
    /// Exposed for callers that want to traverse a single reachable set;
    /// combine with `clear_marks` to reset between descents. A handle that
    /// does not resolve in this graph's arena is an error.
    pub fn walk_from(&mut self, start: NodeId) -> Result<(), WalkError> {
        if start.0 >= self.nodes.len() {
            return Err(WalkError::StartOutOfRange {
                index: start.0,
                len: self.nodes.len(),
            });
        }
        self.descend(start);
        Ok(())
    }

    /// The depth-first engine behind both entry points.
    ///
    /// Runs on an explicit stack of (node, cursor) frames instead of
    /// recursion: a path-shaped graph would otherwise recurse as deep as
    /// the node count. The cursor resumes each child scan where it left
    /// off. Marks are only ever set during a walk, so nothing behind a
    /// cursor can become selectable again and the resumed scan finds
    /// exactly what a fresh scan would.
    fn descend(&mut self, start: NodeId) {
        self.nodes[start.0].mark();
        self.op.on_node(&self.nodes[start.0]);

        let mut stack = vec![Frame {
            node: start,
            cursor: 0,
        }];
        while let Some(frame) = stack.last().copied() {
            match self.next_unmarked_child(frame) {
                Some((edge_idx, target)) => {
                    // Resume this frame past the selected edge once the
                    // child's subtree unwinds.
                    if let Some(top) = stack.last_mut() {
                        top.cursor = edge_idx + 1;
                    }
                    self.op
                        .on_edge(&self.nodes[frame.node.0].children()[edge_idx].label);
                    self.op.on_node(&self.nodes[target.0]);
                    stack.push(Frame {
                        node: target,
                        cursor: 0,
                    });
                }
                None => {
                    stack.pop();
                }
            }
        }
    }

    /// The child-selection rule: scan the frame's child list from its
    /// cursor, in insertion order, for the first edge whose target is
    /// unvisited, and mark that target before returning it.
    ///
    /// Marking at selection time rather than at descent time is what makes
    /// cycles and shared targets terminate with a single boolean mark: a
    /// selected node is never selectable again, from any parent. `None`
    /// means the frame has no unvisited child left and is finished.
    fn next_unmarked_child(&mut self, frame: Frame) -> Option<(usize, NodeId)> {
        let len = self.nodes[frame.node.0].children().len();
        for i in frame.cursor..len {
            let target = self.nodes[frame.node.0].children()[i].target;
            if !self.nodes[target.0].is_visited() {
                self.nodes[target.0].mark();
                return Some((i, target));
            }
        }
        None
    }
}

impl<V, E> Index<NodeId> for Graph<V, E> {
    type Output = Node<V, E>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

impl<V, E> IndexMut<NodeId> for Graph<V, E> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.nodes[id.0]
    }
}
