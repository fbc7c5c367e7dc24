use std::fmt;

/// Stable handle to a node slot in a graph's arena.
///
/// Issued by `Graph::add_node` and valid for that graph's lifetime; slots
/// never move because node removal is out of scope. A handle only means
/// something to the graph that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in its graph's insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A labeled child reference: the edge label plus the target's handle.
///
/// Child edges are relational, not owning: the target lives in the same
/// arena as the parent, so cycles and shared targets are plain data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<E> {
    pub label: E,
    pub target: NodeId,
}

/// A vertex: a name fixed at construction, a mutable value, and an ordered
/// list of labeled child references.
///
/// The visitation mark is transient walk state. Walks set it through the
/// owning graph; `unmark` resets it, and a whole-graph walk leaves every
/// mark cleared on completion.
#[derive(Debug, Clone)]
pub struct Node<V, E> {
    name: String,
    value: V,
    children: Vec<Edge<E>>,
    visited: bool,
}

impl<V, E> Node<V, E> {
    /// Construct a named node carrying `value`, with no children and the
    /// visitation mark unset.
    pub fn new(name: impl Into<String>, value: V) -> Self {
        Self {
            name: name.into(),
            value,
            children: Vec::new(),
            visited: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Replace the value, returning the previous one.
    pub fn set_value(&mut self, value: V) -> V {
        std::mem::replace(&mut self.value, value)
    }

    /// Append a child reference. Insertion order is traversal order.
    ///
    /// Any target is accepted: the node's own handle, or one already in
    /// the list. A duplicate occupies a second slot; a walk traverses
    /// whichever slot it selects first and skips the rest.
    pub fn add_child(&mut self, target: NodeId, label: E) {
        self.children.push(Edge { label, target });
    }

    /// The child list, in insertion order.
    pub fn children(&self) -> &[Edge<E>] {
        &self.children
    }

    /// Whether a walk has reached this node.
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// Reset the visitation mark.
    pub fn unmark(&mut self) {
        self.visited = false;
    }

    pub(crate) fn mark(&mut self) {
        self.visited = true;
    }
}

impl<V, E> fmt::Display for Node<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.children.len();
        let noun = if n == 1 { "child node" } else { "child nodes" };
        write!(f, "{}, {} {}", self.name, n, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Node<u32, &'static str> {
        Node::new(name, 0)
    }

    #[test]
    fn test_new_node_is_unmarked_and_childless() {
        let node = named("a");
        assert_eq!(node.name(), "a");
        assert_eq!(*node.value(), 0);
        assert!(!node.is_visited());
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let mut node = named("a");
        node.add_child(NodeId(2), "x");
        node.add_child(NodeId(0), "y");
        node.add_child(NodeId(1), "z");

        let targets: Vec<usize> = node.children().iter().map(|e| e.target.index()).collect();
        assert_eq!(targets, vec![2, 0, 1]);
        let labels: Vec<&str> = node.children().iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_duplicate_and_self_targets_allowed() {
        let mut node = named("a");
        node.add_child(NodeId(5), "first");
        node.add_child(NodeId(5), "again");
        node.add_child(NodeId(0), "self");
        assert_eq!(node.children().len(), 3);
        assert_eq!(node.children()[0].target, node.children()[1].target);
    }

    #[test]
    fn test_value_mutation() {
        let mut node = named("a");
        *node.value_mut() = 7;
        assert_eq!(*node.value(), 7);
        let old = node.set_value(9);
        assert_eq!(old, 7);
        assert_eq!(*node.value(), 9);
    }

    #[test]
    fn test_unmark_resets() {
        let mut node = named("a");
        node.mark();
        assert!(node.is_visited());
        node.unmark();
        assert!(!node.is_visited());
    }

    #[test]
    fn test_display_counts_children() {
        let mut node = named("node1");
        assert_eq!(node.to_string(), "node1, 0 child nodes");
        node.add_child(NodeId(1), "e");
        assert_eq!(node.to_string(), "node1, 1 child node");
        node.add_child(NodeId(2), "e");
        assert_eq!(node.to_string(), "node1, 2 child nodes");
    }
}
