use std::fmt::Display;

use tracing::debug;

use crate::node::Node;

/// Behavior attached to a walk: one hook per visited node, one per
/// traversed edge.
///
/// Both hooks return an advisory continue flag. The walk engine ignores it
/// and always continues; the return channel is reserved for early
/// termination. Hooks take `&mut self` so an implementation can carry
/// state, a visit counter or an accumulated trace for instance.
///
/// Both hooks have pass-through defaults, so an implementation overrides
/// only the one it cares about.
pub trait Operation<V, E> {
    /// Invoked exactly once per node reached by a walk, before the node's
    /// children are explored.
    fn on_node(&mut self, node: &Node<V, E>) -> bool {
        let _ = node;
        true
    }

    /// Invoked once per traversed edge, after the edge is selected and its
    /// target marked, before the descent into the target.
    ///
    /// Edges whose target was already visited at selection time are
    /// skipped and never reach this hook.
    fn on_edge(&mut self, label: &E) -> bool {
        let _ = label;
        true
    }
}

/// The operation a freshly constructed graph holds: all defaults, no
/// output, always continue.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassOp;

impl<V, E> Operation<V, E> for PassOp {}

/// Logs every visit and traversal as a `tracing` debug event.
///
/// Node events carry the node's display form ("name, N child nodes"); edge
/// events carry the label. Needs `E: Display`, which is why this is an
/// opt-in variant rather than the constructed-in default.
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceOp;

impl<V, E: Display> Operation<V, E> for TraceOp {
    fn on_node(&mut self, node: &Node<V, E>) -> bool {
        debug!(node = %node, "visit");
        true
    }

    fn on_edge(&mut self, label: &E) -> bool {
        debug!(label = %label, "traverse");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    /// Overrides only the node hook; the edge hook stays the default.
    #[derive(Default)]
    struct NameCollector {
        seen: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
    }

    impl<V> Operation<V, &'static str> for NameCollector {
        fn on_node(&mut self, node: &Node<V, &'static str>) -> bool {
            self.seen.borrow_mut().push(node.name().to_string());
            true
        }
    }

    #[test]
    fn test_default_hooks_continue() {
        let mut op: Box<dyn Operation<u32, &str>> = Box::new(PassOp);
        let node: Node<u32, &str> = Node::new("n", 0);
        assert!(op.on_node(&node));
        assert!(op.on_edge(&"edge"));
    }

    #[test]
    fn test_trace_op_continues() {
        // No subscriber installed: events are discarded, hooks still run.
        let mut op: Box<dyn Operation<u32, &str>> = Box::new(TraceOp);
        let mut node: Node<u32, &str> = Node::new("n", 0);
        node.add_child(crate::node::NodeId(0), "loop");
        assert!(op.on_node(&node));
        assert!(op.on_edge(&"loop"));
    }

    #[test]
    fn test_partial_override_walks_whole_graph() {
        let mut graph: Graph<u32, &'static str> = Graph::new("partial");
        let a = graph.add_node(Node::new("a", 0));
        let b = graph.add_node(Node::new("b", 1));
        graph[a].add_child(b, "ab");

        let collector = NameCollector::default();
        let seen = collector.seen.clone();
        graph.set_operation(Box::new(collector));
        graph.walk().unwrap();

        // The default edge hook kept the walk going into `b`.
        assert_eq!(*seen.borrow(), vec!["a".to_string(), "b".to_string()]);
    }
}
