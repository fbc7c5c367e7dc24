//! walkgraph-core: generic in-memory directed graph with a visitor walk.
//!
//! A pure Rust library holding named, value-carrying nodes in an arena
//! with labeled directed edges between them, plus a depth-first walk that
//! covers every node (disconnected components included) exactly once per
//! pass and hands each visited node and each traversed edge to a
//! caller-installed operation.
//!
//! No runtime dependencies beyond error and logging support; usable
//! independently for modeling, benchmarking and testing.

mod graph;
mod node;
mod op;

pub use graph::{Graph, WalkError};
pub use node::{Edge, Node, NodeId};
pub use op::{Operation, PassOp, TraceOp};
