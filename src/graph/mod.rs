//! Graph access layer consumed by the verifier.
//!
//! The verifier only talks to the IR through [`GraphAccess`] and
//! [`CompilationUnit`]; [`IrGraph`] and [`Compilation`] are the in-crate
//! implementations.

pub mod ir;
pub mod kind;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod fixtures;

pub use ir::{IrGraph, NodeData};
pub use kind::{NodeCategory, NodeKind};
pub use snapshot::GraphSnapshot;

use crate::arena::NodeId;

/// Read-only view of an IR graph.
///
/// Ids passed in must come from the same graph; implementations may panic
/// otherwise.
pub trait GraphAccess {
    /// Category of the node.
    fn kind(&self, id: NodeId) -> &NodeKind;

    /// Number of input slots (set or unset).
    fn req(&self, id: NodeId) -> usize;

    /// Input at `slot`, or `None` if the slot is unset or out of range.
    fn input(&self, id: NodeId, slot: usize) -> Option<NodeId>;

    /// Derived output references, one per referencing input slot.
    fn outputs(&self, id: NodeId) -> &[NodeId];

    /// One-line textual dump of the node.
    fn dump(&self, id: NodeId) -> String;

    /// Number of derived outputs.
    fn out_count(&self, id: NodeId) -> usize {
        self.outputs(id).len()
    }
}

/// The unit being compiled: a graph plus its traversal root.
pub trait CompilationUnit {
    fn graph(&self) -> &dyn GraphAccess;
    fn root(&self) -> NodeId;
}

/// A graph paired with its root node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compilation {
    graph: IrGraph,
    root: NodeId,
}

impl Compilation {
    /// Creates a compilation unit rooted at `root`.
    pub fn new(graph: IrGraph, root: NodeId) -> Self {
        Self { graph, root }
    }

    /// Returns the underlying graph.
    pub fn ir(&self) -> &IrGraph {
        &self.graph
    }

    /// Returns the underlying graph for editing.
    pub fn ir_mut(&mut self) -> &mut IrGraph {
        &mut self.graph
    }
}

impl CompilationUnit for Compilation {
    fn graph(&self) -> &dyn GraphAccess {
        &self.graph
    }

    fn root(&self) -> NodeId {
        self.root
    }
}
