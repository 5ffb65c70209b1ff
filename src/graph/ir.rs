//! Arena-backed IR graph.
//!
//! Every node owns an ordered list of input slots (a slot may be unset) and
//! a derived list of outputs holding one entry per referencing input slot.
//! The builder keeps the two directions consistent on every edit.
//!
//! # Invariants
//! - `n` appears in `outputs(m)` exactly as many times as `m` appears in the
//!   input slots of `n`.
//! - Outputs are kept in insertion order so dumps are deterministic.

use super::kind::NodeKind;
use super::GraphAccess;
use crate::arena::{NodeArena, NodeId};
use crate::error::GraphError;

/// Data stored for each node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Category of the node.
    pub kind: NodeKind,
    /// Ordered input slots.
    pub inputs: Vec<Option<NodeId>>,
    /// Derived reverse references.
    pub outputs: Vec<NodeId>,
}

/// Sea-of-nodes IR graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IrGraph {
    arena: NodeArena<NodeData>,
}

impl IrGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
        }
    }

    /// Adds a node with the given input slots.
    ///
    /// Each present input gains the new node as an output.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        inputs: &[Option<NodeId>],
    ) -> Result<NodeId, GraphError> {
        for input in inputs.iter().flatten() {
            self.ensure_exists(*input)?;
        }
        let id = self.arena.allocate(NodeData {
            kind,
            inputs: inputs.to_vec(),
            outputs: Vec::new(),
        });
        for input in inputs.iter().flatten() {
            self.arena[*input].outputs.push(id);
        }
        Ok(id)
    }

    /// Adds a node whose slot 0 refers to itself (regions, loops, start, root).
    ///
    /// `rest` fills slots 1 and up.
    pub fn add_self_node(
        &mut self,
        kind: NodeKind,
        rest: &[Option<NodeId>],
    ) -> Result<NodeId, GraphError> {
        let mut inputs = Vec::with_capacity(rest.len() + 1);
        inputs.push(None);
        inputs.extend_from_slice(rest);
        let id = self.add_node(kind, &inputs)?;
        self.set_input(id, 0, Some(id))?;
        Ok(id)
    }

    /// Rewires input `slot` of `node`, keeping outputs consistent.
    pub fn set_input(
        &mut self,
        node: NodeId,
        slot: usize,
        input: Option<NodeId>,
    ) -> Result<(), GraphError> {
        self.ensure_exists(node)?;
        if let Some(new) = input {
            self.ensure_exists(new)?;
        }
        let arity = self.arena[node].inputs.len();
        if slot >= arity {
            return Err(GraphError::SlotOutOfRange { node, slot, arity });
        }
        let old = std::mem::replace(&mut self.arena[node].inputs[slot], input);
        if let Some(old) = old {
            let outputs = &mut self.arena[old].outputs;
            if let Some(pos) = outputs.iter().position(|&out| out == node) {
                outputs.remove(pos);
            }
        }
        if let Some(new) = input {
            self.arena[new].outputs.push(node);
        }
        Ok(())
    }

    /// Appends an input slot to `node`, growing its arity by one.
    pub fn add_input(&mut self, node: NodeId, input: Option<NodeId>) -> Result<(), GraphError> {
        self.ensure_exists(node)?;
        if let Some(new) = input {
            self.ensure_exists(new)?;
            self.arena[new].outputs.push(node);
        }
        self.arena[node].inputs.push(input);
        Ok(())
    }

    /// Returns the node's data, if it exists.
    pub fn node_data(&self, id: NodeId) -> Option<&NodeData> {
        self.arena.get(id)
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Iterates over all nodes in allocation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        self.arena.iter()
    }

    fn ensure_exists(&self, id: NodeId) -> Result<(), GraphError> {
        if self.arena.contains(id) {
            Ok(())
        } else {
            Err(GraphError::UnknownNode(id))
        }
    }
}

impl GraphAccess for IrGraph {
    fn kind(&self, id: NodeId) -> &NodeKind {
        &self.arena[id].kind
    }

    fn req(&self, id: NodeId) -> usize {
        self.arena[id].inputs.len()
    }

    fn input(&self, id: NodeId, slot: usize) -> Option<NodeId> {
        self.arena[id].inputs.get(slot).copied().flatten()
    }

    fn outputs(&self, id: NodeId) -> &[NodeId] {
        &self.arena[id].outputs
    }

    fn dump(&self, id: NodeId) -> String {
        let data = &self.arena[id];
        let inputs: Vec<String> = data
            .inputs
            .iter()
            .map(|slot| slot.map_or_else(|| "_".to_string(), |n| n.to_string()))
            .collect();
        let outputs: Vec<String> = data.outputs.iter().map(NodeId::to_string).collect();
        format!(
            "{:>5}  {:<22} === {}  [[ {} ]]",
            id,
            data.kind.name(),
            inputs.join(" "),
            outputs.join(" ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_mirror_inputs() {
        let mut graph = IrGraph::new();
        let a = graph.add_node(NodeKind::Con, &[None]).unwrap();
        let b = graph.add_node(NodeKind::Add, &[None, Some(a), Some(a)]).unwrap();
        assert_eq!(graph.outputs(a), &[b, b]);
        assert_eq!(graph.req(b), 3);
        assert_eq!(graph.input(b, 0), None);
        assert_eq!(graph.input(b, 1), Some(a));
        assert_eq!(graph.out_count(b), 0);
    }

    #[test]
    fn self_node_feeds_itself() {
        let mut graph = IrGraph::new();
        let region = graph.add_self_node(NodeKind::Region, &[None, None]).unwrap();
        assert_eq!(graph.input(region, 0), Some(region));
        assert_eq!(graph.outputs(region), &[region]);
        assert_eq!(graph.req(region), 3);
    }

    #[test]
    fn set_input_rewires_outputs() {
        let mut graph = IrGraph::new();
        let a = graph.add_node(NodeKind::Con, &[None]).unwrap();
        let b = graph.add_node(NodeKind::Con, &[None]).unwrap();
        let add = graph.add_node(NodeKind::Add, &[None, Some(a), Some(a)]).unwrap();
        graph.set_input(add, 2, Some(b)).unwrap();
        assert_eq!(graph.outputs(a), &[add]);
        assert_eq!(graph.outputs(b), &[add]);
        graph.set_input(add, 1, None).unwrap();
        assert!(graph.outputs(a).is_empty());
    }

    #[test]
    fn add_input_grows_arity() {
        let mut graph = IrGraph::new();
        let region = graph.add_self_node(NodeKind::Loop, &[None]).unwrap();
        let back = graph.add_node(NodeKind::Goto, &[Some(region)]).unwrap();
        graph.add_input(region, Some(back)).unwrap();
        assert_eq!(graph.req(region), 3);
        assert_eq!(graph.outputs(back), &[region]);
    }

    #[test]
    fn builder_rejects_bad_references() {
        let mut graph = IrGraph::new();
        let a = graph.add_node(NodeKind::Con, &[None]).unwrap();
        assert!(matches!(
            graph.add_node(NodeKind::Add, &[Some(NodeId::new(99))]),
            Err(GraphError::UnknownNode(_))
        ));
        assert!(matches!(
            graph.set_input(a, 4, None),
            Err(GraphError::SlotOutOfRange { slot: 4, arity: 1, .. })
        ));
    }

    #[test]
    fn dump_lists_inputs_and_outputs() {
        let mut graph = IrGraph::new();
        let a = graph.add_node(NodeKind::Con, &[None]).unwrap();
        let b = graph.add_node(NodeKind::Add, &[None, Some(a)]).unwrap();
        let dump = graph.dump(a);
        assert!(dump.starts_with("    0  Con"));
        assert!(dump.ends_with("=== _  [[ 1 ]]"));
        assert!(graph.dump(b).contains("=== _ 0  [[  ]]"));
    }
}
