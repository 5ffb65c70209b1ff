//! Serializable snapshots of compilation units.
//!
//! A snapshot stores only kinds and input slots; outputs are derived again
//! on restore. Snapshots let a failing graph be captured and re-verified
//! offline.

use super::{Compilation, CompilationUnit, IrGraph, NodeKind};
use crate::arena::NodeId;
use crate::error::GraphError;
use serde::{Deserialize, Serialize};

/// One node of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub kind: NodeKind,
    pub inputs: Vec<Option<u32>>,
}

/// Node list plus root, indexed by raw node id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub root: u32,
    pub nodes: Vec<NodeRecord>,
}

impl GraphSnapshot {
    /// Captures every node of the unit's graph.
    pub fn capture(unit: &Compilation) -> Self {
        let graph = unit.graph();
        let nodes = unit
            .ir()
            .nodes()
            .map(|(id, data)| NodeRecord {
                kind: data.kind,
                inputs: (0..graph.req(id))
                    .map(|slot| graph.input(id, slot).map(|n| n.as_u32()))
                    .collect(),
            })
            .collect();
        Self {
            root: unit.root().as_u32(),
            nodes,
        }
    }

    /// Rebuilds the compilation unit, deriving outputs from inputs.
    ///
    /// Nodes may reference later nodes (loops), so inputs are wired after
    /// every node is allocated.
    pub fn restore(&self) -> Result<Compilation, GraphError> {
        let count = self.nodes.len() as u32;
        let check = |raw: u32| {
            if raw < count {
                Ok(NodeId::new(raw))
            } else {
                Err(GraphError::DanglingReference(raw))
            }
        };
        let root = check(self.root)?;

        let mut graph = IrGraph::new();
        for record in &self.nodes {
            graph.add_node(record.kind, &vec![None; record.inputs.len()])?;
        }
        for (idx, record) in self.nodes.iter().enumerate() {
            let node = NodeId::new(idx as u32);
            for (slot, input) in record.inputs.iter().enumerate() {
                if let Some(raw) = input {
                    graph.set_input(node, slot, Some(check(*raw)?))?;
                }
            }
        }
        Ok(Compilation::new(graph, root))
    }

    /// Encodes the snapshot as CBOR.
    pub fn to_cbor(&self) -> Result<Vec<u8>, GraphError> {
        Ok(serde_cbor::to_vec(self)?)
    }

    /// Decodes a snapshot from CBOR.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, GraphError> {
        Ok(serde_cbor::from_slice(bytes)?)
    }
}
