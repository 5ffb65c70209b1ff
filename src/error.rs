//! Errors raised while building or restoring IR graphs.
//!
//! Verification itself never errors: violations are reported through
//! `CheckResult::Failed`. These errors only cover misuse of the graph
//! builder and snapshot decoding.

use crate::arena::NodeId;
use thiserror::Error;

/// Error type for graph construction and snapshot operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Referenced node was never allocated in this graph.
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    /// Input slot index is beyond the node's arity.
    #[error("input slot {slot} out of range for node {node} (arity {arity})")]
    SlotOutOfRange {
        /// Node whose slot was addressed.
        node: NodeId,
        /// Requested slot.
        slot: usize,
        /// Current arity of the node.
        arity: usize,
    },
    /// Snapshot names a root or input that is not one of its nodes.
    #[error("snapshot references missing node {0}")]
    DanglingReference(u32),
    /// CBOR encoding or decoding failed.
    #[error("snapshot encoding: {0}")]
    Encoding(#[from] serde_cbor::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_node() {
        let err = GraphError::SlotOutOfRange {
            node: NodeId::new(4),
            slot: 3,
            arity: 2,
        };
        assert_eq!(err.to_string(), "input slot 3 out of range for node 4 (arity 2)");
        assert_eq!(GraphError::UnknownNode(NodeId::new(9)).to_string(), "node 9 does not exist");
    }
}
