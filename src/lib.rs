//! graph-invariants: a structural verifier for sea-of-nodes IR graphs.
//!
//! A compiler that represents a method as a graph of nodes (control flow,
//! merges, loops, values) can check between phases that the graph still has
//! the local shapes later phases rely on. This crate provides:
//! - A small graph access layer ([`GraphAccess`], [`CompilationUnit`]) and an
//!   arena-backed implementation ([`IrGraph`]).
//! - Pattern combinators that describe a node's neighbourhood and explain
//!   failures with the input/output path that led to them.
//! - A catalog of seven invariants and a worklist driver that runs them over
//!   every node reachable from the root.
//!
//! Verification never mutates the graph and never stops at the first
//! violation. Reports go to an injected [`DiagnosticSink`]; the return value
//! says whether the graph is well formed.
//!
//! # Example
//!
//! ```
//! use graph_invariants::prelude::*;
//!
//! let mut g = IrGraph::new();
//! let root = g.add_self_node(NodeKind::Root, &[None]).unwrap();
//! let start = g.add_self_node(NodeKind::Start, &[Some(root)]).unwrap();
//! let ctrl = g.add_node(NodeKind::CtrlProj, &[Some(start)]).unwrap();
//! let ret = g.add_node(NodeKind::Return, &[Some(ctrl)]).unwrap();
//! g.set_input(root, 1, Some(ret)).unwrap();
//!
//! let unit = Compilation::new(g, root);
//! let checker = Checker::with_config(CheckerConfig::enabled());
//! assert!(checker.run(&unit, &MemorySink::new()));
//! ```

pub mod arena;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod graph;
pub mod verify;

pub use crate::arena::NodeId;
pub use crate::config::CheckerConfig;
pub use crate::error::GraphError;
pub use crate::graph::{Compilation, CompilationUnit, GraphAccess, IrGraph, NodeCategory, NodeKind};
pub use crate::verify::{CheckResult, Checker, DiagnosticSink, LocalInvariant, VerificationSummary};

/// Prelude for convenient usage.
pub mod prelude {
    pub use crate::arena::NodeId;
    pub use crate::config::CheckerConfig;
    pub use crate::error::GraphError;
    pub use crate::fingerprint::{graph_fingerprint, HashValue};
    pub use crate::graph::{
        Compilation, CompilationUnit, GraphAccess, GraphSnapshot, IrGraph, NodeCategory, NodeKind,
    };
    pub use crate::verify::{
        Capture, CheckResult, Checker, DiagnosticSink, LocalInvariant, MatchContext, MemorySink,
        Pattern, StderrSink, VerificationSummary,
    };
}
