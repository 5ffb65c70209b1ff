//! Structural invariant verification.
//!
//! A [`Checker`] walks every node reachable from the compilation root
//! through input edges and runs each [`LocalInvariant`] of its catalog
//! against it. Violations are collected per node and flushed to a
//! [`DiagnosticSink`] as one report.
//!
//! # Example
//!
//! ```
//! use graph_invariants::prelude::*;
//!
//! let mut graph = IrGraph::new();
//! let root = graph.add_self_node(NodeKind::Root, &[]).unwrap();
//! let unit = Compilation::new(graph, root);
//!
//! let sink = MemorySink::new();
//! let checker = Checker::with_config(CheckerConfig::enabled());
//! // A lone root has a single control successor (itself).
//! assert!(!checker.run(&unit, &sink));
//! assert!(sink.contents().contains("# ControlSuccessor:"));
//! ```

pub mod checker;
pub mod invariants;
pub mod pattern;
pub mod sink;
pub mod trace;

pub use checker::{CheckTally, Checker, VerificationSummary};
pub use invariants::{
    ControlSuccessor, CountedLoopInvariants, IfProjections, MultiBranchNodeOut,
    OuterStripMinedLoopInvariants, PhiArity, RegionSelfLoop,
};
pub use pattern::{Capture, MatchContext, Pattern};
pub use sink::{DiagnosticSink, MemorySink, StderrSink};
pub use trace::{Diagnostics, Step, Trace};

use crate::arena::NodeId;
use crate::graph::{GraphAccess, NodeKind};

/// Outcome of one invariant on one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    /// The invariant holds.
    Valid,
    /// The invariant is violated; carries the diagnostic text.
    Failed(String),
    /// The node is outside the invariant's domain.
    NotApplicable,
}

impl CheckResult {
    pub fn is_failed(&self) -> bool {
        matches!(self, CheckResult::Failed(_))
    }
}

/// A structural law checked locally around one node.
pub trait LocalInvariant: Send + Sync {
    /// Name printed in report headers and used by `skip_checks`.
    fn name(&self) -> &'static str;

    /// Whether nodes of this kind are in the invariant's domain.
    fn applies_to(&self, kind: &NodeKind) -> bool;

    /// Checks `center`, writing failure details into `cx`.
    ///
    /// Only called for nodes accepted by [`applies_to`](Self::applies_to).
    fn verify(&self, center: NodeId, cx: &mut MatchContext<'_>) -> bool;

    /// Classifies `center` and, if applicable, checks it with a fresh context.
    fn evaluate(&self, graph: &dyn GraphAccess, center: NodeId) -> CheckResult {
        if !self.applies_to(graph.kind(center)) {
            return CheckResult::NotApplicable;
        }
        let mut cx = MatchContext::new(graph, center);
        if self.verify(center, &mut cx) {
            CheckResult::Valid
        } else {
            CheckResult::Failed(cx.into_diagnostics())
        }
    }
}
