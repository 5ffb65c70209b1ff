//! Path recording for pattern diagnostics.
//!
//! A [`Trace`] holds the nodes visited while descending from the checked
//! node, plus the direction taken at each step. Navigation pushes before
//! recursing and pops afterwards, so a failure deep inside a pattern can
//! print exactly which input/output chain led to it.
//!
//! # Invariants
//! - `nodes.len() == steps.len() + 1`.
//! - `nodes[0]` is the node the check was invoked on.

use crate::arena::NodeId;
use crate::graph::GraphAccess;
use std::fmt;

/// Direction taken to reach the next node of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Followed input slot `k`.
    Input(usize),
    /// Followed the unique output of some category.
    Output,
}

/// Visited nodes and the steps between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    nodes: Vec<NodeId>,
    steps: Vec<Step>,
}

impl Trace {
    /// Starts a trace at the checked node.
    pub fn new(center: NodeId) -> Self {
        Self {
            nodes: vec![center],
            steps: Vec::new(),
        }
    }

    /// Runs `f` with `node` pushed on the trace, popping it afterwards
    /// whatever `f` returns.
    #[cfg(test)]
    pub(crate) fn descend<R>(&mut self, node: NodeId, step: Step, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push(node, step);
        let result = f(self);
        self.pop();
        result
    }

    pub(crate) fn push(&mut self, node: NodeId, step: Step) {
        self.nodes.push(node);
        self.steps.push(step);
    }

    pub(crate) fn pop(&mut self) {
        debug_assert!(!self.steps.is_empty(), "the origin is never popped");
        self.steps.pop();
        self.nodes.pop();
    }

    /// The node the check was invoked on.
    pub fn origin(&self) -> NodeId {
        self.nodes[0]
    }

    /// The node currently examined.
    pub fn current(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps taken from the origin.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }
}

/// Line-oriented diagnostic text for one check on one node.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    text: String,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `line` followed by a newline.
    pub fn line(&mut self, line: impl fmt::Display) {
        self.text.push_str(&line.to_string());
        self.text.push('\n');
    }

    /// Appends the dump of `node`.
    pub fn dump(&mut self, graph: &dyn GraphAccess, node: NodeId) {
        self.line(graph.dump(node));
    }

    /// Appends the dump of every node in `nodes`.
    pub fn dump_all(&mut self, graph: &dyn GraphAccess, nodes: &[NodeId]) {
        for &node in nodes {
            self.dump(graph, node);
        }
    }

    /// Appends where the failure happened and how it was reached.
    ///
    /// ```text
    /// At node
    ///        12  IfFalse  === 9  [[ 14 ]]
    ///   From path:
    ///     [center]   20  OuterStripMinedLoopEnd  === 14 8  [[ 21 22 ]]
    ///       <-(0)-   14  SafePoint  === 12  [[ 20 ]]
    ///       <-(0)-   12  IfFalse  === 9  [[ 14 ]]
    /// ```
    pub fn path(&mut self, graph: &dyn GraphAccess, trace: &Trace) {
        debug_assert_eq!(trace.nodes().len(), trace.steps().len() + 1);
        let center = trace.current();
        if trace.depth() == 0 {
            self.line("At center node");
            self.dump(graph, center);
            return;
        }
        self.line(format_args!("At node\n    {}", graph.dump(center)));
        self.line("  From path:");
        self.line(format_args!("    [center]{}", graph.dump(trace.origin())));
        for (step, &node) in trace.steps().iter().zip(&trace.nodes()[1..]) {
            let arrow = match step {
                Step::Input(slot) => format!("      <-({slot})-"),
                Step::Output => "         -->".to_string(),
            };
            self.line(format_args!("{arrow}{}", graph.dump(node)));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::fixtures;

    #[test]
    fn descend_restores_trace_on_any_result() {
        let mut trace = Trace::new(NodeId::new(1));
        let failed = trace.descend(NodeId::new(2), Step::Input(0), |t| {
            t.descend(NodeId::new(3), Step::Output, |inner| {
                assert_eq!(inner.nodes(), &[NodeId::new(1), NodeId::new(2), NodeId::new(3)]);
                assert_eq!(inner.steps(), &[Step::Input(0), Step::Output]);
                false
            })
        });
        assert!(!failed);
        assert_eq!(trace.nodes(), &[NodeId::new(1)]);
        assert!(trace.steps().is_empty());
        assert_eq!(trace.current(), trace.origin());
    }

    #[test]
    fn path_at_center_has_no_arrows() {
        let d = fixtures::diamond();
        let graph = d.unit.ir();
        let mut diag = Diagnostics::new();
        diag.path(graph, &Trace::new(d.iff));
        let text = diag.into_string();
        assert!(text.starts_with("At center node\n"));
        assert!(!text.contains("From path"));
    }

    #[test]
    fn path_lists_every_step() {
        let d = fixtures::diamond();
        let graph = d.unit.ir();
        let mut trace = Trace::new(d.phi);
        let text = trace.descend(d.region, Step::Input(0), |t| {
            t.descend(d.ret, Step::Output, |t| {
                let mut diag = Diagnostics::new();
                diag.path(graph, t);
                diag.into_string()
            })
        });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "At node");
        assert_eq!(lines[1], format!("    {}", graph.dump(d.ret)));
        assert_eq!(lines[2], "  From path:");
        assert_eq!(lines[3], format!("    [center]{}", graph.dump(d.phi)));
        assert_eq!(lines[4], format!("      <-(0)-{}", graph.dump(d.region)));
        assert_eq!(lines[5], format!("         -->{}", graph.dump(d.ret)));
    }
}
