//! Structural pattern combinators anchored at a center node.
//!
//! A [`Pattern`] is an immutable tree built once per invariant and reused
//! for every node. Evaluation threads a [`MatchContext`] through the tree:
//! the context carries the path trace, the diagnostic buffer and the capture
//! slots written by [`Pattern::Bind`].
//!
//! Conjunctions short-circuit on the first failing sub-pattern and never
//! backtrack, so sub-patterns later in an `All` may rely on the arity checks
//! and binds performed by earlier ones.

use super::trace::{Diagnostics, Step, Trace};
use crate::arena::NodeId;
use crate::graph::{GraphAccess, NodeCategory};

/// Name of a capture slot written by [`Pattern::Bind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capture(pub &'static str);

/// A structural assertion about the node under examination.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Always holds.
    True,
    /// Always holds; records the center under the given capture.
    Bind(Capture),
    /// Holds if every sub-pattern holds, evaluated in order.
    All(Vec<Pattern>),
    /// Arity equals the given count.
    ExactInputs(usize),
    /// Arity is at least the given count.
    MinInputs(usize),
    /// The input at the given slot is set and satisfies the sub-pattern.
    AtInput(usize, Box<Pattern>),
    /// The center belongs to the category.
    HasKind(NodeCategory),
    /// Output count equals the given count.
    ExactOutputs(usize),
    /// Exactly one output belongs to the category and satisfies the sub-pattern.
    AtUniqueOutput(NodeCategory, Box<Pattern>),
}

impl Pattern {
    pub fn all(patterns: impl IntoIterator<Item = Pattern>) -> Self {
        Pattern::All(patterns.into_iter().collect())
    }

    pub fn at_input(slot: usize, pattern: Pattern) -> Self {
        Pattern::AtInput(slot, Box::new(pattern))
    }

    pub fn at_unique_output(category: NodeCategory, pattern: Pattern) -> Self {
        Pattern::AtUniqueOutput(category, Box::new(pattern))
    }

    /// Evaluates the pattern with `center` as the examined node.
    ///
    /// On failure, the reason and the path from the origin are appended to
    /// the context's diagnostics.
    pub fn check(&self, center: NodeId, cx: &mut MatchContext<'_>) -> bool {
        let graph = cx.graph;
        match self {
            Pattern::True => true,
            Pattern::Bind(capture) => {
                cx.bind(*capture, center);
                true
            }
            Pattern::All(patterns) => patterns.iter().all(|p| p.check(center, cx)),
            Pattern::ExactInputs(expected) => {
                let found = graph.req(center);
                if found != *expected {
                    cx.fail(format_args!(
                        "Unexpected number of input. Expected: {expected}. Found: {found}"
                    ));
                    return false;
                }
                true
            }
            Pattern::MinInputs(expected) => {
                let found = graph.req(center);
                if found < *expected {
                    cx.fail(format_args!(
                        "Too small number of input. Expected: {expected}. Found: {found}"
                    ));
                    return false;
                }
                true
            }
            Pattern::AtInput(slot, pattern) => {
                debug_assert!(
                    *slot < graph.req(center),
                    "check the arity before navigating to input {slot}"
                );
                let Some(input) = graph.input(center, *slot) else {
                    cx.fail(format_args!("Input at index {slot} is nullptr."));
                    return false;
                };
                cx.descend(input, Step::Input(*slot), |cx| pattern.check(input, cx))
            }
            Pattern::HasKind(category) => {
                if !category.matches(graph.kind(center)) {
                    cx.fail(format_args!("Unexpected type: {}.", graph.kind(center).name()));
                    return false;
                }
                true
            }
            Pattern::ExactOutputs(expected) => {
                let found = graph.out_count(center);
                if found != *expected {
                    cx.fail(format_args!(
                        "Unexpected number of outputs. Expected: {expected}. Found: {found}"
                    ));
                    return false;
                }
                true
            }
            Pattern::AtUniqueOutput(category, pattern) => {
                let candidates: Vec<NodeId> = graph
                    .outputs(center)
                    .iter()
                    .copied()
                    .filter(|&out| category.matches(graph.kind(out)))
                    .collect();
                let [output] = candidates[..] else {
                    cx.fail(format_args!(
                        "Non-unique output of expected type. Found: {}.",
                        candidates.len()
                    ));
                    cx.diagnostics.dump_all(graph, &candidates);
                    return false;
                };
                cx.descend(output, Step::Output, |cx| pattern.check(output, cx))
            }
        }
    }
}

/// Per-invariant, per-node evaluation state.
pub struct MatchContext<'g> {
    graph: &'g dyn GraphAccess,
    trace: Trace,
    diagnostics: Diagnostics,
    captures: Vec<(Capture, NodeId)>,
}

impl<'g> MatchContext<'g> {
    /// Creates a fresh context for checking `center`.
    pub fn new(graph: &'g dyn GraphAccess, center: NodeId) -> Self {
        Self {
            graph,
            trace: Trace::new(center),
            diagnostics: Diagnostics::new(),
            captures: Vec::new(),
        }
    }

    pub fn graph(&self) -> &'g dyn GraphAccess {
        self.graph
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn diagnostics(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Node last bound under `capture`, if any.
    pub fn captured(&self, capture: Capture) -> Option<NodeId> {
        self.captures
            .iter()
            .find(|(name, _)| *name == capture)
            .map(|&(_, node)| node)
    }

    /// Writes the current trace and `message` to the diagnostics.
    pub fn fail(&mut self, message: impl std::fmt::Display) {
        self.diagnostics.path(self.graph, &self.trace);
        self.diagnostics.line(message);
    }

    /// Appends a plain line without path information.
    pub fn note(&mut self, message: impl std::fmt::Display) {
        self.diagnostics.line(message);
    }

    /// Consumes the context, returning the diagnostic text.
    pub fn into_diagnostics(self) -> String {
        self.diagnostics.into_string()
    }

    fn bind(&mut self, capture: Capture, node: NodeId) {
        match self.captures.iter_mut().find(|(name, _)| *name == capture) {
            Some(slot) => slot.1 = node,
            None => self.captures.push((capture, node)),
        }
    }

    fn descend(&mut self, node: NodeId, step: Step, f: impl FnOnce(&mut Self) -> bool) -> bool {
        self.trace.push(node, step);
        let result = f(self);
        self.trace.pop();
        result
    }
}
