//! The catalog of local graph invariants.
//!
//! Each invariant applies to one family of nodes and is either expressed as
//! a [`Pattern`] (plus an optional post-match step reading its captures) or
//! written directly against [`GraphAccess`](crate::graph::GraphAccess).

use super::pattern::{Capture, MatchContext, Pattern};
use super::LocalInvariant;
use crate::arena::NodeId;
use crate::graph::{NodeCategory, NodeKind};

/// Slot of a loop header holding the backedge control.
const LOOP_BACK_CONTROL: usize = 2;

/// An `If` feeds exactly one `IfTrue` and one `IfFalse`, and nothing else.
#[derive(Debug)]
pub struct IfProjections {
    pattern: Pattern,
}

impl IfProjections {
    pub fn new() -> Self {
        Self {
            pattern: Pattern::all([
                Pattern::ExactOutputs(2),
                Pattern::at_unique_output(NodeCategory::IF_TRUE, Pattern::True),
                Pattern::at_unique_output(NodeCategory::IF_FALSE, Pattern::True),
            ]),
        }
    }
}

impl Default for IfProjections {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalInvariant for IfProjections {
    fn name(&self) -> &'static str {
        "IfProjections"
    }

    fn applies_to(&self, kind: &NodeKind) -> bool {
        kind.is_if()
    }

    fn verify(&self, center: NodeId, cx: &mut MatchContext<'_>) -> bool {
        self.pattern.check(center, cx)
    }
}

/// A `Phi` hangs off a region and has exactly as many inputs as it.
#[derive(Debug)]
pub struct PhiArity {
    pattern: Pattern,
}

impl PhiArity {
    const REGION: Capture = Capture("region");

    pub fn new() -> Self {
        Self {
            pattern: Pattern::all([
                Pattern::MinInputs(1),
                Pattern::at_input(
                    0,
                    Pattern::all([
                        Pattern::HasKind(NodeCategory::REGION),
                        Pattern::Bind(Self::REGION),
                    ]),
                ),
            ]),
        }
    }
}

impl Default for PhiArity {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalInvariant for PhiArity {
    fn name(&self) -> &'static str {
        "PhiArity"
    }

    fn applies_to(&self, kind: &NodeKind) -> bool {
        kind.is_phi()
    }

    fn verify(&self, center: NodeId, cx: &mut MatchContext<'_>) -> bool {
        if !self.pattern.check(center, cx) {
            return false;
        }
        let Some(region) = cx.captured(Self::REGION) else {
            unreachable!("a successful PhiArity match binds the region");
        };
        let graph = cx.graph();
        let (phi_arity, region_arity) = (graph.req(center), graph.req(region));
        if phi_arity != region_arity {
            cx.fail(format_args!(
                "Phi nodes must have the same arity as their Region node. \
                 Phi arity: {phi_arity}; Region arity: {region_arity}."
            ));
            return false;
        }
        true
    }
}

/// How many control successors a control node must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SuccessorRule {
    /// Branches, start, root, regions and never-branches.
    ExactlyTwo,
    /// Plain safepoints; with two successors one must be the root.
    OneOrTwoWithRoot,
    /// Catch and jump dispatch.
    AtLeastOne,
    /// Everything else.
    ExactlyOne,
}

impl SuccessorRule {
    /// Only meaningful for control nodes.
    fn classify(kind: &NodeKind) -> Self {
        if kind.is_if()
            || kind.is_start()
            || kind.is_root()
            || kind.is_region()
            || kind.is_never_branch()
        {
            SuccessorRule::ExactlyTwo
        } else if kind.is_plain_safepoint() {
            SuccessorRule::OneOrTwoWithRoot
        } else if kind.is_catch() || kind.is_jump() {
            SuccessorRule::AtLeastOne
        } else {
            SuccessorRule::ExactlyOne
        }
    }
}

/// Control nodes have the number of control successors their shape demands.
#[derive(Debug, Default)]
pub struct ControlSuccessor;

impl LocalInvariant for ControlSuccessor {
    fn name(&self) -> &'static str {
        "ControlSuccessor"
    }

    fn applies_to(&self, kind: &NodeKind) -> bool {
        kind.is_cfg()
    }

    fn verify(&self, center: NodeId, cx: &mut MatchContext<'_>) -> bool {
        let graph = cx.graph();
        let kind = graph.kind(center);
        let rule = SuccessorRule::classify(kind);
        let successors: Vec<NodeId> = graph
            .outputs(center)
            .iter()
            .copied()
            .filter(|&out| graph.kind(out).is_cfg())
            .collect();
        let found = successors.len();
        let name = kind.name();

        match rule {
            SuccessorRule::ExactlyTwo if found != 2 => {
                cx.note(format_args!(
                    "{name} node must have exactly two control successors. Found {found}."
                ));
            }
            SuccessorRule::OneOrTwoWithRoot if !(1..=2).contains(&found) => {
                cx.note(format_args!(
                    "{name} node must have one or two control successors. Found {found}."
                ));
            }
            SuccessorRule::OneOrTwoWithRoot
                if found == 2 && !successors.iter().any(|&s| graph.kind(s).is_root()) =>
            {
                cx.note(format_args!(
                    "One of the two control outputs of a {name} node must be Root."
                ));
            }
            SuccessorRule::AtLeastOne if found < 1 => {
                cx.note(format_args!(
                    "{name} node must have at least one control successors. Found {found}."
                ));
                return false;
            }
            SuccessorRule::ExactlyOne if found != 1 => {
                cx.note(format_args!(
                    "Ordinary CFG nodes must have exactly one successor. Found {found}."
                ));
            }
            _ => return true,
        }
        cx.diagnostics().dump_all(graph, &successors);
        false
    }
}

/// Regions, start and root refer to themselves through slot 0.
///
/// A region whose slot 0 is unset is a copy region and must have exactly
/// one other live input.
#[derive(Debug)]
pub struct RegionSelfLoop {
    strict_copy_regions: bool,
}

impl RegionSelfLoop {
    /// With `strict_copy_regions` off, a malformed copy region is only
    /// logged and the check passes.
    pub fn new(strict_copy_regions: bool) -> Self {
        Self { strict_copy_regions }
    }
}

impl Default for RegionSelfLoop {
    fn default() -> Self {
        Self::new(true)
    }
}

impl LocalInvariant for RegionSelfLoop {
    fn name(&self) -> &'static str {
        "RegionSelfLoop"
    }

    fn applies_to(&self, kind: &NodeKind) -> bool {
        kind.is_region() || kind.is_start() || kind.is_root()
    }

    fn verify(&self, center: NodeId, cx: &mut MatchContext<'_>) -> bool {
        let graph = cx.graph();
        let kind = graph.kind(center);
        let name = kind.name();
        if graph.req(center) == 0 {
            cx.note(format_args!("{name} nodes must have at least one input."));
            return false;
        }

        match graph.input(center, 0) {
            Some(this) if this == center => true,
            None if kind.is_region() => {
                let live: Vec<NodeId> = (0..graph.req(center))
                    .filter_map(|slot| graph.input(center, slot))
                    .collect();
                if live.len() == 1 {
                    return true;
                }
                if !self.strict_copy_regions {
                    tracing::debug!(
                        node = %center,
                        live_inputs = live.len(),
                        "copy region without a single live input"
                    );
                    return true;
                }
                cx.note(format_args!(
                    "{name} copy nodes must have exactly one non-null input. Found: {}.",
                    live.len()
                ));
                cx.diagnostics().dump_all(graph, &live);
                false
            }
            _ => {
                cx.note(format_args!(
                    "{name} nodes' 0-th input must be itself or nullptr (for a copy Region)."
                ));
                false
            }
        }
    }
}

/// `CountedLoopEnd -> IfTrue -> CountedLoop`, with matching counter widths.
#[derive(Debug)]
pub struct CountedLoopInvariants {
    pattern: Pattern,
}

impl CountedLoopInvariants {
    const LOOP_END: Capture = Capture("loop_end");

    pub fn new() -> Self {
        Self {
            pattern: Pattern::all([
                Pattern::ExactInputs(3),
                Pattern::at_input(
                    LOOP_BACK_CONTROL,
                    Pattern::all([
                        Pattern::HasKind(NodeCategory::IF_TRUE),
                        Pattern::MinInputs(1),
                        Pattern::at_input(
                            0,
                            Pattern::all([
                                Pattern::HasKind(NodeCategory::BASE_COUNTED_LOOP_END),
                                Pattern::Bind(Self::LOOP_END),
                            ]),
                        ),
                    ]),
                ),
            ]),
        }
    }
}

impl Default for CountedLoopInvariants {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalInvariant for CountedLoopInvariants {
    fn name(&self) -> &'static str {
        "CountedLoopInvariants"
    }

    fn applies_to(&self, kind: &NodeKind) -> bool {
        kind.is_counted_loop() || kind.is_long_counted_loop()
    }

    fn verify(&self, center: NodeId, cx: &mut MatchContext<'_>) -> bool {
        if !self.pattern.check(center, cx) {
            return false;
        }
        let Some(loop_end) = cx.captured(Self::LOOP_END) else {
            unreachable!("a successful CountedLoopInvariants match binds the loop end");
        };
        let graph = cx.graph();
        let is_long = graph.kind(center).is_long_counted_loop();
        let end = graph.kind(loop_end);
        if is_long && end.is_counted_loop_end() {
            cx.note("A CountedLoopEnd is the backedge of a LongCountedLoop.");
            return false;
        }
        if !is_long && end.is_long_counted_loop_end() {
            cx.note("A LongCountedLoopEnd is the backedge of a CountedLoop.");
            return false;
        }
        true
    }
}

/// Shape around an outer strip-mined loop end:
///
/// ```text
/// CountedLoopEnd -> IfFalse -> SafePoint -> OuterStripMinedLoopEnd[center]
///     -> IfTrue -> OuterStripMinedLoop -> CountedLoop
/// ```
#[derive(Debug)]
pub struct OuterStripMinedLoopInvariants {
    pattern: Pattern,
}

impl OuterStripMinedLoopInvariants {
    pub fn new() -> Self {
        let inner_exit = Pattern::all([
            Pattern::HasKind(NodeCategory::SAFEPOINT),
            Pattern::MinInputs(1),
            Pattern::at_input(
                0,
                Pattern::all([
                    Pattern::HasKind(NodeCategory::IF_FALSE),
                    Pattern::MinInputs(1),
                    Pattern::at_input(0, Pattern::HasKind(NodeCategory::COUNTED_LOOP_END)),
                ]),
            ),
        ]);
        let outer_backedge = Pattern::at_unique_output(
            NodeCategory::IF_TRUE,
            Pattern::at_unique_output(
                NodeCategory::OUTER_STRIP_MINED_LOOP,
                Pattern::at_unique_output(NodeCategory::COUNTED_LOOP, Pattern::True),
            ),
        );
        Self {
            pattern: Pattern::all([
                Pattern::ExactInputs(2),
                Pattern::at_input(0, inner_exit),
                outer_backedge,
            ]),
        }
    }
}

impl Default for OuterStripMinedLoopInvariants {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalInvariant for OuterStripMinedLoopInvariants {
    fn name(&self) -> &'static str {
        "OuterStripMinedLoopInvariants"
    }

    fn applies_to(&self, kind: &NodeKind) -> bool {
        kind.is_outer_strip_mined_loop_end()
    }

    fn verify(&self, center: NodeId, cx: &mut MatchContext<'_>) -> bool {
        self.pattern.check(center, cx)
    }
}

/// A multi-way branch feeds at least as many outputs as it declares.
#[derive(Debug, Default)]
pub struct MultiBranchNodeOut;

impl LocalInvariant for MultiBranchNodeOut {
    fn name(&self) -> &'static str {
        "MultiBranchNodeOut"
    }

    fn applies_to(&self, kind: &NodeKind) -> bool {
        kind.is_multi_branch()
    }

    fn verify(&self, center: NodeId, cx: &mut MatchContext<'_>) -> bool {
        let graph = cx.graph();
        let Some(required) = graph.kind(center).required_outcnt() else {
            return true;
        };
        let outcnt = graph.out_count(center);
        if required > outcnt {
            cx.note(format_args!(
                "The required_outcnt of a MultiBranch node must be smaller than or equal to \
                 its outcnt. But required_outcnt={required} vs. outcnt={outcnt}"
            ));
            return false;
        }
        true
    }
}
