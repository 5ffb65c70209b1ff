//! Node categories of the sea-of-nodes IR.
//!
//! Categories form a closed enum. The predicate methods encode the usual
//! class hierarchy: every loop header (and `Root`) is a region, every loop
//! end is an `If`, `Call` is a safepoint, and `Catch`, `Jump` and
//! `NeverBranch` are multi-way branches.

use serde::{Deserialize, Serialize};

/// Kind of an IR node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Graph root; slot 0 is itself, remaining slots are method exits.
    Root,
    /// Method entry; slot 0 is itself.
    Start,
    /// Control-flow merge point.
    Region,
    /// Generic loop header.
    Loop,
    /// Loop header with an `int` trip counter.
    CountedLoop,
    /// Loop header with a `long` trip counter.
    LongCountedLoop,
    /// Outer loop wrapping a strip-mined counted loop.
    OuterStripMinedLoop,
    /// Two-way conditional branch.
    If,
    /// Backedge test of a `CountedLoop`.
    CountedLoopEnd,
    /// Backedge test of a `LongCountedLoop`.
    LongCountedLoopEnd,
    /// Backedge test of an `OuterStripMinedLoop`.
    OuterStripMinedLoopEnd,
    /// Taken projection of an `If`.
    IfTrue,
    /// Not-taken projection of an `If`.
    IfFalse,
    /// Branch whose second successor is never taken (infinite loop exits).
    NeverBranch,
    /// Plain safepoint poll.
    SafePoint,
    /// Call site (a safepoint with its own successor rules).
    Call,
    /// Exception dispatch after a call.
    Catch {
        /// Number of projections the node must feed.
        required_outcnt: usize,
    },
    /// Table switch.
    Jump {
        /// Number of projections the node must feed.
        required_outcnt: usize,
    },
    /// Projection of a `Catch`.
    CatchProj,
    /// Projection of a `Jump`.
    JumpProj,
    /// Control projection of a multi-output node such as `Start` or `Call`.
    CtrlProj,
    /// Unconditional control transfer.
    Goto,
    /// Method return.
    Return,
    /// Uncommon exit.
    Halt,
    /// Value merge governed by a region.
    Phi,
    /// Constant.
    Con,
    /// Comparison.
    Cmp,
    /// Boolean test of a comparison.
    Bool,
    /// Integer addition.
    Add,
}

impl NodeKind {
    /// Human-readable name used in node dumps and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Root => "Root",
            NodeKind::Start => "Start",
            NodeKind::Region => "Region",
            NodeKind::Loop => "Loop",
            NodeKind::CountedLoop => "CountedLoop",
            NodeKind::LongCountedLoop => "LongCountedLoop",
            NodeKind::OuterStripMinedLoop => "OuterStripMinedLoop",
            NodeKind::If => "If",
            NodeKind::CountedLoopEnd => "CountedLoopEnd",
            NodeKind::LongCountedLoopEnd => "LongCountedLoopEnd",
            NodeKind::OuterStripMinedLoopEnd => "OuterStripMinedLoopEnd",
            NodeKind::IfTrue => "IfTrue",
            NodeKind::IfFalse => "IfFalse",
            NodeKind::NeverBranch => "NeverBranch",
            NodeKind::SafePoint => "SafePoint",
            NodeKind::Call => "Call",
            NodeKind::Catch { .. } => "Catch",
            NodeKind::Jump { .. } => "Jump",
            NodeKind::CatchProj => "CatchProj",
            NodeKind::JumpProj => "JumpProj",
            NodeKind::CtrlProj => "CtrlProj",
            NodeKind::Goto => "Goto",
            NodeKind::Return => "Return",
            NodeKind::Halt => "Halt",
            NodeKind::Phi => "Phi",
            NodeKind::Con => "Con",
            NodeKind::Cmp => "Cmp",
            NodeKind::Bool => "Bool",
            NodeKind::Add => "Add",
        }
    }

    /// Stable one-byte tag used for canonical encodings.
    pub(crate) fn tag(&self) -> u8 {
        match self {
            NodeKind::Root => 0,
            NodeKind::Start => 1,
            NodeKind::Region => 2,
            NodeKind::Loop => 3,
            NodeKind::CountedLoop => 4,
            NodeKind::LongCountedLoop => 5,
            NodeKind::OuterStripMinedLoop => 6,
            NodeKind::If => 7,
            NodeKind::CountedLoopEnd => 8,
            NodeKind::LongCountedLoopEnd => 9,
            NodeKind::OuterStripMinedLoopEnd => 10,
            NodeKind::IfTrue => 11,
            NodeKind::IfFalse => 12,
            NodeKind::NeverBranch => 13,
            NodeKind::SafePoint => 14,
            NodeKind::Call => 15,
            NodeKind::Catch { .. } => 16,
            NodeKind::Jump { .. } => 17,
            NodeKind::CatchProj => 18,
            NodeKind::JumpProj => 19,
            NodeKind::CtrlProj => 20,
            NodeKind::Goto => 21,
            NodeKind::Return => 22,
            NodeKind::Halt => 23,
            NodeKind::Phi => 24,
            NodeKind::Con => 25,
            NodeKind::Cmp => 26,
            NodeKind::Bool => 27,
            NodeKind::Add => 28,
        }
    }

    /// Control-flow node.
    pub fn is_cfg(&self) -> bool {
        !matches!(
            self,
            NodeKind::Phi | NodeKind::Con | NodeKind::Cmp | NodeKind::Bool | NodeKind::Add
        )
    }

    pub fn is_root(&self) -> bool {
        matches!(self, NodeKind::Root)
    }

    pub fn is_start(&self) -> bool {
        matches!(self, NodeKind::Start)
    }

    /// Merge point: plain regions, every loop header and the root.
    pub fn is_region(&self) -> bool {
        matches!(
            self,
            NodeKind::Region
                | NodeKind::Loop
                | NodeKind::CountedLoop
                | NodeKind::LongCountedLoop
                | NodeKind::OuterStripMinedLoop
                | NodeKind::Root
        )
    }

    pub fn is_counted_loop(&self) -> bool {
        matches!(self, NodeKind::CountedLoop)
    }

    pub fn is_long_counted_loop(&self) -> bool {
        matches!(self, NodeKind::LongCountedLoop)
    }

    pub fn is_outer_strip_mined_loop(&self) -> bool {
        matches!(self, NodeKind::OuterStripMinedLoop)
    }

    /// Two-way branch, including every loop-end variant.
    pub fn is_if(&self) -> bool {
        matches!(
            self,
            NodeKind::If
                | NodeKind::CountedLoopEnd
                | NodeKind::LongCountedLoopEnd
                | NodeKind::OuterStripMinedLoopEnd
        )
    }

    pub fn is_counted_loop_end(&self) -> bool {
        matches!(self, NodeKind::CountedLoopEnd)
    }

    pub fn is_long_counted_loop_end(&self) -> bool {
        matches!(self, NodeKind::LongCountedLoopEnd)
    }

    /// Either counted-loop end.
    pub fn is_base_counted_loop_end(&self) -> bool {
        self.is_counted_loop_end() || self.is_long_counted_loop_end()
    }

    pub fn is_outer_strip_mined_loop_end(&self) -> bool {
        matches!(self, NodeKind::OuterStripMinedLoopEnd)
    }

    pub fn is_if_true(&self) -> bool {
        matches!(self, NodeKind::IfTrue)
    }

    pub fn is_if_false(&self) -> bool {
        matches!(self, NodeKind::IfFalse)
    }

    pub fn is_phi(&self) -> bool {
        matches!(self, NodeKind::Phi)
    }

    /// Any safepoint, calls included.
    pub fn is_safepoint(&self) -> bool {
        matches!(self, NodeKind::SafePoint | NodeKind::Call)
    }

    /// Exactly the plain safepoint poll.
    pub fn is_plain_safepoint(&self) -> bool {
        matches!(self, NodeKind::SafePoint)
    }

    pub fn is_catch(&self) -> bool {
        matches!(self, NodeKind::Catch { .. })
    }

    pub fn is_jump(&self) -> bool {
        matches!(self, NodeKind::Jump { .. })
    }

    pub fn is_never_branch(&self) -> bool {
        matches!(self, NodeKind::NeverBranch)
    }

    pub fn is_multi_branch(&self) -> bool {
        self.required_outcnt().is_some()
    }

    /// Declared successor count of a multi-way branch.
    pub fn required_outcnt(&self) -> Option<usize> {
        match self {
            NodeKind::Catch { required_outcnt } | NodeKind::Jump { required_outcnt } => {
                Some(*required_outcnt)
            }
            NodeKind::NeverBranch => Some(2),
            _ => None,
        }
    }
}

/// A named predicate over node kinds.
///
/// Stored inside pattern trees so matchers stay generic over "a test on a
/// node" while diagnostics can still name what was expected.
#[derive(Clone, Copy)]
pub struct NodeCategory {
    name: &'static str,
    test: fn(&NodeKind) -> bool,
}

impl NodeCategory {
    pub const REGION: NodeCategory = NodeCategory::new("Region", NodeKind::is_region);
    pub const IF_TRUE: NodeCategory = NodeCategory::new("IfTrue", NodeKind::is_if_true);
    pub const IF_FALSE: NodeCategory = NodeCategory::new("IfFalse", NodeKind::is_if_false);
    pub const SAFEPOINT: NodeCategory = NodeCategory::new("SafePoint", NodeKind::is_safepoint);
    pub const COUNTED_LOOP: NodeCategory =
        NodeCategory::new("CountedLoop", NodeKind::is_counted_loop);
    pub const COUNTED_LOOP_END: NodeCategory =
        NodeCategory::new("CountedLoopEnd", NodeKind::is_counted_loop_end);
    pub const BASE_COUNTED_LOOP_END: NodeCategory =
        NodeCategory::new("BaseCountedLoopEnd", NodeKind::is_base_counted_loop_end);
    pub const OUTER_STRIP_MINED_LOOP: NodeCategory =
        NodeCategory::new("OuterStripMinedLoop", NodeKind::is_outer_strip_mined_loop);

    /// Creates a category from a name and a kind predicate.
    pub const fn new(name: &'static str, test: fn(&NodeKind) -> bool) -> Self {
        Self { name, test }
    }

    /// Returns the category name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if `kind` belongs to this category.
    #[inline]
    pub fn matches(&self, kind: &NodeKind) -> bool {
        (self.test)(kind)
    }
}

impl std::fmt::Debug for NodeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeCategory({})", self.name)
    }
}
