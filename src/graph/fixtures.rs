//! Well-formed sample graphs shared by the test modules.

use super::{Compilation, IrGraph, NodeKind};
use crate::arena::NodeId;

/// Handles into the diamond-shaped method built by [`diamond`].
pub(crate) struct Diamond {
    pub unit: Compilation,
    pub root: NodeId,
    pub start: NodeId,
    pub iff: NodeId,
    pub if_true: NodeId,
    pub if_false: NodeId,
    pub region: NodeId,
    pub phi: NodeId,
    pub ret: NodeId,
    pub con: NodeId,
}

/// `if (a < b) { } else { }` merged by a region with one phi.
pub(crate) fn diamond() -> Diamond {
    let mut g = IrGraph::new();
    let root = g.add_self_node(NodeKind::Root, &[None]).unwrap();
    let start = g.add_self_node(NodeKind::Start, &[Some(root)]).unwrap();
    let ctrl = g.add_node(NodeKind::CtrlProj, &[Some(start)]).unwrap();
    let a = g.add_node(NodeKind::Con, &[None]).unwrap();
    let b = g.add_node(NodeKind::Con, &[None]).unwrap();
    let cmp = g.add_node(NodeKind::Cmp, &[None, Some(a), Some(b)]).unwrap();
    let test = g.add_node(NodeKind::Bool, &[None, Some(cmp)]).unwrap();
    let iff = g.add_node(NodeKind::If, &[Some(ctrl), Some(test)]).unwrap();
    let if_true = g.add_node(NodeKind::IfTrue, &[Some(iff)]).unwrap();
    let if_false = g.add_node(NodeKind::IfFalse, &[Some(iff)]).unwrap();
    let region = g
        .add_self_node(NodeKind::Region, &[Some(if_true), Some(if_false)])
        .unwrap();
    let phi = g
        .add_node(NodeKind::Phi, &[Some(region), Some(a), Some(b)])
        .unwrap();
    let ret = g.add_node(NodeKind::Return, &[Some(region), Some(phi)]).unwrap();
    g.set_input(root, 1, Some(ret)).unwrap();
    Diamond {
        unit: Compilation::new(g, root),
        root,
        start,
        iff,
        if_true,
        if_false,
        region,
        phi,
        ret,
        con: a,
    }
}

pub(crate) fn diamond_method() -> Compilation {
    diamond().unit
}

/// Handles into the strip-mined loop built by [`strip_mined_loop`].
pub(crate) struct StripMined {
    pub unit: Compilation,
    pub outer: NodeId,
    pub counted: NodeId,
    pub loop_end: NodeId,
    pub backedge: NodeId,
    pub loop_exit: NodeId,
    pub safepoint: NodeId,
    pub outer_end: NodeId,
    pub outer_backedge: NodeId,
}

/// A counted loop nested in its outer strip-mined loop.
///
/// ```text
/// CountedLoopEnd -> IfFalse -> SafePoint -> OuterStripMinedLoopEnd -> IfTrue
///     -> OuterStripMinedLoop -> CountedLoop
/// ```
pub(crate) fn strip_mined_loop() -> StripMined {
    let mut g = IrGraph::new();
    let root = g.add_self_node(NodeKind::Root, &[None]).unwrap();
    let start = g.add_self_node(NodeKind::Start, &[Some(root)]).unwrap();
    let ctrl = g.add_node(NodeKind::CtrlProj, &[Some(start)]).unwrap();
    let zero = g.add_node(NodeKind::Con, &[None]).unwrap();
    let one = g.add_node(NodeKind::Con, &[None]).unwrap();
    let limit = g.add_node(NodeKind::Con, &[None]).unwrap();

    let outer = g
        .add_self_node(NodeKind::OuterStripMinedLoop, &[Some(ctrl), None])
        .unwrap();
    let counted = g
        .add_self_node(NodeKind::CountedLoop, &[Some(outer), None])
        .unwrap();
    let iv = g
        .add_node(NodeKind::Phi, &[Some(counted), Some(zero), None])
        .unwrap();
    let incr = g.add_node(NodeKind::Add, &[None, Some(iv), Some(one)]).unwrap();
    g.set_input(iv, 2, Some(incr)).unwrap();
    let cmp = g.add_node(NodeKind::Cmp, &[None, Some(incr), Some(limit)]).unwrap();
    let test = g.add_node(NodeKind::Bool, &[None, Some(cmp)]).unwrap();

    let loop_end = g
        .add_node(NodeKind::CountedLoopEnd, &[Some(counted), Some(test)])
        .unwrap();
    let backedge = g.add_node(NodeKind::IfTrue, &[Some(loop_end)]).unwrap();
    g.set_input(counted, 2, Some(backedge)).unwrap();
    let loop_exit = g.add_node(NodeKind::IfFalse, &[Some(loop_end)]).unwrap();

    let safepoint = g.add_node(NodeKind::SafePoint, &[Some(loop_exit)]).unwrap();
    let outer_end = g
        .add_node(NodeKind::OuterStripMinedLoopEnd, &[Some(safepoint), Some(test)])
        .unwrap();
    let outer_backedge = g.add_node(NodeKind::IfTrue, &[Some(outer_end)]).unwrap();
    g.set_input(outer, 2, Some(outer_backedge)).unwrap();
    let outer_exit = g.add_node(NodeKind::IfFalse, &[Some(outer_end)]).unwrap();

    let ret = g.add_node(NodeKind::Return, &[Some(outer_exit), Some(incr)]).unwrap();
    g.set_input(root, 1, Some(ret)).unwrap();
    StripMined {
        unit: Compilation::new(g, root),
        outer,
        counted,
        loop_end,
        backedge,
        loop_exit,
        safepoint,
        outer_end,
        outer_backedge,
    }
}

/// A root whose only input is itself.
pub(crate) fn self_loop_root() -> Compilation {
    let mut g = IrGraph::new();
    let root = g.add_self_node(NodeKind::Root, &[]).unwrap();
    Compilation::new(g, root)
}
