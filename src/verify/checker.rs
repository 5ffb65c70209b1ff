//! Worklist traversal running the invariant catalog over a graph.
//!
//! The traversal starts at the compilation root and follows input edges
//! only. Each node is checked once; nodes may be queued several times and
//! duplicates are dropped when popped. The pass never stops early: every
//! violation in the reachable graph is reported in a single run.
//!
//! The graph is never mutated. [`VerificationSummary::fingerprint`] records
//! the structural hash of what was checked.

use super::invariants::{
    ControlSuccessor, CountedLoopInvariants, IfProjections, MultiBranchNodeOut,
    OuterStripMinedLoopInvariants, PhiArity, RegionSelfLoop,
};
use super::sink::DiagnosticSink;
use super::{CheckResult, LocalInvariant};
use crate::arena::NodeId;
use crate::config::CheckerConfig;
use crate::fingerprint::{graph_fingerprint, HashValue};
use crate::graph::{CompilationUnit, GraphAccess};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Write as _;

/// Per-check outcome counts over one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckTally {
    pub name: String,
    pub valid: usize,
    pub failed: usize,
    pub not_applicable: usize,
}

impl CheckTally {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            valid: 0,
            failed: 0,
            not_applicable: 0,
        }
    }

    fn record(&mut self, result: &CheckResult) {
        match result {
            CheckResult::Valid => self.valid += 1,
            CheckResult::Failed(_) => self.failed += 1,
            CheckResult::NotApplicable => self.not_applicable += 1,
        }
    }
}

/// What a run visited and found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationSummary {
    /// True when the checker was disabled and nothing was visited.
    pub skipped: bool,
    pub nodes_visited: usize,
    /// Nodes with at least one failed check, in visiting order.
    pub failing_nodes: Vec<NodeId>,
    /// One entry per catalog entry, in catalog order.
    pub tallies: Vec<CheckTally>,
    /// Structural hash of the reachable graph; zero when skipped.
    pub fingerprint: HashValue,
}

impl VerificationSummary {
    pub fn is_success(&self) -> bool {
        self.failing_nodes.is_empty()
    }

    /// Tally of the named check, if it ran.
    pub fn tally(&self, name: &str) -> Option<&CheckTally> {
        self.tallies.iter().find(|tally| tally.name == name)
    }

    /// Total number of failed checks across all nodes.
    pub fn failure_count(&self) -> usize {
        self.tallies.iter().map(|tally| tally.failed).sum()
    }
}

/// An ordered catalog of local invariants plus the traversal driver.
pub struct Checker {
    checks: Vec<Box<dyn LocalInvariant>>,
    config: CheckerConfig,
}

impl Checker {
    /// The standard catalog with the default configuration.
    ///
    /// Order of entries only affects the order of report sections.
    pub fn make_default() -> Self {
        Self::with_config(CheckerConfig::default())
    }

    /// The standard catalog minus the checks `config` skips.
    pub fn with_config(config: CheckerConfig) -> Self {
        let catalog: [Box<dyn LocalInvariant>; 7] = [
            Box::new(IfProjections::new()),
            Box::new(PhiArity::new()),
            Box::new(ControlSuccessor),
            Box::new(RegionSelfLoop::new(config.strict_copy_regions)),
            Box::new(CountedLoopInvariants::new()),
            Box::new(OuterStripMinedLoopInvariants::new()),
            Box::new(MultiBranchNodeOut),
        ];
        let checks = catalog
            .into_iter()
            .filter(|check| !config.is_skipped(check.name()))
            .collect();
        Self { checks, config }
    }

    /// An empty catalog.
    pub fn empty(config: CheckerConfig) -> Self {
        Self {
            checks: Vec::new(),
            config,
        }
    }

    /// Appends a check to the catalog.
    pub fn push(&mut self, check: Box<dyn LocalInvariant>) {
        self.checks.push(check);
    }

    pub fn checks(&self) -> &[Box<dyn LocalInvariant>] {
        &self.checks
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Verifies the whole reachable graph; true iff no check failed.
    pub fn run(&self, unit: &dyn CompilationUnit, sink: &dyn DiagnosticSink) -> bool {
        self.run_with_summary(unit, sink).is_success()
    }

    /// Verifies the whole reachable graph and reports what was found.
    ///
    /// Every node with at least one failing check produces exactly one call
    /// to [`DiagnosticSink::flush_report`].
    pub fn run_with_summary(
        &self,
        unit: &dyn CompilationUnit,
        sink: &dyn DiagnosticSink,
    ) -> VerificationSummary {
        let mut tallies: Vec<CheckTally> = self
            .checks
            .iter()
            .map(|check| CheckTally::new(check.name()))
            .collect();
        let root = unit.root();

        if !self.config.enabled {
            tracing::debug!(%root, "graph verification disabled");
            return VerificationSummary {
                skipped: true,
                nodes_visited: 0,
                failing_nodes: Vec::new(),
                tallies,
                fingerprint: HashValue::zero(),
            };
        }

        let graph = unit.graph();
        tracing::debug!(%root, checks = self.checks.len(), "verifying graph invariants");

        let mut worklist = vec![root];
        let mut visited = HashSet::new();
        let mut failing_nodes = Vec::new();
        let mut failures: Vec<(&'static str, String)> = Vec::new();

        while let Some(node) = worklist.pop() {
            if !visited.insert(node) {
                continue;
            }
            worklist.extend((0..graph.req(node)).filter_map(|slot| graph.input(node, slot)));

            failures.clear();
            for (check, tally) in self.checks.iter().zip(&mut tallies) {
                let result = check.evaluate(graph, node);
                tally.record(&result);
                if let CheckResult::Failed(text) = result {
                    failures.push((check.name(), text));
                }
            }
            if failures.is_empty() {
                continue;
            }

            tracing::warn!(
                node = %node,
                kind = graph.kind(node).name(),
                failures = failures.len(),
                checks = ?failures.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
                "graph invariant violated"
            );
            sink.flush_report(&render_report(graph, node, &failures));
            failing_nodes.push(node);
        }

        let summary = VerificationSummary {
            skipped: false,
            nodes_visited: visited.len(),
            failing_nodes,
            tallies,
            fingerprint: graph_fingerprint(graph, root),
        };
        tracing::debug!(
            %root,
            nodes_visited = summary.nodes_visited,
            failing_nodes = summary.failing_nodes.len(),
            fingerprint = %summary.fingerprint,
            "graph verification finished"
        );
        summary
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::make_default()
    }
}

impl std::fmt::Debug for Checker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checker")
            .field("checks", &self.checks.iter().map(|c| c.name()).collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}

/// One node's report: failure count, node dump, then one section per check.
fn render_report(graph: &dyn GraphAccess, node: NodeId, failures: &[(&str, String)]) -> String {
    let count = failures.len();
    let mut report = format!(
        "{count} failure{} for node\n{}\n",
        if count == 1 { "" } else { "s" },
        graph.dump(node)
    );
    for (name, text) in failures {
        // Writing to a String cannot fail.
        let _ = write!(report, "# {name}:\n{text}\n");
    }
    report
}
