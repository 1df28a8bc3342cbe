// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A caller-owned state holder tying discovery, tree building and reconciliation together.
//!
//! [`ExplorerState`] is what a display collaborator keeps between events: the discovered set,
//! its well-formed names in parsed form, and the published tree. It has no interior mutability and no event mechanism. The collaborator
//! calls the `on_*` methods as events arrive, in order, and re-renders from [`ExplorerState::tree`]
//! when told to.

use crate::{
    diagnostics::Diagnostics,
    discovery::{DiscoveredTestSet, DiscoveryBatch, ingest, parse_names},
    filter::FilterExpression,
    name::ParsedName,
    reconcile::{OutcomeReport, apply_outcomes, reconcile},
    tree::{ConcreteTree, NodeIndex, TreeBuilder},
};
use std::{collections::BTreeSet, mem};
use testtree_metadata::{TestResultBatch, TreeMode};
use tracing::debug;

/// The discovered set and the tree built from it.
#[derive(Clone, Debug)]
pub struct ExplorerState {
    tree_mode: TreeMode,
    discovered: DiscoveredTestSet,
    // Well-formed names in `discovered`. Each name is parsed once, when it is added.
    parsed: Vec<ParsedName>,
    tree: ConcreteTree,
}

impl ExplorerState {
    /// Creates an empty state.
    pub fn new(tree_mode: TreeMode) -> Self {
        Self {
            tree_mode,
            discovered: DiscoveredTestSet::new(),
            parsed: Vec::new(),
            tree: ConcreteTree::empty(tree_mode),
        }
    }

    /// Returns the tree mode.
    pub fn tree_mode(&self) -> TreeMode {
        self.tree_mode
    }

    /// Returns the discovered set.
    pub fn discovered(&self) -> &DiscoveredTestSet {
        &self.discovered
    }

    /// Returns the current tree.
    pub fn tree(&self) -> &ConcreteTree {
        &self.tree
    }

    /// A new discovery has started: forget everything known so far.
    pub fn on_discovery_started(&mut self) {
        self.discovered = mem::take(&mut self.discovered).clear();
        self.parsed.clear();
        self.tree = ConcreteTree::empty(self.tree_mode);
    }

    /// A discovery has finished: replace the discovered set and rebuild the tree.
    pub fn on_discovery_finished(
        &mut self,
        batches: impl IntoIterator<Item = DiscoveryBatch>,
    ) -> Diagnostics {
        let outcome = ingest(mem::take(&mut self.discovered), batches);
        self.discovered = outcome.discovered;
        self.parsed = outcome.parsed;
        self.rebuild();
        outcome.diagnostics
    }

    /// A result batch has arrived: update the discovered set, rebuild the tree if needed, and
    /// match outcomes against it.
    ///
    /// Only names this batch adds to the discovered set are parsed, so a malformed name is
    /// reported by the batch that introduced it and not again afterwards.
    pub fn on_results(&mut self, batch: &TestResultBatch) -> ResultsUpdate {
        let replace = batch.clear_previous_test_results;
        let previous = mem::take(&mut self.discovered);
        let added: BTreeSet<&str> = batch
            .test_results
            .iter()
            .map(|record| record.full_name.as_str())
            .filter(|name| replace || !previous.contains(name))
            .collect();
        let (parsed, mut diagnostics) = parse_names(added);

        let reconciliation = reconcile(previous, &batch.test_results, replace);
        self.discovered = reconciliation.discovered;
        if replace {
            self.parsed = parsed;
        } else {
            self.parsed.extend(parsed);
        }
        if reconciliation.rebuild_required {
            self.rebuild();
        }

        let mut report = apply_outcomes(&self.tree, &batch.test_results);
        diagnostics.extend(mem::take(&mut report.diagnostics));
        report.diagnostics = diagnostics;

        ResultsUpdate {
            rebuilt: reconciliation.rebuild_required,
            report,
        }
    }

    /// Changes the tree mode, rebuilding the tree if it differs.
    ///
    /// Returns true if the tree was rebuilt.
    pub fn set_tree_mode(&mut self, tree_mode: TreeMode) -> bool {
        if self.tree_mode == tree_mode {
            return false;
        }
        self.tree_mode = tree_mode;
        self.rebuild();
        true
    }

    /// Prepares a run of `include` (or everything) without the nodes in `exclude`.
    pub fn run_request(&self, include: Option<NodeIndex>, exclude: &[NodeIndex]) -> RunRequest {
        let started = match include {
            Some(index) => self.tree.descendants(index),
            None => self.tree.descendants(NodeIndex::ROOT),
        };
        RunRequest {
            filter: FilterExpression::for_run(&self.tree, include, exclude.iter().copied()),
            started,
        }
    }

    fn rebuild(&mut self) {
        self.tree = ConcreteTree::build(&TreeBuilder::build(&self.parsed), self.tree_mode);
        debug!(
            generation = self.discovered.generation(),
            "rebuilt tree with {} tests",
            self.tree.test_count(),
        );
    }
}

/// The result of [`ExplorerState::on_results`].
#[derive(Clone, Debug)]
pub struct ResultsUpdate {
    /// True if the tree was rebuilt and must be re-rendered.
    pub rebuilt: bool,

    /// Outcomes matched against the (possibly rebuilt) tree. Diagnostics include names added by
    /// the batch that failed to parse.
    pub report: OutcomeReport,
}

/// What a collaborator needs to start a run.
#[derive(Clone, Debug)]
pub struct RunRequest {
    /// The filter to pass to the test runner. Empty if every test is selected.
    pub filter: FilterExpression,

    /// The nodes to mark as started, in display order.
    pub started: Vec<NodeIndex>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diagnostics::DiagnosticKind, reconcile::NodeOutcome};
    use testtree_metadata::{OutcomeKind, TestOutcomeRecord};

    fn batch(clear: bool, records: Vec<TestOutcomeRecord>) -> TestResultBatch {
        TestResultBatch {
            clear_previous_test_results: clear,
            test_results: records,
        }
    }

    #[test]
    fn discovery_lifecycle() {
        let mut state = ExplorerState::new(TreeMode::Merged);
        let diagnostics = state.on_discovery_finished([DiscoveryBatch::new([
            "X.Y.Z.Method()",
            "A..B",
        ])]);
        assert_eq!(diagnostics.count(DiagnosticKind::MalformedName), 1);
        assert_eq!(state.discovered().len(), 1);
        assert!(state.tree().find("X.Y.Z").is_some());

        state.on_discovery_started();
        assert!(state.discovered().is_empty());
        assert!(state.tree().is_empty());
        assert_eq!(state.discovered().generation(), 2);
    }

    #[test]
    fn results_extend_tree() {
        let mut state = ExplorerState::new(TreeMode::Literal);
        state.on_discovery_finished([DiscoveryBatch::new(["A.B.Test1"])]);

        let update = state.on_results(&batch(
            false,
            vec![TestOutcomeRecord::new("A.B.Test2", OutcomeKind::Passed)],
        ));
        assert!(update.rebuilt);
        assert!(state.tree().find("A.B.Test2").is_some());
        assert_eq!(update.report.get("A.B.Test2"), Some(&NodeOutcome::Passed));

        let update = state.on_results(&batch(
            false,
            vec![TestOutcomeRecord::new("A.B.Test1", OutcomeKind::NotExecuted)],
        ));
        assert!(!update.rebuilt);
        assert_eq!(update.report.get("A.B.Test1"), Some(&NodeOutcome::Skipped));
    }

    #[test]
    fn results_replace_tree() {
        let mut state = ExplorerState::new(TreeMode::Literal);
        state.on_discovery_finished([DiscoveryBatch::new(["A.B.Test1", "A.B.Test2"])]);

        let update = state.on_results(&batch(
            true,
            vec![
                TestOutcomeRecord::new("A.B.Test2", OutcomeKind::Failed).with_message("boom"),
                TestOutcomeRecord::new("Bad..Name", OutcomeKind::Passed),
            ],
        ));
        assert!(update.rebuilt);
        assert!(state.tree().find("A.B.Test1").is_none());
        assert!(state.tree().find("A.B.Test2").is_some());

        // The malformed name can't be placed in the tree, so its outcome is also unmatched.
        let diagnostics = &update.report.diagnostics;
        assert_eq!(diagnostics.count(DiagnosticKind::MalformedName), 1);
        assert_eq!(diagnostics.count(DiagnosticKind::UnmatchedOutcome), 1);
    }

    #[test]
    fn malformed_result_names_reported_once() {
        let mut state = ExplorerState::new(TreeMode::Literal);
        state.on_discovery_finished([DiscoveryBatch::new(["A.Test1"])]);

        let first = state.on_results(&batch(
            false,
            vec![TestOutcomeRecord::new("Bad..Name", OutcomeKind::Passed)],
        ));
        assert!(first.rebuilt);
        assert_eq!(first.report.diagnostics.count(DiagnosticKind::MalformedName), 1);

        for name in ["A.Test2", "A.Test3"] {
            let update = state.on_results(&batch(
                false,
                vec![TestOutcomeRecord::new(name, OutcomeKind::Passed)],
            ));
            assert!(update.rebuilt);
            assert_eq!(
                update.report.diagnostics.count(DiagnosticKind::MalformedName),
                0,
                "{name} does not re-report earlier malformed names"
            );
        }
        assert!(!state.set_tree_mode(TreeMode::Literal));
        assert!(state.set_tree_mode(TreeMode::Merged));

        // The malformed name stays in the discovered set, but never in the tree.
        assert_eq!(state.discovered().len(), 4);
        assert_eq!(state.tree().test_count(), 3);

        // A batch repeating the name doesn't add it again, so nothing is reported.
        let repeat = state.on_results(&batch(
            false,
            vec![TestOutcomeRecord::new("Bad..Name", OutcomeKind::Passed)],
        ));
        assert!(!repeat.rebuilt);
        assert_eq!(repeat.report.diagnostics.count(DiagnosticKind::MalformedName), 0);
        assert_eq!(repeat.report.diagnostics.count(DiagnosticKind::UnmatchedOutcome), 1);
    }

    #[test]
    fn change_tree_mode() {
        let mut state = ExplorerState::new(TreeMode::Literal);
        state.on_discovery_finished([DiscoveryBatch::new(["X.Y.Z.Method()"])]);
        assert!(state.tree().find("X.Y").is_some());

        assert!(state.set_tree_mode(TreeMode::Merged));
        assert!(!state.set_tree_mode(TreeMode::Merged));
        assert_eq!(state.tree().tree_mode(), TreeMode::Merged);
        assert!(state.tree().find("X.Y").is_none());
        assert!(state.tree().find("X.Y.Z.Method()").is_some());
    }

    #[test]
    fn run_requests() {
        let mut state = ExplorerState::new(TreeMode::Literal);
        state.on_discovery_finished([DiscoveryBatch::new(["A.B.Test1", "A.C.Test2"])]);
        let tree = state.tree();
        let b = tree.find("A.B").unwrap();
        let c = tree.find("A.C").unwrap();

        let request = state.run_request(Some(b), &[]);
        assert_eq!(request.filter.to_string(), "FullyQualifiedName~A.B");
        assert_eq!(request.started.len(), 2);

        let request = state.run_request(None, &[c]);
        assert_eq!(request.filter.to_string(), "FullyQualifiedName!~A.C");
        assert_eq!(request.started.len(), state.tree().len());
    }
}
