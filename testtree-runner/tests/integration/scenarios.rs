// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use color_eyre::eyre::{Result, ensure};
use indoc::indoc;
use maplit::btreeset;
use pretty_assertions::assert_eq;
use testtree_metadata::{OutcomeKind, TestOutcomeRecord, TestResultBatch, TreeMode};
use testtree_runner::{
    diagnostics::{Diagnostic, DiagnosticKind},
    discovery::{DiscoveredTestSet, DiscoveryBatch, ingest},
    explorer::ExplorerState,
    filter::symbol_lookup_name,
    reconcile::{NodeOutcome, apply_outcomes, reconcile},
    tree::compact,
};

#[test]
fn namespace_grouping() -> Result<()> {
    let tree = abstract_tree(&["A.B.Test1", "A.B.Test2", "A.C.Test3"])?;

    ensure!(tree.tests().is_empty(), "root has no tests");
    assert_eq!(tree.sub_trees().keys().collect::<Vec<_>>(), vec!["A"]);

    let a = &tree.sub_trees()["A"];
    assert_eq!(a.sub_trees().keys().collect::<Vec<_>>(), vec!["B", "C"]);
    assert_eq!(
        a.sub_trees()["B"].tests(),
        &btreeset! {"Test1".to_owned(), "Test2".to_owned()}
    );
    assert_eq!(a.sub_trees()["C"].tests(), &btreeset! {"Test3".to_owned()});
    Ok(())
}

#[test]
fn merged_single_chain() -> Result<()> {
    let tree = compact(&abstract_tree(&["X.Y.Z.Method()"])?);

    assert_eq!(tree.sub_trees().keys().collect::<Vec<_>>(), vec!["X.Y.Z"]);
    assert_eq!(
        tree.sub_trees()["X.Y.Z"].tests(),
        &btreeset! {"Method()".to_owned()}
    );
    Ok(())
}

#[test]
fn incremental_results() {
    let discovered = DiscoveredTestSet::from_names(["A.B.Test1"]);
    let batch = [TestOutcomeRecord::new("A.B.Test2", OutcomeKind::Passed)];

    let result = reconcile(discovered, &batch, false);
    assert_eq!(
        result.discovered.names(),
        &btreeset! {"A.B.Test1".to_owned(), "A.B.Test2".to_owned()}
    );
    assert!(result.rebuild_required);
}

#[test]
fn malformed_entry_in_large_batch() {
    let mut names: Vec<String> = (0..99)
        .map(|i| format!("Company.Suite{}.Class{}.Test{i}", i % 7, i % 3))
        .collect();
    names.insert(42, "A..B".to_owned());

    let outcome = ingest(DiscoveredTestSet::new(), [DiscoveryBatch::new(names)]);
    assert_eq!(outcome.parsed.len(), 99);
    assert_eq!(outcome.discovered.len(), 99);
    assert_eq!(outcome.diagnostics.len(), 1);

    match outcome.diagnostics.iter().next() {
        Some(Diagnostic::MalformedName(error)) => assert_eq!(error.name(), "A..B"),
        other => panic!("expected a malformed name diagnostic, found {other:?}"),
    }
}

#[test]
fn unmatched_outcome() -> Result<()> {
    let tree = concrete_tree(&["A.B.Test1"], TreeMode::Literal)?;
    let batch = [TestOutcomeRecord::new("Ghost.Test", OutcomeKind::Failed)];

    let report = apply_outcomes(&tree, &batch);
    ensure!(report.outcomes.is_empty(), "no node was annotated");
    assert_eq!(report.diagnostics.count(DiagnosticKind::UnmatchedOutcome), 1);
    assert_eq!(report.diagnostics.len(), 1);
    Ok(())
}

#[test]
fn literal_listing_shape() {
    let mut state = ExplorerState::new(TreeMode::Literal);
    let diagnostics = state.on_discovery_finished([DiscoveryBatch::from_lines(LISTING)]);
    assert!(diagnostics.is_empty());

    assert_eq!(
        render(state.tree()),
        indoc! {r#"
            Company/
              Product/
                Integration/
                  RoundTrip("a.b","(x)")
                Tests/
                  Generic<System.Int32>/
                    Works
                  Outer+Inner/
                    NestedWorks
                  ParserTests/
                    ParsesEmptyInput
                    ParsesNested(System.String,System.Int32)
                    ParsesNested(System.String,System.Int64)
            Standalone
        "#}
    );
}

#[test]
fn merged_listing_shape() {
    let mut state = ExplorerState::new(TreeMode::Merged);
    state.on_discovery_finished([DiscoveryBatch::from_lines(LISTING)]);

    assert_eq!(
        render(state.tree()),
        indoc! {r#"
            Company.Product/
              Integration/
                RoundTrip("a.b","(x)")
              Tests/
                Generic<System.Int32>/
                  Works
                Outer+Inner/
                  NestedWorks
                ParserTests/
                  ParsesEmptyInput
                  ParsesNested(System.String,System.Int32)
                  ParsesNested(System.String,System.Int64)
            Standalone
        "#}
    );
}

#[test]
fn full_run_lifecycle() {
    let mut state = ExplorerState::new(TreeMode::Merged);
    state.on_discovery_started();
    state.on_discovery_finished([
        DiscoveryBatch::from_lines(LISTING),
        DiscoveryBatch::new(["Other.Project.Test"]),
    ]);
    assert_eq!(state.discovered().len(), 8);

    let batch: TestResultBatch = serde_json::from_str(indoc! {r#"
        {
            "clearPreviousTestResults": false,
            "testResults": [
                {
                    "fullName": "Company.Product.Tests.ParserTests.ParsesEmptyInput",
                    "outcome": "Passed",
                    "duration": "15ms"
                },
                {
                    "fullName": "Company.Product.Tests.ParserTests.ParsesNested(System.String,System.Int32)",
                    "outcome": "Failed",
                    "message": "Assert.Equal() Failure"
                },
                {
                    "fullName": "Standalone",
                    "outcome": "NotExecuted"
                },
                {
                    "fullName": "Company.Product.Tests.Generic<System.Int32>.Works",
                    "outcome": "Inconclusive"
                }
            ]
        }
    "#})
    .expect("valid batch");

    let update = state.on_results(&batch);
    assert!(!update.rebuilt, "every name was already discovered");

    let report = update.report;
    assert_eq!(
        report.get("Company.Product.Tests.ParserTests.ParsesEmptyInput"),
        Some(&NodeOutcome::Passed)
    );
    assert_eq!(
        report.get("Company.Product.Tests.ParserTests.ParsesNested(System.String,System.Int32)"),
        Some(&NodeOutcome::Failed {
            message: Some("Assert.Equal() Failure".to_owned())
        })
    );
    assert_eq!(report.get("Standalone"), Some(&NodeOutcome::Skipped));
    assert_eq!(
        report.get("Company.Product.Tests.Generic<System.Int32>.Works"),
        None
    );
    assert_eq!(
        report.diagnostics.count(DiagnosticKind::UnrecognizedOutcome),
        1
    );

    assert_eq!(report.summary.discovered, 8);
    assert_eq!(report.summary.passed, 1);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.summary.skipped, 1);
    assert_eq!(report.summary.unrecognized, 1);
}

#[test]
fn run_request_for_subtree() {
    let mut state = ExplorerState::new(TreeMode::Merged);
    state.on_discovery_finished([DiscoveryBatch::from_lines(LISTING)]);
    let tree = state.tree();

    let parser_tests = tree
        .find("Company.Product.Tests.ParserTests")
        .expect("class node exists");
    let nested = tree
        .find("Company.Product.Tests.ParserTests.ParsesNested(System.String,System.Int64)")
        .expect("test node exists");

    let request = state.run_request(Some(parser_tests), &[nested]);
    assert_eq!(
        request.filter.to_string(),
        "FullyQualifiedName~Company.Product.Tests.ParserTests\
         &FullyQualifiedName!=Company.Product.Tests.ParserTests.ParsesNested"
    );
    assert_eq!(request.started.len(), 4);
    assert_eq!(request.started[0], parser_tests);
}

#[test]
fn reveal_and_symbol_lookup() {
    let mut state = ExplorerState::new(TreeMode::Merged);
    state.on_discovery_finished([DiscoveryBatch::from_lines(LISTING)]);
    let tree = state.tree();

    let index = tree
        .resolve_extension_id(
            "dotnet-test-explorer\0Company.Product\0Company.Product.Tests\0\
             Company.Product.Tests.Outer+Inner\0Company.Product.Tests.Outer+Inner.NestedWorks",
        )
        .expect("path resolves");
    let node = tree.node(index);
    assert_eq!(node.name(), "NestedWorks");
    assert_eq!(
        symbol_lookup_name(node.full_name(), "+"),
        "Company.Product.Tests.Outer.Inner.NestedWorks"
    );
}

#[test]
fn summary_json() -> Result<()> {
    let tree = concrete_tree(&["X.Y.Z.Method()"], TreeMode::Merged)?;
    let json = serde_json::to_value(tree.to_summary())?;
    assert_eq!(
        json,
        serde_json::json!({
            "treeMode": "merged",
            "testCount": 1,
            "root": {
                "name": "",
                "fullName": "",
                "kind": "group",
                "children": [
                    {
                        "name": "X.Y.Z",
                        "fullName": "X.Y.Z",
                        "kind": "group",
                        "children": [
                            {
                                "name": "Method()",
                                "fullName": "X.Y.Z.Method()",
                                "kind": "test",
                            }
                        ]
                    }
                ]
            }
        })
    );
    Ok(())
}
