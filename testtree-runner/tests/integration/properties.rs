// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use proptest::{collection::vec, prelude::*};
use std::collections::BTreeSet;
use test_strategy::proptest;
use testtree_metadata::{OutcomeKind, TestOutcomeRecord, TreeMode};
use testtree_runner::{
    discovery::DiscoveredTestSet,
    name::ParsedName,
    reconcile::{apply_outcomes, reconcile},
    tree::{ConcreteTree, TreeBuilder},
};

fn arb_component() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("A".to_owned()),
        Just("B".to_owned()),
        Just("Tests".to_owned()),
        Just("Generic<X.Y>".to_owned()),
        Just("Method(System.String)".to_owned()),
    ]
}

fn arb_name() -> impl Strategy<Value = String> {
    vec(arb_component(), 1..5).prop_map(|parts| parts.join("."))
}

fn arb_outcome() -> impl Strategy<Value = OutcomeKind> {
    prop_oneof![
        Just(OutcomeKind::Passed),
        Just(OutcomeKind::Failed),
        Just(OutcomeKind::NotExecuted),
        Just(OutcomeKind::from("Inconclusive")),
    ]
}

fn build(names: &[String], tree_mode: TreeMode) -> ConcreteTree {
    let parsed: Vec<_> = names
        .iter()
        .filter_map(|name| ParsedName::parse(name).ok())
        .collect();
    ConcreteTree::build(&TreeBuilder::build(&parsed), tree_mode)
}

#[proptest(cases = 64)]
fn reconcile_is_idempotent(
    #[strategy(vec(arb_name(), 0..12))] discovered: Vec<String>,
    #[strategy(vec((arb_name(), arb_outcome()), 0..12))] batch: Vec<(String, OutcomeKind)>,
    replace_previous: bool,
) {
    let batch: Vec<_> = batch
        .into_iter()
        .map(|(name, outcome)| TestOutcomeRecord::new(name, outcome))
        .collect();

    let first = reconcile(
        DiscoveredTestSet::from_names(discovered),
        &batch,
        replace_previous,
    );
    let second = reconcile(first.discovered.clone(), &batch, false);
    prop_assert!(!second.rebuild_required);
    prop_assert_eq!(second.discovered.names(), first.discovered.names());

    // Every batch name is known afterwards.
    for record in &batch {
        prop_assert!(first.discovered.contains(&record.full_name));
    }
}

#[proptest(cases = 64)]
fn tree_modes_agree_on_tests(#[strategy(vec(arb_name(), 0..16))] names: Vec<String>) {
    let literal = build(&names, TreeMode::Literal);
    let merged = build(&names, TreeMode::Merged);

    let tests = |tree: &ConcreteTree| -> BTreeSet<(String, String)> {
        tree.tests()
            .map(|(index, node)| {
                let parent = node.parent().unwrap_or(index);
                (
                    tree.node(parent).full_name().to_owned(),
                    node.full_name().to_owned(),
                )
            })
            .collect()
    };
    prop_assert_eq!(tests(&literal), tests(&merged));
    prop_assert_eq!(literal.test_count(), merged.test_count());
    prop_assert!(merged.len() <= literal.len());

    // Every discovered name is a test node in both trees.
    let unique: BTreeSet<_> = names.iter().map(String::as_str).collect();
    prop_assert_eq!(literal.test_count(), unique.len());
}

#[proptest(cases = 64)]
fn outcomes_apply_identically_in_both_modes(
    #[strategy(vec(arb_name(), 1..12))] names: Vec<String>,
    #[strategy(vec(arb_outcome(), 12))] outcomes: Vec<OutcomeKind>,
) {
    let batch: Vec<_> = names
        .iter()
        .zip(outcomes)
        .map(|(name, outcome)| TestOutcomeRecord::new(name.clone(), outcome))
        .collect();

    let literal = apply_outcomes(&build(&names, TreeMode::Literal), &batch);
    let merged = apply_outcomes(&build(&names, TreeMode::Merged), &batch);
    prop_assert_eq!(&literal.outcomes, &merged.outcomes);
    prop_assert_eq!(literal.diagnostics.counts(), merged.diagnostics.counts());
    prop_assert_eq!(literal.summary, merged.summary);
}
