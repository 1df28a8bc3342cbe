// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconciling result batches with the discovered set and the displayed tree.
//!
//! Reconciliation happens in two steps:
//!
//! 1. [`reconcile`] merges the names in a batch into the [`DiscoveredTestSet`], and decides
//!    whether the tree has to be rebuilt.
//! 2. [`apply_outcomes`] matches each outcome against the (possibly rebuilt) tree by exact full
//!    name.

use crate::{
    diagnostics::{Diagnostic, Diagnostics},
    discovery::DiscoveredTestSet,
    tree::ConcreteTree,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use testtree_metadata::{OutcomeKind, TestOutcomeRecord};
use tracing::{debug, warn};

/// The result of [`reconcile`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reconciliation {
    /// The updated discovered set.
    pub discovered: DiscoveredTestSet,

    /// True if the tree must be rebuilt from `discovered`. If false, only outcome annotations
    /// need updating.
    pub rebuild_required: bool,
}

/// Merges the names in `batch` into `discovered`.
///
/// If `replace_previous` is true, the discovered set becomes exactly the names in the batch and a
/// rebuild is always required. Otherwise, names not already known are added, and a rebuild is
/// required only if there were any.
///
/// Names are not validated here. Callers parse the names a batch adds before building a tree
/// from them.
pub fn reconcile(
    discovered: DiscoveredTestSet,
    batch: &[TestOutcomeRecord],
    replace_previous: bool,
) -> Reconciliation {
    let names = batch.iter().map(|record| record.full_name.clone());

    if replace_previous {
        let discovered = discovered.replace(names.collect::<BTreeSet<_>>());
        debug!(
            generation = discovered.generation(),
            "replaced discovered tests with {} from results",
            discovered.len(),
        );
        return Reconciliation {
            discovered,
            rebuild_required: true,
        };
    }

    let before = discovered.len();
    let (discovered, rebuild_required) = discovered.union(names);
    if rebuild_required {
        debug!(
            generation = discovered.generation(),
            "added {} new tests from results",
            discovered.len() - before,
        );
    }
    Reconciliation {
        discovered,
        rebuild_required,
    }
}

/// The state of a test node after applying outcomes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum NodeOutcome {
    /// The test passed.
    Passed,

    /// The test failed.
    Failed {
        /// The failure message, if one was reported.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// The test was not executed.
    Skipped,
}

impl NodeOutcome {
    /// Converts a reported outcome, or returns `None` if it isn't recognized.
    pub fn from_record(record: &TestOutcomeRecord) -> Option<Self> {
        match &record.outcome {
            OutcomeKind::Passed => Some(Self::Passed),
            OutcomeKind::Failed => Some(Self::Failed {
                message: record.message.clone(),
            }),
            OutcomeKind::NotExecuted => Some(Self::Skipped),
            OutcomeKind::Unrecognized(_) => None,
        }
    }
}

/// Counts of outcomes in a batch, for status reporting.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// The number of discovered tests.
    pub discovered: usize,

    /// The number of passed outcomes.
    pub passed: usize,

    /// The number of failed outcomes.
    pub failed: usize,

    /// The number of outcomes for tests that were not executed.
    pub skipped: usize,

    /// The number of outcomes with unrecognized values.
    pub unrecognized: usize,
}

impl RunSummary {
    /// Counts every record in `batch`, whether or not it matches a known test.
    pub fn from_batch(discovered: usize, batch: &[TestOutcomeRecord]) -> Self {
        let mut summary = Self {
            discovered,
            ..Self::default()
        };
        for record in batch {
            match record.outcome {
                OutcomeKind::Passed => summary.passed += 1,
                OutcomeKind::Failed => summary.failed += 1,
                OutcomeKind::NotExecuted => summary.skipped += 1,
                OutcomeKind::Unrecognized(_) => summary.unrecognized += 1,
            }
        }
        summary
    }

    /// Returns the number of recorded outcomes.
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.unrecognized
    }
}

/// The result of [`apply_outcomes`].
#[derive(Clone, Debug, Default)]
pub struct OutcomeReport {
    /// Outcomes of matched nodes, keyed by full name.
    pub outcomes: BTreeMap<String, NodeOutcome>,

    /// Counts over the whole batch.
    pub summary: RunSummary,

    /// Outcomes that could not be applied.
    pub diagnostics: Diagnostics,
}

impl OutcomeReport {
    /// Returns the outcome recorded for a full name, if any.
    pub fn get(&self, full_name: &str) -> Option<&NodeOutcome> {
        self.outcomes.get(full_name)
    }
}

/// Matches each outcome in `batch` against `tree` by exact full name.
///
/// Outcomes that match no node, or that have an unrecognized value, are recorded as diagnostics
/// and otherwise ignored. If a batch contains several outcomes for the same test, the last one
/// wins, so applying the same batch twice gives the same result.
pub fn apply_outcomes(tree: &ConcreteTree, batch: &[TestOutcomeRecord]) -> OutcomeReport {
    let mut report = OutcomeReport {
        summary: RunSummary::from_batch(tree.test_count(), batch),
        ..OutcomeReport::default()
    };

    for record in batch {
        if tree.find(&record.full_name).is_none() {
            warn!(
                "outcome for `{}` does not match any known test",
                record.full_name
            );
            report.diagnostics.push(Diagnostic::UnmatchedOutcome {
                full_name: record.full_name.clone(),
            });
            continue;
        }

        match NodeOutcome::from_record(record) {
            Some(outcome) => {
                debug!(full_name = %record.full_name, outcome = %record.outcome, "applying outcome");
                report.outcomes.insert(record.full_name.clone(), outcome);
            }
            None => {
                warn!(
                    "unrecognized outcome `{}` for `{}` (known outcomes: {})",
                    record.outcome,
                    record.full_name,
                    OutcomeKind::variants().join(", "),
                );
                report.diagnostics.push(Diagnostic::UnrecognizedOutcome {
                    full_name: record.full_name.clone(),
                    outcome: record.outcome.clone(),
                });
            }
        }
    }

    report
}
