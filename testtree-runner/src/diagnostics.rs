// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Non-fatal problems encountered while ingesting names or applying outcomes.
//!
//! None of these abort processing. They are collected into [`Diagnostics`] so that callers can
//! report counts (for example in a status line) alongside the result.

use crate::errors::MalformedNameError;
use serde::Serialize;
use testtree_metadata::OutcomeKind;
use thiserror::Error;

/// A single non-fatal problem.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Diagnostic {
    /// A discovered name could not be parsed and was skipped.
    #[error(transparent)]
    MalformedName(MalformedNameError),

    /// An outcome referred to a test that isn't in the tree.
    #[error("outcome for `{full_name}` does not match any known test")]
    UnmatchedOutcome {
        /// The full name the outcome was reported for.
        full_name: String,
    },

    /// An outcome had a value outside the known set.
    #[error("unrecognized outcome `{outcome}` for `{full_name}`")]
    UnrecognizedOutcome {
        /// The full name the outcome was reported for.
        full_name: String,

        /// The outcome as reported.
        outcome: OutcomeKind,
    },
}

impl Diagnostic {
    /// Returns the kind of this diagnostic.
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::MalformedName(_) => DiagnosticKind::MalformedName,
            Self::UnmatchedOutcome { .. } => DiagnosticKind::UnmatchedOutcome,
            Self::UnrecognizedOutcome { .. } => DiagnosticKind::UnrecognizedOutcome,
        }
    }
}

impl From<MalformedNameError> for Diagnostic {
    fn from(err: MalformedNameError) -> Self {
        Self::MalformedName(err)
    }
}

/// The kind of a [`Diagnostic`], without its payload.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum DiagnosticKind {
    /// See [`Diagnostic::MalformedName`].
    MalformedName,

    /// See [`Diagnostic::UnmatchedOutcome`].
    UnmatchedOutcome,

    /// See [`Diagnostic::UnrecognizedOutcome`].
    UnrecognizedOutcome,
}

/// An ordered collection of diagnostics.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic.
    pub fn push(&mut self, diagnostic: impl Into<Diagnostic>) {
        self.entries.push(diagnostic.into());
    }

    /// Appends all diagnostics from another collection.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Iterates over diagnostics in the order they were recorded.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Returns the total number of diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of diagnostics of the given kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind() == kind).count()
    }

    /// Returns counts for every kind.
    pub fn counts(&self) -> DiagnosticCounts {
        DiagnosticCounts {
            malformed_names: self.count(DiagnosticKind::MalformedName),
            unmatched_outcomes: self.count(DiagnosticKind::UnmatchedOutcome),
            unrecognized_outcomes: self.count(DiagnosticKind::UnrecognizedOutcome),
        }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Per-kind diagnostic counts.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticCounts {
    /// The number of skipped malformed names.
    pub malformed_names: usize,

    /// The number of outcomes that matched no test.
    pub unmatched_outcomes: usize,

    /// The number of outcomes with unrecognized values.
    pub unrecognized_outcomes: usize,
}

impl DiagnosticCounts {
    /// Returns the total across all kinds.
    pub fn total(&self) -> usize {
        self.malformed_names + self.unmatched_outcomes + self.unrecognized_outcomes
    }
}
