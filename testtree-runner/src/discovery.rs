// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The set of discovered tests, and ingestion of raw names from a discovery collaborator.

use crate::{diagnostics::Diagnostics, errors::EmptyInputError, name::ParsedName};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// The fully-qualified names currently known to exist.
///
/// This is a plain value: operations that change it consume the old set and return a new one.
/// Callers own the authoritative copy and must serialize updates to it. Every change bumps the
/// generation, which callers can use to discard results computed from a superseded set.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiscoveredTestSet {
    names: BTreeSet<String>,
    generation: u64,
}

impl DiscoveredTestSet {
    /// Creates an empty set at generation 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set at generation 0 from the given names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            generation: 0,
        }
    }

    /// Returns the names in sorted order.
    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    /// Iterates over the names in sorted order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    /// Returns the number of names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no tests are known.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns true if the given full name is known.
    pub fn contains(&self, full_name: &str) -> bool {
        self.names.contains(full_name)
    }

    /// Returns the generation of this set.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resets the set to empty, as when a new discovery starts.
    pub fn clear(self) -> Self {
        self.replace(BTreeSet::new())
    }

    /// Returns `self`, or an error if the set is empty.
    ///
    /// `operation` describes what was being attempted, for the error message.
    pub fn require_non_empty(&self, operation: &'static str) -> Result<&Self, EmptyInputError> {
        if self.is_empty() {
            Err(EmptyInputError::new(operation))
        } else {
            Ok(self)
        }
    }

    /// Replaces the contents with `names`, bumping the generation.
    pub(crate) fn replace(self, names: BTreeSet<String>) -> Self {
        Self {
            names,
            generation: self.generation + 1,
        }
    }

    /// Adds `names` to the set, bumping the generation if anything was added.
    ///
    /// Returns the new set and whether it changed.
    pub(crate) fn union(mut self, names: impl IntoIterator<Item = String>) -> (Self, bool) {
        let before = self.names.len();
        self.names.extend(names);
        if self.names.len() == before {
            (self, false)
        } else {
            self.generation += 1;
            (self, true)
        }
    }
}

/// Raw test names produced by one discovery invocation, e.g. one per project.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiscoveryBatch {
    /// The raw names, one per entry. Entries are trimmed, and blank entries are ignored.
    pub test_names: Vec<String>,
}

impl DiscoveryBatch {
    /// Creates a batch from raw names.
    pub fn new<I, S>(test_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            test_names: test_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a batch from the lines of a listing, as printed by a test-listing tool.
    pub fn from_lines(listing: &str) -> Self {
        Self::new(listing.lines())
    }
}

/// The result of [`ingest`].
#[derive(Clone, Debug)]
pub struct DiscoveryOutcome {
    /// The new discovered set, containing every well-formed name.
    pub discovered: DiscoveredTestSet,

    /// The well-formed names, parsed, in input order.
    pub parsed: Vec<ParsedName>,

    /// Problems encountered while parsing.
    pub diagnostics: Diagnostics,
}

/// Ingests the results of a finished discovery, replacing the previous set.
///
/// All batches are concatenated. Malformed names are skipped and recorded as diagnostics; they
/// never abort ingestion.
pub fn ingest(
    previous: DiscoveredTestSet,
    batches: impl IntoIterator<Item = DiscoveryBatch>,
) -> DiscoveryOutcome {
    let raw: Vec<String> = batches
        .into_iter()
        .flat_map(|batch| batch.test_names)
        .collect();
    let (parsed, diagnostics) = parse_names(raw.iter().map(String::as_str));

    let names = parsed
        .iter()
        .map(|name| name.full_name().to_owned())
        .collect();
    let discovered = previous.replace(names);
    debug!(
        generation = discovered.generation(),
        "discovered {} tests ({} skipped)",
        discovered.len(),
        diagnostics.len(),
    );

    DiscoveryOutcome {
        discovered,
        parsed,
        diagnostics,
    }
}

/// Parses raw names, skipping blank entries silently and malformed entries with a diagnostic.
pub fn parse_names<'a>(names: impl IntoIterator<Item = &'a str>) -> (Vec<ParsedName>, Diagnostics) {
    let mut parsed = Vec::new();
    let mut diagnostics = Diagnostics::new();
    for raw in names {
        if raw.trim().is_empty() {
            continue;
        }
        match ParsedName::parse(raw) {
            Ok(name) => parsed.push(name),
            Err(error) => {
                warn!("skipping {error}");
                diagnostics.push(error);
            }
        }
    }
    (parsed, diagnostics)
}
