// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test filter expressions, and names for resolving source symbols.
//!
//! A run of a subtree is expressed as a `dotnet test --filter` expression built from the full
//! names of tree nodes. Parameter lists can't be matched by the filter syntax, so they are
//! stripped.

use crate::tree::{ConcreteTree, NodeIndex};
use itertools::Itertools;
use std::fmt;

/// The property that filter clauses match on.
pub const FILTER_PROPERTY: &str = "FullyQualifiedName";

/// How a [`FilterArg`] matches names.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FilterMatch {
    /// The name must match exactly. Used for leaf nodes.
    Exact,

    /// The name must contain the value. Used for nodes with children.
    Contains,
}

/// A single filter clause, such as `FullyQualifiedName~Company.Product`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilterArg {
    name: String,
    matching: FilterMatch,
    negate: bool,
}

impl FilterArg {
    /// Creates a new clause. Parameter lists in `full_name` are stripped.
    pub fn new(full_name: &str, matching: FilterMatch, negate: bool) -> Self {
        Self {
            name: strip_parameter_lists(full_name),
            matching,
            negate,
        }
    }

    /// Creates a clause selecting (or, with `negate`, excluding) a node and everything below it.
    pub fn for_node(tree: &ConcreteTree, index: NodeIndex, negate: bool) -> Self {
        let node = tree.node(index);
        let matching = if node.children().is_empty() {
            FilterMatch::Exact
        } else {
            FilterMatch::Contains
        };
        Self::new(node.full_name(), matching, negate)
    }

    /// Returns the name matched by this clause, without parameter lists.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for FilterArg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let negate = if self.negate { "!" } else { "" };
        let operator = match self.matching {
            FilterMatch::Exact => '=',
            FilterMatch::Contains => '~',
        };
        write!(f, "{FILTER_PROPERTY}{negate}{operator}{}", self.name)
    }
}

/// A conjunction of filter clauses.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FilterExpression {
    args: Vec<FilterArg>,
}

impl FilterExpression {
    /// Creates an expression from clauses.
    pub fn new(args: impl IntoIterator<Item = FilterArg>) -> Self {
        Self {
            args: args.into_iter().collect(),
        }
    }

    /// Builds the expression for running `include` (or every test, if `None` or the root) with
    /// the nodes in `exclude` left out.
    pub fn for_run(
        tree: &ConcreteTree,
        include: Option<NodeIndex>,
        exclude: impl IntoIterator<Item = NodeIndex>,
    ) -> Self {
        let include = include
            .filter(|&index| index != NodeIndex::ROOT)
            .map(|index| FilterArg::for_node(tree, index, false));
        let exclude = exclude
            .into_iter()
            .map(|index| FilterArg::for_node(tree, index, true));
        Self::new(include.into_iter().chain(exclude))
    }

    /// Returns the clauses in this expression.
    pub fn args(&self) -> &[FilterArg] {
        &self.args
    }

    /// Returns true if this expression selects every test.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.args.iter().format("&"))
    }
}

/// Returns the name used to look up the source symbol for a test or group.
///
/// Parameter lists are stripped, and nested class separators (`+` by default) are replaced with
/// `.`.
pub fn symbol_lookup_name(full_name: &str, nested_class_separator: &str) -> String {
    let stripped = strip_parameter_lists(full_name);
    if nested_class_separator.is_empty() {
        stripped
    } else {
        stripped.replace(nested_class_separator, ".")
    }
}

/// Removes every parenthesized group from a name, including nested ones.
fn strip_parameter_lists(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0_usize;
    for c in name.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}
