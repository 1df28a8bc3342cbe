// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::TreeModeParseError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The shape of the tree handed to display collaborators.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TreeMode {
    /// One node per namespace component.
    #[default]
    Literal,

    /// Chains of namespaces with a single child and no tests are merged into one node.
    Merged,
}

impl TreeMode {
    /// Returns the string representations of all tree modes.
    pub fn variants() -> &'static [&'static str] {
        &["literal", "merged"]
    }

    /// Returns the string representation of this tree mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::Merged => "merged",
        }
    }

    /// Returns true if this mode collapses single-child chains.
    pub fn is_merged(self) -> bool {
        matches!(self, Self::Merged)
    }
}

impl FromStr for TreeMode {
    type Err = TreeModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "literal" => Ok(Self::Literal),
            "merged" => Ok(Self::Merged),
            other => Err(TreeModeParseError::new(other)),
        }
    }
}

impl fmt::Display for TreeMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of a node in a [`TestTreeSummary`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// A namespace or class grouping other nodes.
    Group,

    /// A single test method.
    Test,
}

/// A serializable view of one node in the test tree.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNodeSummary {
    /// The label displayed for this node.
    pub name: String,

    /// The full dotted name identifying this node.
    pub full_name: String,

    /// Whether this node is a group or a test.
    pub kind: NodeKind,

    /// Child nodes, in display order. Always empty for tests.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNodeSummary>,
}

/// A serializable view of the whole test tree.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestTreeSummary {
    /// The tree mode the tree was built with.
    pub tree_mode: TreeMode,

    /// The number of tests in the tree.
    pub test_count: usize,

    /// The root of the tree. The root has an empty name and full name.
    pub root: TreeNodeSummary,
}
