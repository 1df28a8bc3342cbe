// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{errors::EmptyInputError, name::ParsedName};
use std::collections::{BTreeMap, BTreeSet};

/// A namespace or class node in the abstract test tree.
///
/// Child nodes are keyed by their label, and tests are stored as labels (method name plus any
/// parameter list) rather than as nodes. Both collections are ordered, so two trees built from the
/// same set of names compare equal regardless of input order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AbstractTreeNode {
    pub(super) name: String,
    pub(super) full_name: String,
    pub(super) sub_trees: BTreeMap<String, AbstractTreeNode>,
    pub(super) tests: BTreeSet<String>,
}

impl AbstractTreeNode {
    /// Creates an empty root node.
    pub fn root() -> Self {
        Self::default()
    }

    pub(super) fn new(name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            sub_trees: BTreeMap::new(),
            tests: BTreeSet::new(),
        }
    }

    /// Returns this node's own label. Empty for the root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the full dotted prefix identifying this node. Empty for the root.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns true if this is the root node.
    pub fn is_root(&self) -> bool {
        self.full_name.is_empty()
    }

    /// Returns the child nodes, keyed by label.
    pub fn sub_trees(&self) -> &BTreeMap<String, AbstractTreeNode> {
        &self.sub_trees
    }

    /// Returns the labels of the tests directly under this node.
    pub fn tests(&self) -> &BTreeSet<String> {
        &self.tests
    }

    /// Returns true if this node has no children and no tests.
    pub fn is_empty(&self) -> bool {
        self.sub_trees.is_empty() && self.tests.is_empty()
    }

    /// Returns the number of tests in this node and all nodes below it.
    pub fn test_count(&self) -> usize {
        self.tests.len()
            + self
                .sub_trees
                .values()
                .map(|sub_tree| sub_tree.test_count())
                .sum::<usize>()
    }

    /// Returns the descendant node with the given full name, or `self` for an empty name.
    pub fn get(&self, full_name: &str) -> Option<&AbstractTreeNode> {
        let mut node = self;
        while node.full_name != full_name {
            // Children are keyed by label, so walk down using the remainder of the name.
            let rest = if node.is_root() {
                full_name
            } else {
                full_name
                    .strip_prefix(node.full_name.as_str())?
                    .strip_prefix('.')?
            };
            node = node
                .sub_trees
                .iter()
                .filter(|(label, _)| {
                    rest.strip_prefix(label.as_str())
                        .is_some_and(|after| after.is_empty() || after.starts_with('.'))
                })
                // A child label may itself contain dots (after compaction or with generic
                // arguments), so prefer the longest matching label.
                .max_by_key(|(label, _)| label.len())
                .map(|(_, sub_tree)| sub_tree)?;
        }
        Some(node)
    }

    /// Merges another tree into this one.
    ///
    /// Both trees must be rooted at the same full name. Merging is commutative: the result does
    /// not depend on which tree is merged into which.
    pub fn merge(&mut self, other: AbstractTreeNode) {
        debug_assert_eq!(
            self.full_name, other.full_name,
            "merged trees must share a root"
        );
        self.tests.extend(other.tests);
        for (label, other_sub_tree) in other.sub_trees {
            match self.sub_trees.get_mut(&label) {
                Some(sub_tree) => sub_tree.merge(other_sub_tree),
                None => {
                    self.sub_trees.insert(label, other_sub_tree);
                }
            }
        }
    }
}

/// Folds parsed names into an [`AbstractTreeNode`].
///
/// Building is insensitive to input order and to duplicates. Independent builders may be merged,
/// so names may be processed in batches.
#[derive(Clone, Debug, Default)]
pub struct TreeBuilder {
    root: AbstractTreeNode,
}

impl TreeBuilder {
    /// Creates a new builder with an empty root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from the given names.
    pub fn build<'a>(names: impl IntoIterator<Item = &'a ParsedName>) -> AbstractTreeNode {
        let mut builder = Self::new();
        builder.extend(names);
        builder.finish()
    }

    /// Adds a single name to the tree.
    pub fn add(&mut self, name: &ParsedName) {
        let full_name = name.full_name();
        let Some((last, ancestors)) = name.segments().split_last() else {
            return;
        };

        let mut node = &mut self.root;
        let mut start = 0;
        for segment in ancestors {
            let label = &full_name[start..segment.end()];
            node = node
                .sub_trees
                .entry(label.to_owned())
                .or_insert_with(|| AbstractTreeNode::new(label, &full_name[..segment.end()]));
            start = segment.end() + 1;
        }

        node.tests.insert(full_name[start..last.end()].to_owned());
    }

    /// Adds several names to the tree.
    pub fn extend<'a>(&mut self, names: impl IntoIterator<Item = &'a ParsedName>) {
        for name in names {
            self.add(name);
        }
    }

    /// Merges the names collected by another builder into this one.
    pub fn merge(&mut self, other: TreeBuilder) {
        self.root.merge(other.root);
    }

    /// Returns the number of tests collected so far.
    pub fn test_count(&self) -> usize {
        self.root.test_count()
    }

    /// Finishes building, returning the root of the tree.
    ///
    /// If no names were added, the root is empty.
    pub fn finish(self) -> AbstractTreeNode {
        self.root
    }

    /// Finishes building, returning an error if no names were added.
    ///
    /// Use this when an empty tree would be meaningless for the operation that follows.
    pub fn finish_non_empty(
        self,
        operation: &'static str,
    ) -> Result<AbstractTreeNode, EmptyInputError> {
        if self.root.is_empty() {
            Err(EmptyInputError::new(operation))
        } else {
            Ok(self.root)
        }
    }
}

impl<'a> FromIterator<&'a ParsedName> for TreeBuilder {
    fn from_iter<T: IntoIterator<Item = &'a ParsedName>>(iter: T) -> Self {
        let mut builder = Self::new();
        builder.extend(iter);
        builder
    }
}
