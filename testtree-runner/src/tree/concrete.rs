// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{AbstractTreeNode, compact};
use std::collections::HashMap;
use testtree_metadata::{NodeKind, TestTreeSummary, TreeMode, TreeNodeSummary};

/// The index of a node within a [`ConcreteTree`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// The index of the root node.
    pub const ROOT: Self = Self(0);
}

/// A node within a [`ConcreteTree`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConcreteNode {
    name: String,
    full_name: String,
    kind: NodeKind,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
}

impl ConcreteNode {
    /// Returns the label displayed for this node.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the full name identifying this node.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns whether this node is a group or a test.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns true if this node is a test.
    pub fn is_test(&self) -> bool {
        self.kind == NodeKind::Test
    }

    /// Returns the parent of this node, or `None` for the root.
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Returns the children of this node, in display order.
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }
}

/// The display tree: an abstract tree materialized into nodes with parent links.
///
/// Nodes are stored in an arena and referred to by [`NodeIndex`]. Each node is owned by the tree;
/// parent and child links are indexes, and lookups by full name go through an explicit map.
///
/// Children are ordered groups first (by label), then tests (by label).
#[derive(Clone, Debug)]
pub struct ConcreteTree {
    tree_mode: TreeMode,
    nodes: Vec<ConcreteNode>,
    by_full_name: HashMap<String, NodeIndex>,
    test_count: usize,
}

impl ConcreteTree {
    /// Builds a display tree from an abstract tree.
    ///
    /// With [`TreeMode::Merged`], the abstract tree is [compacted](compact) first. With
    /// [`TreeMode::Literal`], the display tree has exactly the shape of the abstract tree.
    pub fn build(tree: &AbstractTreeNode, tree_mode: TreeMode) -> Self {
        if tree_mode.is_merged() {
            Self::translate(&compact(tree), tree_mode)
        } else {
            Self::translate(tree, tree_mode)
        }
    }

    /// Returns an empty tree, containing just the root.
    pub fn empty(tree_mode: TreeMode) -> Self {
        Self::translate(&AbstractTreeNode::root(), tree_mode)
    }

    fn translate(tree: &AbstractTreeNode, tree_mode: TreeMode) -> Self {
        let mut this = Self {
            tree_mode,
            nodes: Vec::new(),
            by_full_name: HashMap::new(),
            test_count: 0,
        };
        let root = this.push(&tree.name, &tree.full_name, NodeKind::Group, None);

        // Iterative depth-first translation, so deeply nested namespaces can't overflow the stack.
        let mut stack = vec![(tree, root)];
        while let Some((node, index)) = stack.pop() {
            for sub_tree in node.sub_trees.values() {
                let child = this.push(
                    &sub_tree.name,
                    &sub_tree.full_name,
                    NodeKind::Group,
                    Some(index),
                );
                stack.push((sub_tree, child));
            }
            for test in &node.tests {
                let full_name = join_name(&node.full_name, test);
                this.push(test, &full_name, NodeKind::Test, Some(index));
                this.test_count += 1;
            }
        }

        this
    }

    fn push(
        &mut self,
        name: &str,
        full_name: &str,
        kind: NodeKind,
        parent: Option<NodeIndex>,
    ) -> NodeIndex {
        let index = NodeIndex(self.nodes.len());
        self.nodes.push(ConcreteNode {
            name: name.to_owned(),
            full_name: full_name.to_owned(),
            kind,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(index);
        }

        // A name can be both a test and a namespace (e.g. `A.B` and `A.B.C`). Outcomes are only
        // ever reported for tests, so tests win.
        match kind {
            NodeKind::Test => {
                self.by_full_name.insert(full_name.to_owned(), index);
            }
            NodeKind::Group => {
                self.by_full_name
                    .entry(full_name.to_owned())
                    .or_insert(index);
            }
        }

        index
    }

    /// Returns the tree mode this tree was built with.
    pub fn tree_mode(&self) -> TreeMode {
        self.tree_mode
    }

    /// Returns the root node.
    pub fn root(&self) -> &ConcreteNode {
        &self.nodes[NodeIndex::ROOT.0]
    }

    /// Returns the node at the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index doesn't belong to this tree.
    pub fn node(&self, index: NodeIndex) -> &ConcreteNode {
        &self.nodes[index.0]
    }

    /// Returns the number of nodes in the tree, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes other than the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Returns the number of tests in the tree.
    pub fn test_count(&self) -> usize {
        self.test_count
    }

    /// Looks up a node by exact full name.
    pub fn find(&self, full_name: &str) -> Option<NodeIndex> {
        self.by_full_name.get(full_name).copied()
    }

    /// Iterates over the children of a node.
    pub fn children(
        &self,
        index: NodeIndex,
    ) -> impl DoubleEndedIterator<Item = (NodeIndex, &ConcreteNode)> + ExactSizeIterator + '_ {
        self.nodes[index.0]
            .children
            .iter()
            .map(move |&child| (child, &self.nodes[child.0]))
    }

    /// Returns the given node and every node below it, in depth-first display order.
    pub fn descendants(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack = vec![index];
        while let Some(index) = stack.pop() {
            out.push(index);
            stack.extend(self.nodes[index.0].children.iter().rev());
        }
        out
    }

    /// Iterates over all test nodes.
    pub fn tests(&self) -> impl Iterator<Item = (NodeIndex, &ConcreteNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_test())
            .map(|(index, node)| (NodeIndex(index), node))
    }

    /// Resolves a path of full names, starting below the root: the first element names a child of
    /// the root, the second a child of that node, and so on.
    ///
    /// Returns `None` if any element doesn't name a child of the previous node.
    pub fn resolve_path<'a>(&self, path: impl IntoIterator<Item = &'a str>) -> Option<NodeIndex> {
        let mut current = NodeIndex::ROOT;
        for full_name in path {
            current = self.nodes[current.0]
                .children
                .iter()
                .copied()
                .find(|child| self.nodes[child.0].full_name == full_name)?;
        }
        Some(current)
    }

    /// Resolves an identifier of the form `controller\0id\0id...`, as produced by editor test
    /// explorers for "reveal test" requests.
    ///
    /// The first component identifies the controller and is ignored. Returns `None` for the root.
    pub fn resolve_extension_id(&self, ext_id: &str) -> Option<NodeIndex> {
        let mut parts = ext_id.split('\0').skip(1).peekable();
        parts.peek()?;
        self.resolve_path(parts)
    }

    /// Produces a serializable summary of this tree.
    pub fn to_summary(&self) -> TestTreeSummary {
        TestTreeSummary {
            tree_mode: self.tree_mode,
            test_count: self.test_count,
            root: self.node_summary(NodeIndex::ROOT),
        }
    }

    fn node_summary(&self, index: NodeIndex) -> TreeNodeSummary {
        let node = &self.nodes[index.0];
        TreeNodeSummary {
            name: node.name.clone(),
            full_name: node.full_name.clone(),
            kind: node.kind,
            children: node
                .children
                .iter()
                .map(|&child| self.node_summary(child))
                .collect(),
        }
    }
}

/// Joins a parent's full name and a child label.
pub(crate) fn join_name(parent: &str, label: &str) -> String {
    if parent.is_empty() {
        label.to_owned()
    } else {
        format!("{parent}.{label}")
    }
}
