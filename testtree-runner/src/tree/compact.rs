// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::AbstractTreeNode;
use std::collections::BTreeMap;

/// Collapses chains of single-child nodes into one node per chain.
///
/// A non-root node with exactly one child and no tests of its own is merged with that child: the
/// resulting node is labeled with the dot-joined labels of the chain, and takes the full name,
/// children and tests of the innermost node. Children are compacted before their parents, so a
/// chain spanning any number of levels collapses in a single pass.
///
/// The root is never merged away, even if it has a single child and no tests.
///
/// The input is left untouched.
pub fn compact(tree: &AbstractTreeNode) -> AbstractTreeNode {
    AbstractTreeNode {
        name: tree.name.clone(),
        full_name: tree.full_name.clone(),
        sub_trees: compact_children(tree),
        tests: tree.tests.clone(),
    }
}

fn compact_children(node: &AbstractTreeNode) -> BTreeMap<String, AbstractTreeNode> {
    node.sub_trees
        .values()
        .map(|sub_tree| {
            let sub_tree = compact_node(sub_tree);
            (sub_tree.name.clone(), sub_tree)
        })
        .collect()
}

fn compact_node(node: &AbstractTreeNode) -> AbstractTreeNode {
    let mut sub_trees = compact_children(node);

    if sub_trees.len() == 1 && node.tests.is_empty() {
        if let Some((_, child)) = sub_trees.pop_first() {
            return AbstractTreeNode {
                name: format!("{}.{}", node.name, child.name),
                full_name: child.full_name,
                sub_trees: child.sub_trees,
                tests: child.tests,
            };
        }
    }

    AbstractTreeNode {
        name: node.name.clone(),
        full_name: node.full_name.clone(),
        sub_trees,
        tests: node.tests.clone(),
    }
}
