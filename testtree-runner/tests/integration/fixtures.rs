// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use color_eyre::eyre::{Result, WrapErr};
use testtree_metadata::TreeMode;
use testtree_runner::{
    discovery::{DiscoveredTestSet, DiscoveryBatch, ingest},
    name::ParsedName,
    tree::{AbstractTreeNode, ConcreteTree, TreeBuilder},
};

/// A listing in the shape printed by `dotnet test --list-tests`, after the header lines.
pub(crate) const LISTING: &str = "\
Company.Product.Tests.ParserTests.ParsesEmptyInput
Company.Product.Tests.ParserTests.ParsesNested(System.String,System.Int32)
Company.Product.Tests.ParserTests.ParsesNested(System.String,System.Int64)
Company.Product.Tests.Generic<System.Int32>.Works
Company.Product.Tests.Outer+Inner.NestedWorks
Company.Product.Integration.RoundTrip(\"a.b\",\"(x)\")
Standalone
";

pub(crate) fn parse(names: &[&str]) -> Result<Vec<ParsedName>> {
    names
        .iter()
        .map(|name| ParsedName::parse(name).wrap_err_with(|| format!("parsing `{name}`")))
        .collect()
}

pub(crate) fn abstract_tree(names: &[&str]) -> Result<AbstractTreeNode> {
    Ok(TreeBuilder::build(&parse(names)?))
}

pub(crate) fn concrete_tree(names: &[&str], tree_mode: TreeMode) -> Result<ConcreteTree> {
    Ok(ConcreteTree::build(&abstract_tree(names)?, tree_mode))
}

pub(crate) fn discovered(listing: &str) -> DiscoveredTestSet {
    ingest(DiscoveredTestSet::new(), [DiscoveryBatch::from_lines(listing)]).discovered
}

/// Renders a tree as indented labels, groups marked with a trailing `/`.
pub(crate) fn render(tree: &ConcreteTree) -> String {
    let mut out = String::new();
    let mut stack: Vec<_> = tree
        .children(testtree_runner::tree::NodeIndex::ROOT)
        .rev()
        .map(|(index, _)| (index, 0))
        .collect();
    while let Some((index, depth)) = stack.pop() {
        let node = tree.node(index);
        out.push_str(&"  ".repeat(depth));
        out.push_str(node.name());
        if !node.is_test() {
            out.push('/');
        }
        out.push('\n');
        stack.extend(tree.children(index).rev().map(|(child, _)| (child, depth + 1)));
    }
    out
}
