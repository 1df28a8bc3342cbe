// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for testtree.
//!
//! The basic flow of operations is:
//!
//! 1. A discovery collaborator produces fully-qualified test names such as
//!    `Company.Product.Tests.Method(System.String)`. These are parsed into
//!    [`ParsedName`](name::ParsedName)s by [`discovery::ingest`].
//! 2. [`TreeBuilder`](tree::TreeBuilder) folds the parsed names into an
//!    [`AbstractTreeNode`](tree::AbstractTreeNode), which is optionally
//!    [compacted](tree::compact) and then materialized into a
//!    [`ConcreteTree`](tree::ConcreteTree) for display.
//! 3. A result collaborator produces outcome batches, which are merged into the discovered set by
//!    [`reconcile::reconcile`] and matched against the tree by [`reconcile::apply_outcomes`].
//!
//! Everything in this crate is synchronous and free of I/O, except for loading configuration.
//! Callers own the [`DiscoveredTestSet`](discovery::DiscoveredTestSet) and the published tree,
//! and are responsible for serializing updates to them.

pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod errors;
pub mod explorer;
pub mod filter;
pub mod name;
pub mod reconcile;
pub mod tree;

#[cfg(test)]
mod test_helpers;
