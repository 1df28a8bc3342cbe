// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Namespace trees built from parsed test names.
//!
//! [`TreeBuilder`] folds [`ParsedName`](crate::name::ParsedName)s into an [`AbstractTreeNode`].
//! [`compact`] optionally collapses single-child chains, and [`ConcreteTree`] materializes the
//! result into an index-based tree suitable for display and outcome lookup.

mod builder;
mod compact;
mod concrete;

pub use builder::*;
pub use compact::*;
pub use concrete::*;
