// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Structured data exchanged with testtree.
//!
//! testtree turns fully-qualified test names into a namespace tree and reconciles that tree
//! against test outcomes. The types in this crate are the data contracts with the collaborators
//! around it:
//!
//! * result collaborators produce [`TestResultBatch`] values containing [`TestOutcomeRecord`]s;
//! * display collaborators consume [`TestTreeSummary`] values;
//! * the tree shape is selected with [`TreeMode`].
//!
//! All types serialize to and from JSON with `serde`.

mod errors;
mod exit_codes;
mod outcome;
mod summary;

pub use errors::*;
pub use exit_codes::*;
pub use outcome::*;
pub use summary::*;
