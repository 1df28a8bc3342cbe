// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line inspection of test trees.
//!
//! `testtree list` reads fully-qualified test names (one per line, as printed by
//! `dotnet test --list-tests`) and prints the namespace tree built from them.
//! `testtree reconcile` additionally reads a JSON batch of test outcomes and reports how it
//! matches the tree.
//!
//! All logic lives in `testtree-runner`. This crate only reads inputs and formats outputs.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::OutputWriter;
