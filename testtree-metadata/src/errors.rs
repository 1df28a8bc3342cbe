// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::TreeMode;
use std::{error, fmt};

/// An error that occurs while parsing a [`TreeMode`] from a string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreeModeParseError {
    input: String,
}

impl TreeModeParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// Returns the input that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for TreeModeParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unrecognized value for tree mode: {}\n(known values: {})",
            self.input,
            TreeMode::variants().join(", ")
        )
    }
}

impl error::Error for TreeModeParseError {}
