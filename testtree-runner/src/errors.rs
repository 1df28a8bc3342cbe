// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by testtree.

use camino::{Utf8Path, Utf8PathBuf};
use config::ConfigError;
use thiserror::Error;

/// An error that occurred while parsing a fully-qualified test name.
///
/// Malformed names are skipped individually: one of these never aborts a batch.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("malformed test name `{name}`: {kind}")]
pub struct MalformedNameError {
    name: String,
    kind: MalformedNameKind,
}

impl MalformedNameError {
    pub(crate) fn new(name: impl Into<String>, kind: MalformedNameKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Returns the name that failed to parse.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the reason the name failed to parse.
    pub fn kind(&self) -> &MalformedNameKind {
        &self.kind
    }
}

/// The reason a test name is malformed.
///
/// Positions are byte offsets into the trimmed name.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum MalformedNameKind {
    /// The name was empty after trimming.
    #[error("name is empty")]
    EmptyName,

    /// A `.` separator was adjacent to another separator or to the start or end of a level.
    #[error("empty segment at offset {position}")]
    EmptySegment {
        /// The position of the offending `.`.
        position: usize,
    },

    /// A closing delimiter had no matching opening delimiter, or an opening delimiter was never
    /// closed.
    #[error("unbalanced `{delimiter}` at offset {position}")]
    UnbalancedDelimiter {
        /// The unbalanced delimiter.
        delimiter: char,

        /// The position of the delimiter.
        position: usize,
    },

    /// A closing delimiter did not match the innermost opening delimiter.
    #[error("`{close}` at offset {position} does not close `{open}`")]
    MismatchedDelimiter {
        /// The innermost opening delimiter.
        open: char,

        /// The closing delimiter found.
        close: char,

        /// The position of the closing delimiter.
        position: usize,
    },

    /// A string literal inside a parameter list was never terminated.
    #[error("unterminated string literal starting at offset {position}")]
    UnterminatedQuote {
        /// The position of the opening quote.
        position: usize,
    },
}

/// An operation that is meaningless without discovered tests was attempted with none.
///
/// Tree building itself never produces this error: building from zero names yields an empty root.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{operation} requires at least one discovered test, but none were found")]
pub struct EmptyInputError {
    operation: &'static str,
}

impl EmptyInputError {
    pub(crate) fn new(operation: &'static str) -> Self {
        Self { operation }
    }

    /// Returns a description of the operation that required input.
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

/// An error that occurred while parsing the testtree config.
#[derive(Debug, Error)]
#[error("failed to parse testtree config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file for this error.
    pub fn config_file(&self) -> &Utf8Path {
        &self.config_file
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing a config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the config.
    #[error(transparent)]
    BuildError(Box<ConfigError>),

    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<serde_path_to_error::Error<ConfigError>>),
}
