// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::NO_HEADING_TARGET;
use camino::Utf8PathBuf;
use owo_colors::{OwoColorize, Stream};
use std::error::Error;
use testtree_metadata::TestTreeExitCode;
use testtree_runner::errors::{ConfigParseError, EmptyInputError};
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// The #[error()] strings are placeholder messages: errors are meant to be printed with
// display_to_stderr, which colorizes them.

/// A failure with a documented exit code.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },
    #[error("failed to read input")]
    InputReadError {
        path: InputPath,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to parse results")]
    ResultsParseError {
        path: InputPath,
        #[source]
        err: serde_json::Error,
    },
    #[error("malformed test names")]
    MalformedNames { count: usize },
    #[error("no tests discovered")]
    NoTestsDiscovered {
        #[from]
        err: EmptyInputError,
    },
    #[error("failed to write output")]
    WriteOutputError {
        #[source]
        err: std::io::Error,
    },
    #[error("failed to serialize output")]
    SerializeError {
        #[source]
        err: serde_json::Error,
    },
}

impl ExpectedError {
    pub(crate) fn input_read_error(path: InputPath, err: std::io::Error) -> Self {
        Self::InputReadError { path, err }
    }

    pub(crate) fn results_parse_error(path: InputPath, err: serde_json::Error) -> Self {
        Self::ResultsParseError { path, err }
    }

    pub(crate) fn write_output_error(err: std::io::Error) -> Self {
        Self::WriteOutputError { err }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::ConfigParseError { .. } => TestTreeExitCode::CONFIG_ERROR,
            Self::InputReadError { .. } => TestTreeExitCode::INPUT_READ_ERROR,
            Self::ResultsParseError { .. } => TestTreeExitCode::INVALID_RESULTS,
            Self::MalformedNames { .. } => TestTreeExitCode::MALFORMED_NAMES,
            Self::NoTestsDiscovered { .. } => TestTreeExitCode::NO_TESTS_DISCOVERED,
            Self::WriteOutputError { .. } | Self::SerializeError { .. } => {
                TestTreeExitCode::WRITE_OUTPUT_ERROR
            }
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self) {
        let mut next_error = match self {
            Self::ConfigParseError { err } => {
                error!(
                    "failed to parse config at `{}`",
                    err.config_file()
                        .if_supports_color(Stream::Stderr, |x| x.bold()),
                );
                err.source()
            }
            Self::InputReadError { path, err } => {
                error!(
                    "failed to read {}",
                    path.if_supports_color(Stream::Stderr, |x| x.bold())
                );
                Some(err as &dyn Error)
            }
            Self::ResultsParseError { path, err } => {
                error!(
                    "failed to parse test results from {}",
                    path.if_supports_color(Stream::Stderr, |x| x.bold())
                );
                Some(err as &dyn Error)
            }
            Self::MalformedNames { count } => {
                let plural = if *count == 1 { "name" } else { "names" };
                error!(
                    "{} malformed test {plural} skipped (--strict was passed)",
                    count.if_supports_color(Stream::Stderr, |x| x.bold()),
                );
                None
            }
            Self::NoTestsDiscovered { err } => {
                error!("{err}");
                None
            }
            Self::WriteOutputError { err } => {
                error!("failed to write output");
                Some(err as &dyn Error)
            }
            Self::SerializeError { err } => {
                error!("failed to serialize output");
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}

/// Where an input is read from.
#[derive(Clone, Debug, Eq, PartialEq)]
#[doc(hidden)]
pub enum InputPath {
    Stdin,
    File(Utf8PathBuf),
}

impl InputPath {
    /// Interprets `-` as standard input.
    pub(crate) fn new(path: Utf8PathBuf) -> Self {
        if path == "-" {
            Self::Stdin
        } else {
            Self::File(path)
        }
    }
}

impl std::fmt::Display for InputPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdin => f.write_str("standard input"),
            Self::File(path) => write!(f, "`{path}`"),
        }
    }
}
