// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `testtree` failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum TestTreeExitCode {}

impl TestTreeExitCode {
    /// No errors occurred and testtree exited normally.
    pub const OK: i32 = 0;

    /// `--strict` was passed and at least one discovered name was malformed.
    pub const MALFORMED_NAMES: i32 = 4;

    /// Loading configuration produced an error.
    pub const CONFIG_ERROR: i32 = 96;

    /// Reading a names file or a results file produced an error.
    pub const INPUT_READ_ERROR: i32 = 97;

    /// A results file could not be deserialized.
    pub const INVALID_RESULTS: i32 = 98;

    /// An operation required at least one discovered test, but none were found.
    pub const NO_TESTS_DISCOVERED: i32 = 99;

    /// Writing data to stdout or stderr produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
