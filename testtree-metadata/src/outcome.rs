// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};

/// The outcome of a single test, as reported by a result collaborator.
///
/// Outcomes originate from an external format, so this enumeration is open: any value other than
/// the known ones is preserved in [`OutcomeKind::Unrecognized`] rather than rejected.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutcomeKind {
    /// The test passed.
    Passed,

    /// The test failed.
    Failed,

    /// The test was not executed (skipped).
    NotExecuted,

    /// Any other outcome value.
    Unrecognized(String),
}

impl OutcomeKind {
    /// Returns the string representation of this outcome.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::NotExecuted => "NotExecuted",
            Self::Unrecognized(other) => other,
        }
    }

    /// Returns the known outcome values.
    pub fn variants() -> &'static [&'static str] {
        &["Passed", "Failed", "NotExecuted"]
    }
}

impl From<&str> for OutcomeKind {
    fn from(s: &str) -> Self {
        match s {
            "Passed" => Self::Passed,
            "Failed" => Self::Failed,
            "NotExecuted" => Self::NotExecuted,
            other => Self::Unrecognized(other.to_owned()),
        }
    }
}

impl From<String> for OutcomeKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Passed" => Self::Passed,
            "Failed" => Self::Failed,
            "NotExecuted" => Self::NotExecuted,
            _ => Self::Unrecognized(s),
        }
    }
}

impl From<OutcomeKind> for String {
    fn from(kind: OutcomeKind) -> Self {
        match kind {
            OutcomeKind::Unrecognized(other) => other,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single test outcome produced by a result collaborator.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestOutcomeRecord {
    /// The fully-qualified name of the test this outcome is for.
    pub full_name: String,

    /// The outcome of the test.
    pub outcome: OutcomeKind,

    /// The failure message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// How long the test took, if known.
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,

    /// Captured output, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl TestOutcomeRecord {
    /// Creates a new record with no message, duration or output.
    pub fn new(full_name: impl Into<String>, outcome: impl Into<OutcomeKind>) -> Self {
        Self {
            full_name: full_name.into(),
            outcome: outcome.into(),
            message: None,
            duration: None,
            output: None,
        }
    }

    /// Sets the failure message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// A batch of outcomes delivered by a single test run.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResultBatch {
    /// If true, the batch represents a full run and replaces the previously discovered tests.
    /// Otherwise, tests in the batch are added to the ones already known.
    #[serde(default)]
    pub clear_previous_test_results: bool,

    /// The outcomes in this batch.
    #[serde(default)]
    pub test_results: Vec<TestOutcomeRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use test_case::test_case;

    #[test_case("Passed", OutcomeKind::Passed ; "passed")]
    #[test_case("Failed", OutcomeKind::Failed ; "failed")]
    #[test_case("NotExecuted", OutcomeKind::NotExecuted ; "not executed")]
    #[test_case("Inconclusive", OutcomeKind::Unrecognized("Inconclusive".to_owned()) ; "unrecognized")]
    #[test_case("passed", OutcomeKind::Unrecognized("passed".to_owned()) ; "case sensitive")]
    fn outcome_kind_from_str(input: &str, expected: OutcomeKind) {
        let kind = OutcomeKind::from(input);
        assert_eq!(kind, expected);
        assert_eq!(kind.as_str(), input);
        assert_eq!(String::from(kind), input);
    }

    #[test]
    fn known_variants_are_recognized() {
        for &variant in OutcomeKind::variants() {
            let kind = OutcomeKind::from(variant);
            assert!(
                !matches!(kind, OutcomeKind::Unrecognized(_)),
                "{variant} is a known outcome"
            );
            assert_eq!(kind.as_str(), variant);
        }
    }

    #[test]
    fn batch_deserialize() {
        let input = indoc! {r#"
            {
                "clearPreviousTestResults": true,
                "testResults": [
                    { "fullName": "A.B.Test1", "outcome": "Passed", "duration": "12ms" },
                    { "fullName": "A.B.Test2", "outcome": "Failed", "message": "boom" },
                    { "fullName": "A.B.Test3", "outcome": "Timeout" }
                ]
            }
        "#};

        let batch: TestResultBatch = serde_json::from_str(input).expect("valid batch");
        assert!(batch.clear_previous_test_results);
        assert_eq!(batch.test_results.len(), 3);
        assert_eq!(
            batch.test_results[0].duration,
            Some(Duration::from_millis(12))
        );
        assert_eq!(
            batch.test_results[1],
            TestOutcomeRecord::new("A.B.Test2", "Failed").with_message("boom")
        );
        assert_eq!(
            batch.test_results[2].outcome,
            OutcomeKind::Unrecognized("Timeout".to_owned())
        );
    }

    #[test]
    fn batch_defaults() {
        let batch: TestResultBatch = serde_json::from_str("{}").expect("valid batch");
        assert_eq!(batch, TestResultBatch::default());
    }
}
