// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test report types
//!
//! These mirror what a test runner hands to its reporting hooks: one report
//! per test phase, plus collection reports for files that could not be
//! loaded.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Phase of a test a report belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Fixture setup before the test body
    Setup,
    /// The test body itself
    Call,
    /// Fixture teardown after the test body
    Teardown,
}

/// Outcome of a single phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Phase passed
    Passed,
    /// Phase failed
    Failed,
    /// Test was skipped during this phase
    Skipped,
}

/// Short location of a test: `(path, line, domain)`
///
/// Deserializes from the framework's 3-element array form, e.g.
/// `["tests/test_math.py", 8, "test_div"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the rootdir
    pub path: String,
    /// Line number, if the framework knows it
    pub line: Option<u64>,
    /// Human-readable test name within the file
    pub domain: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{} ({})", self.path, line, self.domain),
            None => write!(f, "{} ({})", self.path, self.domain),
        }
    }
}

/// Long report attached to a failure or skip
///
/// Frameworks hand this over either as a `(path, line, reason)` triple (skips)
/// or as free text (tracebacks). The two shapes are told apart once, while
/// decoding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawDetail")]
pub enum ReportDetail {
    /// The `(path, line, reason)` triple
    Structured {
        /// File the detail points at
        path: String,
        /// Line the detail points at
        line: Option<u64>,
        /// Free-text reason
        reason: String,
    },
    /// Anything else, rendered as text
    Freeform(String),
}

impl ReportDetail {
    /// Reason to show for a skipped test
    ///
    /// The third element of a structured detail, otherwise the full text.
    #[must_use]
    pub fn skip_reason(&self) -> String {
        match self {
            Self::Structured { reason, .. } => reason.clone(),
            Self::Freeform(text) => text.clone(),
        }
    }
}

impl Default for ReportDetail {
    fn default() -> Self {
        Self::Freeform(String::new())
    }
}

impl fmt::Display for ReportDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured {
                path,
                line: Some(line),
                reason,
            } => write!(f, "{path}:{line}: {reason}"),
            Self::Structured {
                path,
                line: None,
                reason,
            } => write!(f, "{path}: {reason}"),
            Self::Freeform(text) => f.write_str(text),
        }
    }
}

/// Wire shape of a detail before it is resolved into [`ReportDetail`]
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDetail {
    Structured(String, Option<u64>, String),
    Triple(serde_json::Value, serde_json::Value, serde_json::Value),
    Text(String),
    Other(serde_json::Value),
}

impl From<RawDetail> for ReportDetail {
    fn from(raw: RawDetail) -> Self {
        match raw {
            RawDetail::Structured(path, line, reason) => Self::Structured { path, line, reason },
            RawDetail::Triple(path, line, reason) => Self::Structured {
                path: value_text(path),
                line: line
                    .as_u64()
                    .or_else(|| line.as_str().and_then(|l| l.parse().ok())),
                reason: value_text(reason),
            },
            RawDetail::Text(text) => Self::Freeform(text),
            RawDetail::Other(serde_json::Value::Null) => Self::default(),
            RawDetail::Other(value) => Self::Freeform(value.to_string()),
        }
    }
}

/// A JSON string's contents, or the JSON text of any other value
fn value_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Report for one phase of one test
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestReport {
    /// Raw node id of the test
    pub nodeid: String,
    /// Outcome of the phase
    pub outcome: Outcome,
    /// Which phase this report covers
    pub when: Phase,
    /// Elapsed time of the phase in seconds
    #[serde(default)]
    pub duration: f64,
    /// Short location of the test
    #[serde(default)]
    pub location: Option<Location>,
    /// Traceback or skip reason
    #[serde(default)]
    pub longrepr: ReportDetail,
}

impl TestReport {
    /// Elapsed time of the phase
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::MalformedInput` if the duration is negative or
    /// not finite.
    pub fn elapsed(&self) -> Result<Duration, BridgeError> {
        Duration::try_from_secs_f64(self.duration).map_err(|_| {
            BridgeError::malformed(format!(
                "invalid duration {} for {}",
                self.duration, self.nodeid
            ))
        })
    }

    /// Text for the `message` attribute of a failure
    #[must_use]
    pub fn short_location(&self) -> String {
        short_location(self.location.as_ref(), &self.nodeid)
    }
}

/// Report for the collection of one node (usually a file)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollectReport {
    /// Raw node id of the collected node
    pub nodeid: String,
    /// Outcome of the collection
    pub outcome: Outcome,
    /// Short location, when the framework provides one
    #[serde(default)]
    pub location: Option<Location>,
    /// Collection error text
    #[serde(default)]
    pub longrepr: ReportDetail,
}

impl CollectReport {
    /// Text for the `message` attribute of a failure
    #[must_use]
    pub fn short_location(&self) -> String {
        short_location(self.location.as_ref(), &self.nodeid)
    }
}

fn short_location(location: Option<&Location>, nodeid: &str) -> String {
    location.map_or_else(|| nodeid.to_string(), Location::to_string)
}
