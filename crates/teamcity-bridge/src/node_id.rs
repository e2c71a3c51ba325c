// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test identifier normalization
//!
//! Test runners name tests with hierarchical node ids such as
//! `tests/test_math.py::TestDiv::test_by_zero`. TeamCity wants one dotted
//! name, so the file part is flattened into dot-separated segments and the
//! in-file hierarchy is joined with dots.

use std::fmt;
use std::path::MAIN_SEPARATOR;

use crate::error::BridgeError;

/// Separator between hierarchy levels in a node id
pub const HIERARCHY_SEPARATOR: &str = "::";

/// Marker for an instance level between a class and its methods
pub const INSTANCE_MARKER: &str = "::()::";

/// Segment used for nodes that have no in-file hierarchy
pub const TOP_LEVEL: &str = "top_level";

/// Suffix of the synthetic test reporting a teardown failure
pub const TEARDOWN_SUFFIX: &str = "_teardown";

/// Suffix of the synthetic test reporting a collection failure
pub const COLLECT_SUFFIX: &str = "_collect";

/// A normalized, dotted test identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TestId(String);

impl TestId {
    /// Normalize a raw node id
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::InvalidIdentifier` for an empty node id.
    pub fn normalize(nodeid: &str) -> Result<Self, BridgeError> {
        normalize(nodeid).map(Self)
    }

    /// Derive the identifier of a synthetic test, e.g. `<id>_teardown`
    #[must_use]
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self(format!("{}{}", self.0, suffix))
    }

    /// The identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a node id into a dotted test name
///
/// Input: "tests/test_math.py::TestDiv::()::test_by_zero"
/// Output: "tests.test_math_py.TestDiv.test_by_zero"
///
/// # Errors
///
/// Returns `BridgeError::InvalidIdentifier` for an empty node id.
pub fn normalize(nodeid: &str) -> Result<String, BridgeError> {
    if nodeid.is_empty() {
        return Err(BridgeError::InvalidIdentifier {
            nodeid: String::new(),
            reason: "node id is empty",
        });
    }

    // A separator at position 0 does not split off a file part
    let (file, test) = match nodeid.find(HIERARCHY_SEPARATOR) {
        Some(idx) if idx > 0 => (&nodeid[..idx], &nodeid[idx + HIERARCHY_SEPARATOR.len()..]),
        _ => (nodeid, TOP_LEVEL),
    };

    let test = test
        .replace(INSTANCE_MARKER, ".")
        .replace(HIERARCHY_SEPARATOR, ".");
    let test = test.trim_matches('.');

    let file = file
        .replace('.', "_")
        .replace(MAIN_SEPARATOR, ".")
        .replace('/', ".");

    Ok(format!("{file}.{test}"))
}
