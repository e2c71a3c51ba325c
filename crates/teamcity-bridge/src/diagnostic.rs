// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Lint diagnostics as failed tests
//!
//! Each diagnostic becomes one `testFailed` message whose details show the
//! offending source line with a caret under the reported column:
//!
//! ```text
//! import os, sys
//!          ^
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};
use teamcity_messages::{Message, ServiceMessages};
use tracing::debug;

use crate::error::BridgeError;

/// Name the lint formatter announces itself with
pub const FORMATTER_NAME: &str = "teamcity-messages";

/// Prefix of every test name derived from a diagnostic
pub const LINTER_PREFIX: &str = "flake8";

/// One lint violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// File the violation was found in
    pub filename: String,
    /// 1-based line number
    pub line_number: u32,
    /// Column of the violation within the line
    pub column_number: u32,
    /// Violation code, e.g. `E401`
    pub code: String,
    /// Violation description
    pub text: String,
    /// Full source line, including its line terminator
    pub physical_line: String,
}

impl Diagnostic {
    /// `path:line:column`
    #[must_use]
    pub fn position(&self) -> String {
        format!(
            "{}:{}:{}",
            self.filename, self.line_number, self.column_number
        )
    }

    /// `code text`
    #[must_use]
    pub fn error_message(&self) -> String {
        format!("{} {}", self.code, self.text)
    }

    /// Test name reported to TeamCity
    #[must_use]
    pub fn test_name(&self) -> String {
        format!(
            "{LINTER_PREFIX}: {}: {}",
            self.position(),
            self.error_message()
        )
    }

    /// Source line followed by a caret line pointing at the column
    #[must_use]
    pub fn details(&self) -> String {
        let indent: String = self
            .physical_line
            .chars()
            .take(self.column_number as usize)
            .map(|c| if c.is_whitespace() { c } else { ' ' })
            .collect();
        format!("{}\n{}^", self.physical_line.trim_end(), indent)
    }

    /// Check the fields needed to build a test name
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::MalformedInput` if the file name or code is empty.
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.filename.is_empty() {
            return Err(BridgeError::malformed("diagnostic has an empty filename"));
        }
        if self.code.is_empty() {
            return Err(BridgeError::malformed(format!(
                "diagnostic at {} has an empty code",
                self.position()
            )));
        }
        Ok(())
    }
}

/// Build the `testFailed` message for a diagnostic
///
/// No `testStarted`/`testFinished` pair is produced; the surrounding session
/// owns that.
///
/// # Errors
///
/// Returns `BridgeError::MalformedInput` if the diagnostic fails validation.
pub fn adapt(diagnostic: &Diagnostic) -> Result<Message, BridgeError> {
    diagnostic.validate()?;
    Ok(Message::new("testFailed")
        .attr("name", diagnostic.test_name())
        .attr("message", diagnostic.error_message())
        .attr("details", diagnostic.details()))
}

/// A lint formatter session writing one failure per diagnostic
pub struct LintReport<W: Write> {
    messages: ServiceMessages<W>,
    reported: usize,
}

impl<W: Write> LintReport<W> {
    /// Start a session, announcing the formatter in the build log
    ///
    /// # Errors
    ///
    /// Returns a write error.
    pub fn start(mut messages: ServiceMessages<W>) -> Result<Self, BridgeError> {
        messages.message(&format!(
            "{FORMATTER_NAME} {} enabled",
            env!("CARGO_PKG_VERSION")
        ))?;
        Ok(Self {
            messages,
            reported: 0,
        })
    }

    /// Report one diagnostic
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::MalformedInput` for an invalid diagnostic
    /// (nothing is written), or a write error.
    pub fn format(&mut self, diagnostic: &Diagnostic) -> Result<(), BridgeError> {
        let message = adapt(diagnostic)?;
        debug!(position = %diagnostic.position(), code = %diagnostic.code, "Reporting diagnostic");
        self.messages.emit(message)?;
        self.reported += 1;
        Ok(())
    }

    /// Number of diagnostics reported so far
    #[must_use]
    pub fn reported(&self) -> usize {
        self.reported
    }

    /// Consume the session and return the underlying sink
    pub fn into_inner(self) -> W {
        self.messages.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn sample() -> Diagnostic {
        Diagnostic {
            filename: "pkg/mod.py".to_string(),
            line_number: 3,
            column_number: 9,
            code: "E401".to_string(),
            text: "multiple imports on one line".to_string(),
            physical_line: "import os, sys   \n".to_string(),
        }
    }

    #[test]
    fn test_test_name() {
        assert_eq!(
            sample().test_name(),
            "flake8: pkg/mod.py:3:9: E401 multiple imports on one line"
        );
    }

    #[test]
    fn test_details_caret() {
        assert_eq!(sample().details(), "import os, sys\n         ^");
    }

    #[test]
    fn test_details_keeps_tabs_in_indent() {
        let diagnostic = Diagnostic {
            physical_line: "\tx = [1,2]\n".to_string(),
            column_number: 7,
            ..sample()
        };
        assert_eq!(diagnostic.details(), "\tx = [1,2]\n\t      ^");
    }

    #[test]
    fn test_details_column_zero_and_past_end() {
        let diagnostic = Diagnostic {
            physical_line: "x=1\n".to_string(),
            column_number: 0,
            ..sample()
        };
        assert_eq!(diagnostic.details(), "x=1\n^");

        let diagnostic = Diagnostic {
            physical_line: "x=1".to_string(),
            column_number: 40,
            ..sample()
        };
        assert_eq!(diagnostic.details(), "x=1\n   ^");
    }

    #[test]
    fn test_adapt_builds_failed_message() {
        let message = adapt(&sample()).expect("valid");
        assert_eq!(
            message.encode().expect("encode"),
            "##teamcity[testFailed name='flake8: pkg/mod.py:3:9: E401 multiple imports on one line' message='E401 multiple imports on one line' details='import os, sys|n         ^']"
        );
    }

    #[test]
    fn test_adapt_rejects_missing_fields() {
        let diagnostic = Diagnostic {
            filename: String::new(),
            ..sample()
        };
        assert!(matches!(
            adapt(&diagnostic),
            Err(BridgeError::MalformedInput { .. })
        ));

        let diagnostic = Diagnostic {
            code: String::new(),
            ..sample()
        };
        assert!(adapt(&diagnostic).is_err());
    }

    #[test]
    fn test_lint_report_session() {
        let mut report = LintReport::start(ServiceMessages::new(Vec::new())).expect("start");
        report.format(&sample()).expect("format");
        assert_eq!(report.reported(), 1);

        let out = String::from_utf8(report.into_inner()).expect("utf-8");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            format!(
                "##teamcity[message text='teamcity-messages {} enabled']",
                env!("CARGO_PKG_VERSION")
            )
        );
        assert!(lines[1].starts_with("##teamcity[testFailed name='flake8: pkg/mod.py:3:9: E401"));
    }

    #[test]
    fn test_diagnostic_from_json() {
        let diagnostic: Diagnostic = serde_json::from_str(
            r#"{"filename":"a.py","line_number":1,"column_number":0,"code":"F401",
                "text":"'os' imported but unused","physical_line":"import os\n"}"#,
        )
        .expect("parse");
        assert_eq!(diagnostic.error_message(), "F401 'os' imported but unused");
    }
}
