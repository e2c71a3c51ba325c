// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Service message encoding
//!
//! A service message is a single line of the form
//!
//! ```text
//! ##teamcity[testFailed name='pkg.test_it' message='boom' details='line one|nline two']
//! ```
//!
//! Values are escaped with the protocol's `|` escape table. Message and
//! attribute names are never escaped, so they are validated instead.

use std::time::Duration;

use crate::error::MessagesError;

/// Prefix that opens every service message line
pub const PREFIX: &str = "##teamcity[";

/// Closing bracket of a service message line
pub const SUFFIX: &str = "]";

// ============================================================================
// Escaping
// ============================================================================

/// Escape a value for inclusion inside a quoted service message field
///
/// `'`, `\n`, `\r`, `|`, `[` and `]` become `|'`, `|n`, `|r`, `||`, `|[`
/// and `|]`. Every other character, control characters included, is kept
/// as is.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    escape_into(&mut out, value);
    out
}

fn escape_into(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\'' => out.push_str("|'"),
            '\n' => out.push_str("|n"),
            '\r' => out.push_str("|r"),
            '|' => out.push_str("||"),
            '[' => out.push_str("|["),
            ']' => out.push_str("|]"),
            other => out.push(other),
        }
    }
}

/// Check whether a message or attribute name can be emitted unescaped
///
/// Names must be non-empty and consist of ASCII letters, digits, `_`, `.`
/// or `-`.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

fn check_name(kind: &'static str, name: &str) -> Result<(), MessagesError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(MessagesError::InvalidName {
            kind,
            name: name.to_string(),
        })
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Encode one service message line (without the trailing newline)
///
/// A non-empty `main_text` is written as an unnamed quoted token directly
/// after the message name. Attributes are written in the order given.
///
/// # Errors
///
/// Returns `MessagesError::InvalidName` if the message name or any attribute
/// name fails [`is_valid_name`]. Nothing is produced in that case.
pub fn encode<'a, I>(name: &str, main_text: &str, attributes: I) -> Result<String, MessagesError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    check_name("message", name)?;

    let mut line = String::with_capacity(PREFIX.len() + name.len() + 64);
    line.push_str(PREFIX);
    line.push_str(name);

    if !main_text.is_empty() {
        line.push_str(" '");
        escape_into(&mut line, main_text);
        line.push('\'');
    }

    for (key, value) in attributes {
        check_name("attribute", key)?;
        line.push(' ');
        line.push_str(key);
        line.push_str("='");
        escape_into(&mut line, value);
        line.push('\'');
    }

    line.push_str(SUFFIX);
    Ok(line)
}

/// Render a duration as whole seconds with six fractional digits (`S.ffffff`)
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    format!("{}.{:06}", duration.as_secs(), duration.subsec_micros())
}

/// Render a duration given in seconds as `S.ffffff`
///
/// # Errors
///
/// Returns `MessagesError::InvalidDuration` for negative, NaN or infinite
/// values.
pub fn format_duration_secs(seconds: f64) -> Result<String, MessagesError> {
    Duration::try_from_secs_f64(seconds)
        .map(format_duration)
        .map_err(|_| MessagesError::InvalidDuration { seconds })
}

// ============================================================================
// Message value type
// ============================================================================

/// A service message: a name, an optional unnamed main text, and ordered
/// attributes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    name: String,
    main_text: String,
    attributes: Vec<(String, String)>,
}

impl Message {
    /// Create a message with no text and no attributes
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            main_text: String::new(),
            attributes: Vec::new(),
        }
    }

    /// Set the unnamed main text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.main_text = text.into();
        self
    }

    /// Append an attribute
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_attr(key, value);
        self
    }

    /// Append an attribute in place
    pub fn push_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((key.into(), value.into()));
    }

    /// Message name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unnamed main text (empty if unset)
    #[must_use]
    pub fn main_text(&self) -> &str {
        &self.main_text
    }

    /// Attributes in insertion order
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Look up the first attribute with the given name
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Encode this message into a single protocol line
    ///
    /// # Errors
    ///
    /// See [`encode`].
    pub fn encode(&self) -> Result<String, MessagesError> {
        encode(
            &self.name,
            &self.main_text,
            self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }
}
