// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Line-oriented service message writer
//!
//! [`ServiceMessages`] owns the output sink and writes exactly one encoded
//! line per message, flushing after each one so a consumer reading the
//! stream live never sees a partial line.

use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::error::MessagesError;
use crate::message::{Message, format_duration};

/// Source of the time used for `timestamp` attributes
pub type Clock = fn() -> DateTime<Utc>;

/// Render a timestamp the way TeamCity expects it (`YYYY-MM-DDTHH:MM:SS.mmm+0000`)
///
/// The zone offset is always written; without it TeamCity reads the value
/// as agent-local time.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string()
}

/// Writer for service messages
///
/// ```
/// use teamcity_messages::ServiceMessages;
///
/// let mut messages = ServiceMessages::new(Vec::new());
/// messages.test_started("pkg.test_it").unwrap();
/// let out = String::from_utf8(messages.into_inner()).unwrap();
/// assert_eq!(out, "##teamcity[testStarted name='pkg.test_it']\n");
/// ```
pub struct ServiceMessages<W: Write> {
    out: W,
    flow_id: Option<String>,
    clock: Option<Clock>,
}

impl<W: Write> ServiceMessages<W> {
    /// Create a writer without flow id or timestamps
    pub fn new(out: W) -> Self {
        Self {
            out,
            flow_id: None,
            clock: None,
        }
    }

    /// Tag every message with a `flowId` attribute
    #[must_use]
    pub fn with_flow_id(mut self, flow_id: impl Into<String>) -> Self {
        self.flow_id = Some(flow_id.into());
        self
    }

    /// Tag every message with a `timestamp` attribute from the system clock
    #[must_use]
    pub fn with_timestamps(self) -> Self {
        self.with_clock(Utc::now)
    }

    /// Tag every message with a `timestamp` attribute from `clock`
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Write a message, appending the writer-level attributes
    ///
    /// # Errors
    ///
    /// Returns `MessagesError::InvalidName` if the message cannot be encoded
    /// (nothing is written), or `MessagesError::Io` if the sink fails.
    pub fn emit(&mut self, mut message: Message) -> Result<(), MessagesError> {
        if let Some(flow_id) = &self.flow_id {
            message.push_attr("flowId", flow_id.clone());
        }
        if let Some(clock) = self.clock {
            message.push_attr("timestamp", format_timestamp(clock()));
        }

        let mut line = message.encode()?;
        trace!(message = message.name(), "Emitting service message");

        line.push('\n');
        self.out.write_all(line.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    /// Informational build log message
    ///
    /// # Errors
    ///
    /// See [`ServiceMessages::emit`].
    pub fn message(&mut self, text: &str) -> Result<(), MessagesError> {
        self.emit(Message::new("message").attr("text", text))
    }

    /// # Errors
    ///
    /// See [`ServiceMessages::emit`].
    pub fn test_suite_started(&mut self, name: &str) -> Result<(), MessagesError> {
        self.emit(Message::new("testSuiteStarted").attr("name", name))
    }

    /// # Errors
    ///
    /// See [`ServiceMessages::emit`].
    pub fn test_suite_finished(&mut self, name: &str) -> Result<(), MessagesError> {
        self.emit(Message::new("testSuiteFinished").attr("name", name))
    }

    /// # Errors
    ///
    /// See [`ServiceMessages::emit`].
    pub fn test_started(&mut self, name: &str) -> Result<(), MessagesError> {
        self.emit(Message::new("testStarted").attr("name", name))
    }

    /// Finish a test, with a `duration` attribute only when one is given
    ///
    /// # Errors
    ///
    /// See [`ServiceMessages::emit`].
    pub fn test_finished(
        &mut self,
        name: &str,
        duration: Option<Duration>,
    ) -> Result<(), MessagesError> {
        let mut message = Message::new("testFinished").attr("name", name);
        if let Some(duration) = duration {
            message.push_attr("duration", format_duration(duration));
        }
        self.emit(message)
    }

    /// # Errors
    ///
    /// See [`ServiceMessages::emit`].
    pub fn test_failed(
        &mut self,
        name: &str,
        message: &str,
        details: &str,
    ) -> Result<(), MessagesError> {
        self.emit(
            Message::new("testFailed")
                .attr("name", name)
                .attr("message", message)
                .attr("details", details),
        )
    }

    /// # Errors
    ///
    /// See [`ServiceMessages::emit`].
    pub fn test_ignored(&mut self, name: &str, message: &str) -> Result<(), MessagesError> {
        self.emit(
            Message::new("testIgnored")
                .attr("name", name)
                .attr("message", message),
        )
    }

    /// Borrow the underlying sink
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consume the writer and return the underlying sink
    pub fn into_inner(self) -> W {
        self.out
    }
}
