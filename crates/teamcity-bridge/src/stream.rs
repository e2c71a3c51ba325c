// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Newline-delimited JSON input
//!
//! Hosts hand events to the bridge as one JSON object per line:
//!
//! ```text
//! {"event":"logstart","nodeid":"tests/test_math.py::test_add"}
//! {"event":"report","nodeid":"tests/test_math.py::test_add","outcome":"passed","when":"call","duration":0.01}
//! {"event":"sessionfinish"}
//! ```
//!
//! Lint diagnostics use the same framing with one [`Diagnostic`] per line.
//!
//! # Example
//!
//! ```
//! use teamcity_bridge::stream::{LifecycleEvent, LineDecoder};
//!
//! let mut decoder = LineDecoder::<LifecycleEvent>::new();
//! let event = decoder.decode_line(r#"{"event":"sessionfinish"}"#).unwrap();
//! assert_eq!(event, Some(LifecycleEvent::SessionFinish));
//! ```
//!
//! [`Diagnostic`]: crate::diagnostic::Diagnostic

use std::io::BufRead;
use std::marker::PhantomData;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::BridgeError;
use crate::report::{CollectReport, TestReport};

/// A single event from the test runner
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event")]
pub enum LifecycleEvent {
    /// A test is about to run
    #[serde(rename = "logstart")]
    LogStart {
        /// Raw node id of the test
        nodeid: String,
    },
    /// Result of one test phase
    #[serde(rename = "report")]
    Report(TestReport),
    /// Result of collecting one node
    #[serde(rename = "collectreport")]
    CollectReport(CollectReport),
    /// A named suite begins
    #[serde(rename = "suitestart")]
    SuiteStart {
        /// Suite name
        name: String,
    },
    /// The session is over
    #[serde(rename = "sessionfinish")]
    SessionFinish,
}

/// Incremental decoder for newline-delimited JSON records
///
/// Tracks line numbers so decode errors point at the offending line.
#[derive(Debug)]
pub struct LineDecoder<T> {
    line: usize,
    _record: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> LineDecoder<T> {
    /// Create a decoder positioned before the first line
    #[must_use]
    pub fn new() -> Self {
        Self {
            line: 0,
            _record: PhantomData,
        }
    }

    /// Decode the next line; blank lines yield `None`
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::InvalidLine` if the line is not a valid record.
    pub fn decode_line(&mut self, line: &str) -> Result<Option<T>, BridgeError> {
        self.line += 1;

        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        serde_json::from_str(line)
            .map(Some)
            .map_err(|source| BridgeError::InvalidLine {
                line: self.line,
                source,
            })
    }

    /// Number of lines seen so far
    #[must_use]
    pub fn lines_read(&self) -> usize {
        self.line
    }
}

impl<T: DeserializeOwned> Default for LineDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode every record of a complete input
///
/// # Errors
///
/// Returns `BridgeError::InvalidLine` for the first line that fails to decode.
pub fn decode_all<T: DeserializeOwned>(input: &str) -> Result<Vec<T>, BridgeError> {
    let mut decoder = LineDecoder::new();
    let mut records = Vec::new();
    for line in input.lines() {
        if let Some(record) = decoder.decode_line(line)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Iterator over the records of a buffered reader
///
/// Yields one item per non-blank line, in input order.
pub struct Records<R, T> {
    reader: R,
    decoder: LineDecoder<T>,
    buf: String,
}

impl<R: BufRead, T: DeserializeOwned> Records<R, T> {
    /// Wrap a reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            decoder: LineDecoder::new(),
            buf: String::new(),
        }
    }

    /// Number of lines read so far
    #[must_use]
    pub fn lines_read(&self) -> usize {
        self.decoder.lines_read()
    }
}

impl<R: BufRead, T: DeserializeOwned> Iterator for Records<R, T> {
    type Item = Result<T, BridgeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => match self.decoder.decode_line(&self.buf) {
                    Ok(Some(record)) => return Some(Ok(record)),
                    Ok(None) => continue,
                    Err(e) => return Some(Err(e)),
                },
                Err(e) => return Some(Err(BridgeError::from(e))),
            }
        }
    }
}
